//! Abstraction over the external object-storage service.
//!
//! The repository depends on exactly three remote operations: list the
//! contents of a namespace, upload bytes under a key, and download the bytes
//! for a key. `ObjectStore` captures that surface so the production HTTP
//! backend and test doubles are interchangeable.

pub mod http;

use async_trait::async_trait;
use bytes::Bytes;
use chrono::{DateTime, Utc};
use thiserror::Error;

/// One entry as reported by the store's listing call.
#[derive(Clone, Debug)]
pub struct ObjectEntry {
    /// Storage key within the namespace.
    pub key: String,

    /// Size in bytes, if the store reports it.
    pub size_bytes: Option<i64>,

    /// Creation instant, if the store reports it.
    pub created_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("storage service returned {status}: {message}")]
    Status { status: u16, message: String },
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

pub type StoreResult<T> = Result<T, StoreError>;

/// The three operations this component requires from the external
/// object-storage service. Authentication and transport-level timeouts are
/// the implementation's concern, not the caller's.
#[async_trait]
pub trait ObjectStore: Send + Sync {
    /// Return up to `limit` entries currently stored in `namespace`, in
    /// whatever order the service provides.
    async fn list(&self, namespace: &str, limit: usize) -> StoreResult<Vec<ObjectEntry>>;

    /// Store `bytes` under `key` in `namespace`.
    async fn upload(&self, namespace: &str, key: &str, bytes: Bytes) -> StoreResult<()>;

    /// Retrieve the raw bytes stored under `key` in `namespace`.
    async fn download(&self, namespace: &str, key: &str) -> StoreResult<Bytes>;
}
