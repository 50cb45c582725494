//! HTTP backend for the object-store seam.
//!
//! Speaks the storage service's REST API:
//! - `POST {base}/object/list/{namespace}` — list entries (JSON body with
//!   prefix and limit, JSON array response)
//! - `POST {base}/object/{namespace}/{key}` — upload raw bytes
//! - `GET  {base}/object/{namespace}/{key}` — download raw bytes
//!
//! Every call carries the pre-established API key as both a bearer token and
//! an `apikey` header.

use super::{ObjectEntry, ObjectStore, StoreError, StoreResult};
use async_trait::async_trait;
use bytes::Bytes;
use chrono::{DateTime, Utc};
use reqwest::{Client, RequestBuilder, Response, header};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Object store backed by the remote storage service's HTTP API.
pub struct HttpObjectStore {
    client: Client,
    base_url: String,
    api_key: String,
}

#[derive(Debug, Serialize)]
struct ListRequest {
    prefix: String,
    limit: usize,
}

#[derive(Debug, Deserialize)]
struct ListEntry {
    name: String,
    created_at: Option<DateTime<Utc>>,
    metadata: Option<ListEntryMetadata>,
}

#[derive(Debug, Deserialize)]
struct ListEntryMetadata {
    size: Option<i64>,
}

impl HttpObjectStore {
    /// Create a store client for `base_url`, authenticating every request
    /// with `api_key`.
    pub fn new(base_url: impl Into<String>, api_key: impl Into<String>) -> Self {
        let base_url = base_url.into();
        Self {
            client: Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key: api_key.into(),
        }
    }

    fn object_url(&self, namespace: &str, key: &str) -> String {
        format!("{}/object/{}/{}", self.base_url, namespace, key)
    }

    fn list_url(&self, namespace: &str) -> String {
        format!("{}/object/list/{}", self.base_url, namespace)
    }

    fn authed(&self, builder: RequestBuilder) -> RequestBuilder {
        builder
            .bearer_auth(&self.api_key)
            .header("apikey", &self.api_key)
    }
}

/// Map non-success statuses to `StoreError::Status`, keeping the response
/// body as the message.
async fn ensure_success(response: Response) -> StoreResult<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let message = response.text().await.unwrap_or_default();
    Err(StoreError::Status {
        status: status.as_u16(),
        message,
    })
}

#[async_trait]
impl ObjectStore for HttpObjectStore {
    async fn list(&self, namespace: &str, limit: usize) -> StoreResult<Vec<ObjectEntry>> {
        let body = ListRequest {
            prefix: String::new(),
            limit,
        };
        let response = self
            .authed(self.client.post(self.list_url(namespace)))
            .json(&body)
            .send()
            .await?;
        let entries: Vec<ListEntry> = ensure_success(response).await?.json().await?;
        debug!(namespace, count = entries.len(), "listed objects");

        Ok(entries
            .into_iter()
            .map(|entry| ObjectEntry {
                key: entry.name,
                size_bytes: entry.metadata.and_then(|m| m.size),
                created_at: entry.created_at,
            })
            .collect())
    }

    async fn upload(&self, namespace: &str, key: &str, bytes: Bytes) -> StoreResult<()> {
        let response = self
            .authed(self.client.post(self.object_url(namespace, key)))
            .header(header::CONTENT_TYPE, "application/octet-stream")
            .body(bytes)
            .send()
            .await?;
        ensure_success(response).await?;
        debug!(namespace, key, "uploaded object");
        Ok(())
    }

    async fn download(&self, namespace: &str, key: &str) -> StoreResult<Bytes> {
        let response = self
            .authed(self.client.get(self.object_url(namespace, key)))
            .send()
            .await?;
        let bytes = ensure_success(response).await?.bytes().await?;
        debug!(namespace, key, size = bytes.len(), "downloaded object");
        Ok(bytes)
    }
}
