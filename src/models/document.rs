//! Represents a document stored in the remote namespace.

use crate::keys::recover_display_name;
use crate::store::ObjectEntry;
use bytes::Bytes;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A document that exists in the remote store.
///
/// Created when an upload succeeds or when the listing is fetched; never
/// mutated afterwards. The display name is not stored separately; it is
/// recovered from the storage key on demand.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct StoredDocument {
    /// Unique key within the storage namespace,
    /// `<uploadTimestampMillis>_<originalFileName>`.
    pub storage_key: String,

    /// Size in bytes, when the store reports it.
    pub size_bytes: Option<i64>,

    /// Creation instant as reported by the store.
    pub created_at: Option<DateTime<Utc>>,
}

impl StoredDocument {
    /// The human-readable name, recovered from the storage key.
    pub fn display_name(&self) -> &str {
        recover_display_name(&self.storage_key)
    }

    pub(crate) fn from_entry(entry: ObjectEntry) -> Self {
        Self {
            storage_key: entry.key,
            size_bytes: entry.size_bytes,
            created_at: entry.created_at,
        }
    }
}

/// A file payload selected for upload: the original name plus its bytes.
#[derive(Clone, Debug)]
pub struct FilePayload {
    pub name: String,
    pub bytes: Bytes,
}
