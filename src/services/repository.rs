//! DocumentRepository — upload, listing, and download of documents against
//! a remote object-storage namespace.
//!
//! The repository holds an optional store handle (absent when the backend is
//! unconfigured), the namespace all keys are scoped under, and an in-memory
//! cache of the last server-confirmed listing. The cache is only ever
//! replaced wholesale with a freshly fetched listing, never patched
//! incrementally, so it always reflects a real server state.

use crate::errors::{RepoError, RepoResult};
use crate::keys::{build_storage_key, recover_display_name};
use crate::models::document::{FilePayload, StoredDocument};
use crate::store::{ObjectStore, StoreError};
use chrono::Utc;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tempfile::NamedTempFile;
use tracing::{debug, warn};

/// Bound on a single listing call.
pub const DEFAULT_LIST_LIMIT: usize = 100;

/// Advisory size cap for uploads. Oversized files are warned about, not
/// rejected; the original enforcement lived in the file picker only.
pub const MAX_DOCUMENT_BYTES: usize = 10 * 1024 * 1024;

/// Extensions the repository considers document formats. Advisory only.
pub const DOCUMENT_EXTENSIONS: [&str; 3] = ["pdf", "doc", "docx"];

/// Client-side file-management surface over the remote store.
///
/// Methods that perform a remote operation take `&mut self`, so at most one
/// operation per handle is in flight at a time. There is no cancellation:
/// dropping the future abandons the call without cleanup.
pub struct DocumentRepository {
    store: Option<Arc<dyn ObjectStore>>,
    namespace: String,
    list_limit: usize,
    documents: Vec<StoredDocument>,
}

impl DocumentRepository {
    /// Create a repository over `namespace`. Pass `None` for the store when
    /// the backend is unconfigured; mutating operations will then fail fast
    /// with `StorageUnavailable` and listing degrades to empty.
    pub fn new(store: Option<Arc<dyn ObjectStore>>, namespace: impl Into<String>) -> Self {
        Self {
            store,
            namespace: namespace.into(),
            list_limit: DEFAULT_LIST_LIMIT,
            documents: Vec::new(),
        }
    }

    pub fn with_list_limit(mut self, limit: usize) -> Self {
        self.list_limit = limit.clamp(1, DEFAULT_LIST_LIMIT);
        self
    }

    /// The last server-confirmed listing.
    pub fn documents(&self) -> &[StoredDocument] {
        &self.documents
    }

    /// Fetch the current set of stored documents.
    ///
    /// Entries come back in whatever order the store provides. Failures,
    /// including an absent backend, degrade to an empty sequence rather
    /// than an error: the listing is decorative, not load-bearing. The
    /// cached listing is replaced only on success.
    pub async fn list_documents(&mut self) -> Vec<StoredDocument> {
        match self.fetch_listing().await {
            Ok(documents) => {
                self.documents = documents.clone();
                documents
            }
            Err(err) => {
                debug!("listing unavailable: {}", err);
                Vec::new()
            }
        }
    }

    /// Upload a document under a freshly built timestamp-prefixed key.
    ///
    /// Preconditions are checked before any network call: a file must be
    /// selected (`NoFileSelected`) and the backend must be configured
    /// (`StorageUnavailable`). A failed write maps to `TransferError` and
    /// leaves the cached listing untouched.
    ///
    /// Success is determined by the confirmed write alone. The follow-up
    /// listing refresh is awaited but its failure is swallowed, so a caller
    /// never sees a successful upload reported as an error.
    pub async fn upload_document(&mut self, file: Option<FilePayload>) -> RepoResult<StoredDocument> {
        let file = file.ok_or(RepoError::NoFileSelected)?;
        let store = self.store.as_ref().ok_or(RepoError::StorageUnavailable)?;

        advise_on_constraints(&file);

        let now = Utc::now();
        let key = build_storage_key(now.timestamp_millis(), &file.name);
        let size_bytes = file.bytes.len() as i64;

        store
            .upload(&self.namespace, &key, file.bytes)
            .await
            .map_err(RepoError::TransferError)?;
        debug!(key = %key, size_bytes, "upload confirmed");

        let document = StoredDocument {
            storage_key: key,
            size_bytes: Some(size_bytes),
            created_at: Some(now),
        };

        match self.fetch_listing().await {
            Ok(documents) => self.documents = documents,
            Err(err) => debug!("post-upload refresh failed: {}", err),
        }

        Ok(document)
    }

    /// Download the document stored under `storage_key` and save it in
    /// `dest_dir` under its recovered display name.
    ///
    /// Unlike listing, a retrieval failure here is surfaced to the caller:
    /// this is a user-initiated action and must not fail silently. The
    /// bytes pass through a scoped temporary file that is persisted on
    /// success and removed on every failure path.
    pub async fn download_document(
        &self,
        storage_key: &str,
        dest_dir: &Path,
    ) -> RepoResult<PathBuf> {
        let store = self.store.as_ref().ok_or(RepoError::StorageUnavailable)?;

        let bytes = store
            .download(&self.namespace, storage_key)
            .await
            .map_err(RepoError::TransferError)?;

        let display_name = recover_display_name(storage_key);
        save_document(&bytes, display_name, dest_dir)
            .map_err(|err| RepoError::TransferError(StoreError::Io(err)))
    }

    async fn fetch_listing(&self) -> RepoResult<Vec<StoredDocument>> {
        let store = self.store.as_ref().ok_or(RepoError::StorageUnavailable)?;
        let entries = store
            .list(&self.namespace, self.list_limit)
            .await
            .map_err(RepoError::ListingUnavailable)?;
        Ok(entries.into_iter().map(StoredDocument::from_entry).collect())
    }
}

/// Warn about payloads that fall outside the advisory document constraints.
fn advise_on_constraints(file: &FilePayload) {
    if file.bytes.len() > MAX_DOCUMENT_BYTES {
        warn!(
            name = %file.name,
            size = file.bytes.len(),
            "document exceeds the advisory {} byte limit",
            MAX_DOCUMENT_BYTES
        );
    }

    let recognized = file
        .name
        .rsplit_once('.')
        .map(|(_, ext)| {
            DOCUMENT_EXTENSIONS
                .iter()
                .any(|candidate| candidate.eq_ignore_ascii_case(ext))
        })
        .unwrap_or(false);
    if !recognized {
        warn!(name = %file.name, "file does not have a recognized document extension");
    }
}

/// Write `bytes` to `dest_dir/display_name` through a named temporary file.
///
/// Rejects names that would resolve outside `dest_dir`: a recovered name
/// must be a single path component with no `..` segments.
///
/// The temp file lives in `dest_dir` so the final persist is a rename on the
/// same filesystem. If any step fails the guard drops and the temp file is
/// removed; nothing transient outlives this function.
fn save_document(bytes: &[u8], display_name: &str, dest_dir: &Path) -> std::io::Result<PathBuf> {
    if display_name.is_empty()
        || display_name.contains('/')
        || display_name.contains('\\')
        || display_name.contains("..")
    {
        return Err(std::io::Error::new(
            std::io::ErrorKind::InvalidInput,
            format!("unsafe save name `{}`", display_name),
        ));
    }

    let mut tmp = NamedTempFile::new_in(dest_dir)?;
    tmp.write_all(bytes)?;
    tmp.flush()?;

    let target = dest_dir.join(display_name);
    let file = tmp.persist(&target).map_err(|err| err.error)?;
    file.sync_all()?;
    Ok(target)
}
