//! Repository behavior against an in-memory object store, covering the
//! precondition, failure-degradation, and read-after-write paths.

use async_trait::async_trait;
use bytes::Bytes;
use docvault::errors::RepoError;
use docvault::models::document::FilePayload;
use docvault::services::repository::DocumentRepository;
use docvault::store::{ObjectEntry, ObjectStore, StoreError, StoreResult};
use std::collections::BTreeMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use tokio::sync::Mutex;

/// In-memory stand-in for the remote store. Counts every call so tests can
/// assert that precondition failures never reach the network.
#[derive(Default)]
struct MemoryStore {
    objects: Mutex<BTreeMap<String, Bytes>>,
    calls: AtomicUsize,
    fail_uploads: bool,
    fail_downloads: bool,
    fail_listing: bool,
}

impl MemoryStore {
    fn new() -> Self {
        Self::default()
    }

    fn failing_uploads() -> Self {
        Self {
            fail_uploads: true,
            ..Self::default()
        }
    }

    fn failing_downloads() -> Self {
        Self {
            fail_downloads: true,
            ..Self::default()
        }
    }

    fn failing_listing() -> Self {
        Self {
            fail_listing: true,
            ..Self::default()
        }
    }

    async fn seed(&self, key: &str, bytes: &[u8]) {
        self.objects
            .lock()
            .await
            .insert(key.to_string(), Bytes::copy_from_slice(bytes));
    }

    fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    fn rejection() -> StoreError {
        StoreError::Status {
            status: 503,
            message: "service unavailable".into(),
        }
    }
}

#[async_trait]
impl ObjectStore for MemoryStore {
    async fn list(&self, _namespace: &str, limit: usize) -> StoreResult<Vec<ObjectEntry>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_listing {
            return Err(Self::rejection());
        }
        Ok(self
            .objects
            .lock()
            .await
            .iter()
            .take(limit)
            .map(|(key, bytes)| ObjectEntry {
                key: key.clone(),
                size_bytes: Some(bytes.len() as i64),
                created_at: None,
            })
            .collect())
    }

    async fn upload(&self, _namespace: &str, key: &str, bytes: Bytes) -> StoreResult<()> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_uploads {
            return Err(Self::rejection());
        }
        self.objects.lock().await.insert(key.to_string(), bytes);
        Ok(())
    }

    async fn download(&self, _namespace: &str, key: &str) -> StoreResult<Bytes> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_downloads {
            return Err(Self::rejection());
        }
        self.objects
            .lock()
            .await
            .get(key)
            .cloned()
            .ok_or(StoreError::Status {
                status: 404,
                message: "not found".into(),
            })
    }
}

fn repo_with(store: Arc<MemoryStore>) -> DocumentRepository {
    DocumentRepository::new(Some(store as Arc<dyn ObjectStore>), "resumes")
}

fn pdf_payload() -> FilePayload {
    FilePayload {
        name: "resume.pdf".into(),
        bytes: Bytes::from_static(b"%PDF-1.4 test document"),
    }
}

#[tokio::test]
async fn upload_then_list_includes_new_entry() {
    let store = Arc::new(MemoryStore::new());
    let mut repo = repo_with(store.clone());

    let document = repo.upload_document(Some(pdf_payload())).await.unwrap();
    assert!(document.storage_key.ends_with("_resume.pdf"));
    assert_eq!(document.display_name(), "resume.pdf");

    let listed = repo.list_documents().await;
    assert!(
        listed
            .iter()
            .any(|doc| doc.storage_key == document.storage_key)
    );
}

#[tokio::test]
async fn upload_refreshes_cached_listing_before_returning() {
    let store = Arc::new(MemoryStore::new());
    let mut repo = repo_with(store.clone());

    let document = repo.upload_document(Some(pdf_payload())).await.unwrap();

    // The awaited refresh already replaced the cache with server state.
    assert_eq!(repo.documents().len(), 1);
    assert_eq!(repo.documents()[0].storage_key, document.storage_key);
}

#[tokio::test]
async fn upload_succeeds_even_when_refresh_fails() {
    let store = Arc::new(MemoryStore::failing_listing());
    let mut repo = repo_with(store.clone());

    // The write is confirmed; the failed refresh must not turn the result
    // into an error.
    let document = repo.upload_document(Some(pdf_payload())).await.unwrap();
    assert_eq!(document.display_name(), "resume.pdf");
    assert!(repo.documents().is_empty());
}

#[tokio::test]
async fn upload_without_file_makes_no_store_call() {
    let store = Arc::new(MemoryStore::new());
    let mut repo = repo_with(store.clone());

    let err = repo.upload_document(None).await.unwrap_err();
    assert!(matches!(err, RepoError::NoFileSelected));
    assert_eq!(store.calls(), 0);
}

#[tokio::test]
async fn upload_without_store_fails_fast() {
    let mut repo = DocumentRepository::new(None, "resumes");

    let err = repo.upload_document(Some(pdf_payload())).await.unwrap_err();
    assert!(matches!(err, RepoError::StorageUnavailable));
}

#[tokio::test]
async fn upload_failure_leaves_cached_listing_unchanged() {
    let store = Arc::new(MemoryStore::failing_uploads());
    store.seed("1700000000000_resume.pdf", b"old contents").await;
    let mut repo = repo_with(store.clone());

    let before = repo.list_documents().await;
    assert_eq!(before.len(), 1);

    let err = repo.upload_document(Some(pdf_payload())).await.unwrap_err();
    assert!(matches!(err, RepoError::TransferError(_)));
    assert_eq!(repo.documents(), &before[..]);
}

#[tokio::test]
async fn listing_failure_degrades_to_empty() {
    let store = Arc::new(MemoryStore::failing_listing());
    let mut repo = repo_with(store.clone());

    let listed = repo.list_documents().await;
    assert!(listed.is_empty());
}

#[tokio::test]
async fn listing_without_store_is_empty() {
    let mut repo = DocumentRepository::new(None, "resumes");
    assert!(repo.list_documents().await.is_empty());
}

#[tokio::test]
async fn listing_respects_the_configured_limit() {
    let store = Arc::new(MemoryStore::new());
    store.seed("1700000000000_a.pdf", b"a").await;
    store.seed("1700000000001_b.pdf", b"b").await;
    store.seed("1700000000002_c.pdf", b"c").await;
    let mut repo = repo_with(store.clone()).with_list_limit(2);

    assert_eq!(repo.list_documents().await.len(), 2);
}

#[tokio::test]
async fn download_saves_under_recovered_display_name() {
    let store = Arc::new(MemoryStore::new());
    store.seed("1700000000000_resume.pdf", b"%PDF-1.4").await;
    let repo = repo_with(store.clone());
    let dir = tempfile::tempdir().unwrap();

    let path = repo
        .download_document("1700000000000_resume.pdf", dir.path())
        .await
        .unwrap();

    assert_eq!(path, dir.path().join("resume.pdf"));
    assert_eq!(std::fs::read(&path).unwrap(), b"%PDF-1.4");

    // Only the persisted document remains; the transient temp file is gone.
    assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 1);
}

#[tokio::test]
async fn download_failure_is_surfaced_and_leaks_nothing() {
    let store = Arc::new(MemoryStore::failing_downloads());
    let repo = repo_with(store.clone());
    let dir = tempfile::tempdir().unwrap();

    let err = repo
        .download_document("1700000000000_resume.pdf", dir.path())
        .await
        .unwrap_err();

    assert!(matches!(err, RepoError::TransferError(_)));
    assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
}

#[tokio::test]
async fn download_rejects_names_that_escape_the_destination() {
    let store = Arc::new(MemoryStore::new());
    store.seed("1700000000000_../escape.pdf", b"%PDF-1.4").await;
    let repo = repo_with(store.clone());
    let dir = tempfile::tempdir().unwrap();
    let dest = dir.path().join("downloads");
    std::fs::create_dir(&dest).unwrap();

    let err = repo
        .download_document("1700000000000_../escape.pdf", &dest)
        .await
        .unwrap_err();

    assert!(matches!(err, RepoError::TransferError(_)));
    assert!(!dir.path().join("escape.pdf").exists());
    assert_eq!(std::fs::read_dir(&dest).unwrap().count(), 0);
}

#[tokio::test]
async fn download_without_store_fails_fast() {
    let repo = DocumentRepository::new(None, "resumes");
    let dir = tempfile::tempdir().unwrap();

    let err = repo
        .download_document("1700000000000_resume.pdf", dir.path())
        .await
        .unwrap_err();
    assert!(matches!(err, RepoError::StorageUnavailable));
}
