use crate::store::StoreError;
use thiserror::Error;

/// Failures of the document repository operations.
///
/// Variants are distinguishable by cause so callers (and tests) can tell a
/// local precondition violation apart from a configuration gap or a storage
/// service failure.
#[derive(Debug, Error)]
pub enum RepoError {
    /// The storage backend has no valid configuration. Mutating operations
    /// fail with this before any network call is attempted.
    #[error("storage backend is not configured")]
    StorageUnavailable,

    /// Upload was requested without a file. Purely local.
    #[error("no file selected for upload")]
    NoFileSelected,

    /// The storage service rejected or failed an upload or download call.
    #[error("transfer failed: {0}")]
    TransferError(#[source] StoreError),

    /// Listing call failed. Never reaches callers of `list_documents`,
    /// which degrades to an empty collection instead.
    #[error("listing unavailable: {0}")]
    ListingUnavailable(#[source] StoreError),
}

pub type RepoResult<T> = Result<T, RepoError>;
