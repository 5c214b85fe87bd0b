use thiserror::Error;

use crate::transport::{EncodingError, UploadError};

use super::store::StoreError;

/// Errors from the journal: draft validation, audio handoff, persistence.
#[derive(Debug, Error)]
pub enum JournalError {
    /// The draft failed shape validation; nothing was attempted.
    #[error("invalid draft: {0}")]
    Validation(String),

    /// The operation needs a signed-in owner.
    #[error("sign in to keep this record")]
    Anonymous,

    #[error(transparent)]
    Encoding(#[from] EncodingError),

    #[error(transparent)]
    Upload(#[from] UploadError),

    #[error("store error: {0}")]
    Store(#[from] StoreError),
}
