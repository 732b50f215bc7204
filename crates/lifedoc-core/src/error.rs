//! Error types for lifedoc-core

use thiserror::Error;

use crate::auth::AuthError;

/// Result type alias using lifedoc-core's Error
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in lifedoc-core operations
#[derive(Error, Debug)]
pub enum Error {
    /// Authentication failure
    #[error(transparent)]
    Auth(#[from] AuthError),

    /// No active session, or a session without a user id
    #[error("Not signed in")]
    NotSignedIn,

    /// Document does not exist in the document store
    #[error("Document not found: {0}")]
    DocumentNotFound(String),

    /// Reading from the document store failed
    #[error("Document store read failed: {0}")]
    StoreRead(String),

    /// Writing to the document store failed
    #[error("Document store write failed: {0}")]
    StoreWrite(String),

    /// Source image could not be turned into JPEG bytes
    #[error("Image encoding failed: {0}")]
    ImageEncoding(String),

    /// Blob upload failed
    #[error("Image upload failed: {0}")]
    BlobUpload(String),

    /// Blob was stored but its download URL could not be resolved
    #[error("Image URL resolution failed: {0}")]
    BlobUrlResolution(String),

    /// Blob deletion failed
    #[error("Image delete failed: {0}")]
    BlobDelete(String),

    /// Entry has neither text nor an image
    #[error("Diary entry is incomplete: add a photo or some text")]
    IncompleteEntry,

    /// Replacement entry was written but the previous document is still present
    #[error("Saved entry {inserted} but could not remove previous entry {stale}: {reason}")]
    ReplaceIncomplete {
        inserted: String,
        stale: String,
        reason: String,
    },

    /// Invalid input
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
