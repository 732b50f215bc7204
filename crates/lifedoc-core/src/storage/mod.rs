//! Blob storage for profile pictures and diary photos.

mod firebase;
mod jpeg;
mod memory;
mod r2;

use std::future::Future;

pub use firebase::FirebaseStorageClient;
pub use jpeg::{encode_jpeg, JpegOptions, JPEG_CONTENT_TYPE};
pub use memory::{BlobOp, MemoryBlobStore};
pub use r2::{R2Config, R2Storage};

use crate::{Error, Result};

/// Path-addressed binary object storage with URL-based retrieval.
pub trait BlobStore: Send + Sync {
    /// Store `bytes` at `path`. Failures map to [`Error::BlobUpload`].
    fn put(
        &self,
        path: &str,
        bytes: Vec<u8>,
        content_type: &str,
    ) -> impl Future<Output = Result<()>> + Send;

    /// Remove the object at `path`. Failures map to [`Error::BlobDelete`].
    fn delete(&self, path: &str) -> impl Future<Output = Result<()>> + Send;

    /// Resolve a download URL. Failures map to [`Error::BlobUrlResolution`].
    fn download_url(&self, path: &str) -> impl Future<Output = Result<String>> + Send;
}

fn normalize_object_path(path: &str) -> Result<String> {
    let path = path.trim().trim_matches('/').to_string();
    if path.is_empty() {
        return Err(Error::InvalidInput(
            "Blob path cannot be empty".to_string(),
        ));
    }
    Ok(path)
}
