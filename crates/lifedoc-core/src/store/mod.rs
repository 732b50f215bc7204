//! Document store abstraction over hierarchical collection/document backends.
//!
//! Paths alternate collection and document segments, e.g.
//! `userDiaries/{uid}/diaries` is a collection and
//! `userDiaries/{uid}/diaries/{id}` a document inside it.

mod fields;
mod firestore;
mod memory;

use std::future::Future;

pub use fields::{Document, Fields, FieldsBuilder};
pub use firestore::FirestoreClient;
pub use memory::{MemoryDocumentStore, StoreOp};

use crate::Result;

/// Operations the repositories need from a document database.
///
/// Read failures map to [`crate::Error::StoreRead`], write failures to
/// [`crate::Error::StoreWrite`].
pub trait DocumentStore: Send + Sync {
    /// Fetch a single document; `Ok(None)` when it does not exist.
    fn get_document(&self, path: &str) -> impl Future<Output = Result<Option<Document>>> + Send;

    /// List every document of a collection. A missing collection is empty.
    fn list_documents(&self, collection: &str)
        -> impl Future<Output = Result<Vec<Document>>> + Send;

    /// Create a document with a store-assigned id and return that id.
    fn add_document(
        &self,
        collection: &str,
        fields: Fields,
    ) -> impl Future<Output = Result<String>> + Send;

    /// Create or fully overwrite the document at `path`.
    fn set_document(&self, path: &str, fields: Fields) -> impl Future<Output = Result<()>> + Send;

    /// Delete the document at `path`.
    fn delete_document(&self, path: &str) -> impl Future<Output = Result<()>> + Send;
}

/// Split a document path into its parent collection and document id.
pub(crate) fn split_document_path(path: &str) -> Result<(&str, &str)> {
    let path = path.trim_matches('/');
    match path.rsplit_once('/') {
        Some((collection, id)) if !collection.is_empty() && !id.is_empty() => Ok((collection, id)),
        _ => Err(crate::Error::InvalidInput(format!(
            "'{path}' is not a document path"
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn split_document_path_returns_collection_and_id() {
        let (collection, id) = split_document_path("userDiaries/u1/diaries/abc").unwrap();
        assert_eq!(collection, "userDiaries/u1/diaries");
        assert_eq!(id, "abc");
    }

    #[test]
    fn split_document_path_rejects_bare_collection() {
        assert!(split_document_path("userInfo").is_err());
        assert!(split_document_path("userInfo/").is_err());
    }
}
