//! In-process document store used by tests and local demos.

use std::collections::{BTreeMap, HashSet};
use std::sync::{Arc, Mutex, MutexGuard};

use uuid::Uuid;

use super::{split_document_path, Document, DocumentStore, Fields};
use crate::{Error, Result};

/// Store operations that can be made to fail on purpose.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StoreOp {
    Get,
    List,
    Add,
    Set,
    Delete,
}

impl StoreOp {
    const fn is_write(self) -> bool {
        matches!(self, Self::Add | Self::Set | Self::Delete)
    }
}

#[derive(Debug, Default)]
struct State {
    collections: BTreeMap<String, BTreeMap<String, Fields>>,
    failing: HashSet<StoreOp>,
    calls: Vec<StoreOp>,
}

/// Shared in-memory document store. Clones see the same data.
#[derive(Debug, Clone, Default)]
pub struct MemoryDocumentStore {
    state: Arc<Mutex<State>>,
}

impl MemoryDocumentStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every subsequent call of `op` fail until cleared.
    pub fn fail_on(&self, op: StoreOp) {
        if let Ok(mut state) = self.state.lock() {
            state.failing.insert(op);
        }
    }

    pub fn clear_failures(&self) {
        if let Ok(mut state) = self.state.lock() {
            state.failing.clear();
        }
    }

    /// Every operation issued so far, in order.
    #[must_use]
    pub fn calls(&self) -> Vec<StoreOp> {
        self.state
            .lock()
            .map(|state| state.calls.clone())
            .unwrap_or_default()
    }

    /// Write a document verbatim, bypassing failure injection and call tracking.
    pub fn insert_raw(&self, collection: &str, id: &str, fields: Fields) {
        if let Ok(mut state) = self.state.lock() {
            state
                .collections
                .entry(collection.trim_matches('/').to_string())
                .or_default()
                .insert(id.to_string(), fields);
        }
    }

    /// Number of documents currently in `collection`.
    #[must_use]
    pub fn document_count(&self, collection: &str) -> usize {
        self.state
            .lock()
            .ok()
            .and_then(|state| {
                state
                    .collections
                    .get(collection.trim_matches('/'))
                    .map(BTreeMap::len)
            })
            .unwrap_or(0)
    }

    fn begin(&self, op: StoreOp) -> Result<MutexGuard<'_, State>> {
        let mut state = self.state.lock().map_err(|error| {
            let message = format!("memory store lock poisoned: {error}");
            if op.is_write() {
                Error::StoreWrite(message)
            } else {
                Error::StoreRead(message)
            }
        })?;
        state.calls.push(op);
        if state.failing.contains(&op) {
            let message = format!("injected {op:?} failure");
            return Err(if op.is_write() {
                Error::StoreWrite(message)
            } else {
                Error::StoreRead(message)
            });
        }
        Ok(state)
    }
}

impl DocumentStore for MemoryDocumentStore {
    async fn get_document(&self, path: &str) -> Result<Option<Document>> {
        let (collection, id) = split_document_path(path)?;
        let state = self.begin(StoreOp::Get)?;
        Ok(state
            .collections
            .get(collection)
            .and_then(|documents| documents.get(id))
            .map(|fields| Document::new(id, fields.clone())))
    }

    async fn list_documents(&self, collection: &str) -> Result<Vec<Document>> {
        let state = self.begin(StoreOp::List)?;
        Ok(state
            .collections
            .get(collection.trim_matches('/'))
            .map(|documents| {
                documents
                    .iter()
                    .map(|(id, fields)| Document::new(id.clone(), fields.clone()))
                    .collect()
            })
            .unwrap_or_default())
    }

    async fn add_document(&self, collection: &str, fields: Fields) -> Result<String> {
        let mut state = self.begin(StoreOp::Add)?;
        let id = Uuid::now_v7().simple().to_string();
        state
            .collections
            .entry(collection.trim_matches('/').to_string())
            .or_default()
            .insert(id.clone(), fields);
        Ok(id)
    }

    async fn set_document(&self, path: &str, fields: Fields) -> Result<()> {
        let (collection, id) = split_document_path(path)?;
        let mut state = self.begin(StoreOp::Set)?;
        state
            .collections
            .entry(collection.to_string())
            .or_default()
            .insert(id.to_string(), fields);
        Ok(())
    }

    async fn delete_document(&self, path: &str) -> Result<()> {
        let (collection, id) = split_document_path(path)?;
        let mut state = self.begin(StoreOp::Delete)?;
        if let Some(documents) = state.collections.get_mut(collection) {
            documents.remove(id);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fields(date: &str) -> Fields {
        Fields::builder().set("diaryDate", date).build()
    }

    #[tokio::test]
    async fn add_then_get_and_list() {
        let store = MemoryDocumentStore::new();
        let id = store
            .add_document("userDiaries/u1/diaries", fields("2024-01-01"))
            .await
            .unwrap();

        let document = store
            .get_document(&format!("userDiaries/u1/diaries/{id}"))
            .await
            .unwrap()
            .unwrap();
        assert_eq!(document.id, id);
        assert_eq!(document.fields.get("diaryDate"), Some("2024-01-01"));

        let listed = store.list_documents("userDiaries/u1/diaries").await.unwrap();
        assert_eq!(listed.len(), 1);
        assert!(store
            .list_documents("userDiaries/u2/diaries")
            .await
            .unwrap()
            .is_empty());
    }

    #[tokio::test]
    async fn set_overwrites_and_delete_removes() {
        let store = MemoryDocumentStore::new();
        store
            .set_document("userInfo/u1", fields("a"))
            .await
            .unwrap();
        store
            .set_document("userInfo/u1", fields("b"))
            .await
            .unwrap();
        let document = store.get_document("userInfo/u1").await.unwrap().unwrap();
        assert_eq!(document.fields.get("diaryDate"), Some("b"));

        store.delete_document("userInfo/u1").await.unwrap();
        assert!(store.get_document("userInfo/u1").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn injected_failures_use_read_and_write_kinds() {
        let store = MemoryDocumentStore::new();
        store.fail_on(StoreOp::List);
        store.fail_on(StoreOp::Add);

        assert!(matches!(
            store.list_documents("c").await,
            Err(Error::StoreRead(_))
        ));
        assert!(matches!(
            store.add_document("c", fields("x")).await,
            Err(Error::StoreWrite(_))
        ));
        assert_eq!(store.calls(), vec![StoreOp::List, StoreOp::Add]);

        store.clear_failures();
        assert!(store.add_document("c", fields("x")).await.is_ok());
    }
}
