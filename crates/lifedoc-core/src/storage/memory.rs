//! In-process blob store used by tests and local demos.

use std::collections::{BTreeMap, HashSet};
use std::sync::{Arc, Mutex, MutexGuard};

use super::{normalize_object_path, BlobStore};
use crate::{Error, Result};

/// Blob operations that can be made to fail on purpose.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BlobOp {
    Put,
    Delete,
    DownloadUrl,
}

impl BlobOp {
    fn error(self, message: String) -> Error {
        match self {
            Self::Put => Error::BlobUpload(message),
            Self::Delete => Error::BlobDelete(message),
            Self::DownloadUrl => Error::BlobUrlResolution(message),
        }
    }
}

#[derive(Debug, Default)]
struct State {
    objects: BTreeMap<String, (Vec<u8>, String)>,
    failing: HashSet<BlobOp>,
}

/// Shared in-memory blob store. Clones see the same objects.
#[derive(Debug, Clone, Default)]
pub struct MemoryBlobStore {
    state: Arc<Mutex<State>>,
}

impl MemoryBlobStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn fail_on(&self, op: BlobOp) {
        if let Ok(mut state) = self.state.lock() {
            state.failing.insert(op);
        }
    }

    pub fn clear_failures(&self) {
        if let Ok(mut state) = self.state.lock() {
            state.failing.clear();
        }
    }

    #[must_use]
    pub fn contains(&self, path: &str) -> bool {
        self.state
            .lock()
            .is_ok_and(|state| state.objects.contains_key(path.trim_matches('/')))
    }

    /// Stored object paths in lexical order.
    #[must_use]
    pub fn paths(&self) -> Vec<String> {
        self.state
            .lock()
            .map(|state| state.objects.keys().cloned().collect())
            .unwrap_or_default()
    }

    #[must_use]
    pub fn content_type(&self, path: &str) -> Option<String> {
        self.state.lock().ok().and_then(|state| {
            state
                .objects
                .get(path.trim_matches('/'))
                .map(|(_, content_type)| content_type.clone())
        })
    }

    fn begin(&self, op: BlobOp) -> Result<MutexGuard<'_, State>> {
        let state = self
            .state
            .lock()
            .map_err(|error| op.error(format!("memory blob store lock poisoned: {error}")))?;
        if state.failing.contains(&op) {
            return Err(op.error(format!("injected {op:?} failure")));
        }
        Ok(state)
    }
}

impl BlobStore for MemoryBlobStore {
    async fn put(&self, path: &str, bytes: Vec<u8>, content_type: &str) -> Result<()> {
        let path = normalize_object_path(path)?;
        let mut state = self.begin(BlobOp::Put)?;
        state.objects.insert(path, (bytes, content_type.to_string()));
        Ok(())
    }

    async fn delete(&self, path: &str) -> Result<()> {
        let path = normalize_object_path(path)?;
        let mut state = self.begin(BlobOp::Delete)?;
        state.objects.remove(&path);
        Ok(())
    }

    async fn download_url(&self, path: &str) -> Result<String> {
        let path = normalize_object_path(path)?;
        let state = self.begin(BlobOp::DownloadUrl)?;
        if !state.objects.contains_key(&path) {
            return Err(Error::BlobUrlResolution(format!("no object at {path}")));
        }
        Ok(format!("memory://blobs/{path}"))
    }
}
