//! Pluggable persistence for computed solar-term years.
//!
//! The term table treats persistence as an injected collaborator holding one
//! opaque string payload (the JSON map described in [`super::TermTable`]).
//! Backends only move the payload; all decoding tolerance lives in the
//! table. Store failures never propagate out of the core: a failed read is
//! "no cache", a failed write is logged and dropped.

use std::cell::RefCell;
use std::fs;
use std::io;
use std::path::PathBuf;
use std::rc::Rc;

use thiserror::Error;

/// Errors a store backend may report.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("store backend error: {0}")]
    Backend(String),
}

/// A persistence backend for the term table payload.
///
/// `load` is called once, when the table is constructed; `save` after every
/// newly computed year, with the full payload.
pub trait TermStore {
    /// Reads the whole persisted payload, `None` when nothing was stored yet.
    fn load(&self) -> Result<Option<String>, StoreError>;

    /// Replaces the persisted payload.
    fn save(&self, payload: &str) -> Result<(), StoreError>;
}

/// A store that never remembers anything.
///
/// The default choice for hosts that do not want persistence; every year is
/// recomputed once per process.
#[derive(Debug, Default)]
pub struct NullStore;

impl TermStore for NullStore {
    fn load(&self) -> Result<Option<String>, StoreError> {
        Ok(None)
    }

    fn save(&self, _payload: &str) -> Result<(), StoreError> {
        Ok(())
    }
}

/// An in-memory store.
///
/// Cloning shares the underlying payload, so a handle kept by the host (or a
/// test) observes what the table persisted.
///
/// # Example
///
/// ```
/// use sajucal::{MemoryStore, TermStore};
///
/// let store = MemoryStore::new();
/// let handle = store.clone();
/// store.save("{}").unwrap();
/// assert_eq!(Some("{}".to_owned()), handle.load().unwrap());
/// ```
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    payload: Rc<RefCell<Option<String>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current payload, if any.
    pub fn payload(&self) -> Option<String> {
        self.payload.borrow().clone()
    }
}

impl TermStore for MemoryStore {
    fn load(&self) -> Result<Option<String>, StoreError> {
        Ok(self.payload.borrow().clone())
    }

    fn save(&self, payload: &str) -> Result<(), StoreError> {
        *self.payload.borrow_mut() = Some(payload.to_owned());
        Ok(())
    }
}

/// A store backed by a single file on disk.
///
/// A missing file reads as an empty store; any other I/O failure surfaces as
/// [`StoreError::Io`] and is absorbed by the table.
#[derive(Debug)]
pub struct FileStore {
    path: PathBuf,
}

impl FileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl TermStore for FileStore {
    fn load(&self) -> Result<Option<String>, StoreError> {
        match fs::read_to_string(&self.path) {
            Ok(payload) => Ok(Some(payload)),
            Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(err) => Err(err.into()),
        }
    }

    fn save(&self, payload: &str) -> Result<(), StoreError> {
        fs::write(&self.path, payload)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn memory_store_roundtrip() {
        let store = MemoryStore::new();
        assert_eq!(None, store.load().unwrap());
        store.save("payload").unwrap();
        assert_eq!(Some("payload".to_owned()), store.load().unwrap());
    }

    #[test]
    fn memory_store_clones_share_payload() {
        let store = MemoryStore::new();
        let handle = store.clone();
        store.save("shared").unwrap();
        assert_eq!(Some("shared".to_owned()), handle.payload());
    }

    #[test]
    fn file_store_missing_file_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::new(dir.path().join("terms.json"));
        assert_eq!(None, store.load().unwrap());
    }

    #[test]
    fn file_store_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::new(dir.path().join("terms.json"));
        store.save("{\"2024\":[]}").unwrap();
        assert_eq!(Some("{\"2024\":[]}".to_owned()), store.load().unwrap());
    }

    #[test]
    fn null_store_forgets() {
        let store = NullStore;
        store.save("anything").unwrap();
        assert_eq!(None, store.load().unwrap());
    }
}
