//! In-memory plan storage.

use std::sync::Mutex;

use super::{decode_plan, encode_plan, VisitStore};
use crate::{error::Result, models::Visit};

/// Keeps the encoded plan in memory.
///
/// Goes through the same JSON encoding as the SQLite store so that what
/// comes back from [`VisitStore::load`] is what a restart would see.
#[derive(Debug, Default)]
pub struct MemoryVisitStore {
    blob: Mutex<Option<String>>,
}

impl MemoryVisitStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a store that already holds the given raw blob.
    pub fn with_blob(blob: impl Into<String>) -> Self {
        Self {
            blob: Mutex::new(Some(blob.into())),
        }
    }

    /// The raw blob currently stored, if any.
    pub fn blob(&self) -> Option<String> {
        self.blob.lock().map(|b| b.clone()).unwrap_or_default()
    }
}

impl VisitStore for MemoryVisitStore {
    fn load(&self) -> Vec<Visit> {
        match self.blob() {
            Some(blob) => decode_plan(&blob),
            None => Vec::new(),
        }
    }

    fn save(&self, visits: &[Visit]) -> Result<()> {
        let encoded = encode_plan(visits)?;
        if let Ok(mut blob) = self.blob.lock() {
            *blob = Some(encoded);
        }
        Ok(())
    }
}
