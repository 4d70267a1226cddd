//! In-process blob store for tests and offline runs.

use crate::error::{ReportError, Result};
use crate::store::BlobStore;
use std::collections::HashMap;
use std::sync::Mutex;

/// Blob store backed by a process-local map.
///
/// Containers spring into existence on first `put`, matching the remote
/// backends where container provisioning is out of band.
#[derive(Debug, Default)]
pub struct MemoryStore {
    containers: Mutex<HashMap<String, HashMap<String, Vec<u8>>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether an object exists without fetching it. Test helper.
    pub fn contains(&self, container: &str, name: &str) -> bool {
        self.containers
            .lock()
            .map(|containers| {
                containers
                    .get(container)
                    .is_some_and(|c| c.contains_key(name))
            })
            .unwrap_or(false)
    }
}

impl BlobStore for MemoryStore {
    fn put(&self, container: &str, name: &str, data: &[u8]) -> Result<()> {
        let mut containers = self
            .containers
            .lock()
            .map_err(|_| ReportError::Other("memory store lock poisoned".to_string()))?;
        containers
            .entry(container.to_string())
            .or_default()
            .insert(name.to_string(), data.to_vec());
        Ok(())
    }

    fn get(&self, container: &str, name: &str) -> Result<Vec<u8>> {
        let containers = self
            .containers
            .lock()
            .map_err(|_| ReportError::Other("memory store lock poisoned".to_string()))?;
        containers
            .get(container)
            .and_then(|c| c.get(name))
            .cloned()
            .ok_or_else(|| ReportError::BlobNotFound {
                container: container.to_string(),
                name: name.to_string(),
            })
    }
}
