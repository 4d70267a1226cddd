//! Filesystem-backed blob store for local development.

use crate::error::{ReportError, Result};
use crate::store::BlobStore;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

/// Blob store mapping containers to subdirectories of a root directory.
///
/// Blob names are treated as plain file names; path separators in a name are
/// rejected so a name can never escape its container directory.
#[derive(Debug, Clone)]
pub struct DirStore {
    root: PathBuf,
}

impl DirStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    fn object_path(&self, container: &str, name: &str) -> Result<PathBuf> {
        for part in [container, name] {
            if part.is_empty() || part.contains('/') || part.contains('\\') || part.contains("..") {
                return Err(ReportError::Other(format!(
                    "invalid blob path component '{part}'"
                )));
            }
        }
        Ok(self.root.join(container).join(name))
    }
}

impl BlobStore for DirStore {
    fn put(&self, container: &str, name: &str, data: &[u8]) -> Result<()> {
        let path = self.object_path(container, name)?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&path, data)?;
        Ok(())
    }

    fn get(&self, container: &str, name: &str) -> Result<Vec<u8>> {
        let path = self.object_path(container, name)?;
        match fs::read(&path) {
            Ok(data) => Ok(data),
            Err(e) if e.kind() == ErrorKind::NotFound => Err(ReportError::BlobNotFound {
                container: container.to_string(),
                name: name.to_string(),
            }),
            Err(e) => Err(e.into()),
        }
    }

    fn fetch_to_local(&self, container: &str, name: &str, dest: &Path) -> Result<()> {
        let path = self.object_path(container, name)?;
        match fs::copy(&path, dest) {
            Ok(_) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Err(ReportError::BlobNotFound {
                container: container.to_string(),
                name: name.to_string(),
            }),
            Err(e) => Err(e.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_put_creates_container_directory() {
        let dir = tempfile::tempdir().unwrap();
        let store = DirStore::new(dir.path());
        store.put("reports", "a.wav", b"bytes").unwrap();
        assert!(dir.path().join("reports").join("a.wav").exists());
        assert_eq!(store.get("reports", "a.wav").unwrap(), b"bytes");
    }

    #[test]
    fn test_get_missing_is_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let store = DirStore::new(dir.path());
        let err = store.get("reports", "missing").unwrap_err();
        assert!(matches!(err, ReportError::BlobNotFound { .. }));
    }

    #[test]
    fn test_put_overwrites() {
        let dir = tempfile::tempdir().unwrap();
        let store = DirStore::new(dir.path());
        store.put("c", "a", b"first").unwrap();
        store.put("c", "a", b"second").unwrap();
        assert_eq!(store.get("c", "a").unwrap(), b"second");
    }

    #[test]
    fn test_rejects_path_traversal_in_name() {
        let dir = tempfile::tempdir().unwrap();
        let store = DirStore::new(dir.path());
        assert!(store.put("c", "../escape", b"x").is_err());
        assert!(store.get("c/nested", "a").is_err());
    }

    #[test]
    fn test_fetch_to_local_copies_file() {
        let dir = tempfile::tempdir().unwrap();
        let store = DirStore::new(dir.path());
        store.put("c", "audio.wav", b"RIFF").unwrap();

        let dest = dir.path().join("scratch.wav");
        store.fetch_to_local("c", "audio.wav", &dest).unwrap();
        assert_eq!(fs::read(dest).unwrap(), b"RIFF");
    }
}
