use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::resource::ResourceData;

#[derive(Debug, Error)]
pub enum StateError {
    #[error("no data directory available for state files")]
    NoStateDir,

    #[error("state I/O error at '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("corrupt state file '{path}': {source}")]
    Corrupt {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("invalid instance name {0:?}")]
    InvalidName(String),
}

/// Declarative state on disk, one JSON file per resource instance:
/// `{root}/{resource_type}/{name}.json`.
#[derive(Debug, Clone)]
pub struct StateStore {
    root: PathBuf,
}

impl StateStore {
    /// Uses `<data dir>/tfvr/state`.
    pub fn open_default() -> Result<Self, StateError> {
        let base = dirs::data_dir().ok_or(StateError::NoStateDir)?;
        Ok(Self::at(base.join("tfvr").join("state")))
    }

    pub fn at(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn file(&self, resource_type: &str, name: &str) -> Result<PathBuf, StateError> {
        for part in [resource_type, name] {
            if part.is_empty() || part.contains(['/', '\\']) || part.starts_with('.') {
                return Err(StateError::InvalidName(part.to_string()));
            }
        }
        Ok(self.root.join(resource_type).join(format!("{}.json", name)))
    }

    pub fn load(&self, resource_type: &str, name: &str) -> Result<Option<ResourceData>, StateError> {
        let path = self.file(resource_type, name)?;
        let raw = match std::fs::read_to_string(&path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(None),
            Err(source) => return Err(StateError::Io { path, source }),
        };
        serde_json::from_str(&raw)
            .map(Some)
            .map_err(|source| StateError::Corrupt { path, source })
    }

    pub fn save(&self, resource_type: &str, name: &str, d: &ResourceData) -> Result<(), StateError> {
        let path = self.file(resource_type, name)?;
        if let Some(dir) = path.parent() {
            std::fs::create_dir_all(dir).map_err(|source| StateError::Io {
                path: dir.to_path_buf(),
                source,
            })?;
        }
        let raw = serde_json::to_string_pretty(d).map_err(|source| StateError::Corrupt {
            path: path.clone(),
            source,
        })?;
        std::fs::write(&path, raw).map_err(|source| StateError::Io { path, source })
    }

    /// Returns whether a state file was removed.
    pub fn remove(&self, resource_type: &str, name: &str) -> Result<bool, StateError> {
        let path = self.file(resource_type, name)?;
        match std::fs::remove_file(&path) {
            Ok(()) => Ok(true),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(false),
            Err(source) => Err(StateError::Io { path, source }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    const ROLE: &str = "vault_terraform_cloud_secret_role";

    fn role_state() -> ResourceData {
        let mut d = ResourceData::from_attributes(
            json!({"name": "admin", "backend": "tfc", "organization": "acme"})
                .as_object()
                .cloned()
                .unwrap(),
        );
        d.set_id("tfc/role/admin");
        d
    }

    #[test]
    fn test_load_missing_is_none() {
        let dir = tempfile::tempdir().unwrap();
        let store = StateStore::at(dir.path());
        assert!(store.load(ROLE, "admin").unwrap().is_none());
    }

    #[test]
    fn test_save_then_load() {
        let dir = tempfile::tempdir().unwrap();
        let store = StateStore::at(dir.path());

        store.save(ROLE, "admin", &role_state()).unwrap();

        assert!(dir.path().join(ROLE).join("admin.json").exists());
        assert_eq!(store.load(ROLE, "admin").unwrap(), Some(role_state()));
    }

    #[test]
    fn test_remove() {
        let dir = tempfile::tempdir().unwrap();
        let store = StateStore::at(dir.path());
        store.save(ROLE, "admin", &role_state()).unwrap();

        assert!(store.remove(ROLE, "admin").unwrap());
        assert!(!store.remove(ROLE, "admin").unwrap());
        assert!(store.load(ROLE, "admin").unwrap().is_none());
    }

    #[test]
    fn test_corrupt_state_file() {
        let dir = tempfile::tempdir().unwrap();
        let store = StateStore::at(dir.path());
        std::fs::create_dir_all(dir.path().join(ROLE)).unwrap();
        std::fs::write(dir.path().join(ROLE).join("admin.json"), "{not json").unwrap();

        let err = store.load(ROLE, "admin").unwrap_err();
        assert!(matches!(err, StateError::Corrupt { .. }));
    }

    #[test]
    fn test_rejects_path_traversal_names() {
        let dir = tempfile::tempdir().unwrap();
        let store = StateStore::at(dir.path());

        for name in ["", "../escape", "a/b", ".hidden"] {
            let err = store.load(ROLE, name).unwrap_err();
            assert!(matches!(err, StateError::InvalidName(_)));
        }
    }
}
