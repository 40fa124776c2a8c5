use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::warn;

pub const DEFAULT_CONFIG_FILE: &str = "config.json";

/// Remembers the timer file used last.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct SessionConfig {
    #[serde(default)]
    pub last_file: Option<PathBuf>,
}

impl SessionConfig {
    pub fn with_last_file<P: AsRef<Path>>(p: P) -> Self {
        Self {
            last_file: Some(p.as_ref().to_path_buf()),
        }
    }

    /// The remembered file, if one is set and still exists on disk.
    pub fn existing_last_file(&self) -> Option<&Path> {
        self.last_file
            .as_deref()
            .filter(|p| !p.as_os_str().is_empty() && p.is_file())
    }
}

pub trait SessionStore {
    fn load(&self) -> SessionConfig;
    fn save(&self, cfg: &SessionConfig) -> std::io::Result<()>;
    fn path(&self) -> &Path;
}

#[derive(Debug, Clone)]
pub struct FileSessionStore {
    path: PathBuf,
}

impl FileSessionStore {
    #[allow(clippy::new_without_default)]
    pub fn new() -> Self {
        Self::with_path(DEFAULT_CONFIG_FILE)
    }

    pub fn with_path<P: AsRef<Path>>(p: P) -> Self {
        Self {
            path: p.as_ref().to_path_buf(),
        }
    }
}

impl Default for FileSessionStore {
    fn default() -> Self {
        Self::new()
    }
}

impl SessionStore for FileSessionStore {
    fn load(&self) -> SessionConfig {
        match fs::read(&self.path) {
            Ok(bytes) => match serde_json::from_slice::<SessionConfig>(&bytes) {
                Ok(cfg) => cfg,
                Err(e) => {
                    warn!(path = %self.path.display(), "ignoring unreadable session config: {e}");
                    SessionConfig::default()
                }
            },
            Err(_) => SessionConfig::default(),
        }
    }

    fn save(&self, cfg: &SessionConfig) -> std::io::Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        let data = serde_json::to_vec(cfg)?;
        fs::write(&self.path, data)
    }

    fn path(&self) -> &Path {
        &self.path
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn roundtrip_session_config() {
        let dir = tempdir().unwrap();
        let store = FileSessionStore::with_path(dir.path().join("config.json"));
        let cfg = SessionConfig::with_last_file("/tmp/timers.json");
        store.save(&cfg).unwrap();
        assert_eq!(store.load(), cfg);
    }

    #[test]
    fn written_as_last_file_key() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.json");
        let store = FileSessionStore::with_path(&path);
        store.save(&SessionConfig::with_last_file("t.json")).unwrap();

        let value: serde_json::Value = serde_json::from_slice(&fs::read(&path).unwrap()).unwrap();
        assert_eq!(value, serde_json::json!({ "last_file": "t.json" }));
    }

    #[test]
    fn missing_or_garbled_config_reads_as_default() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.json");
        let store = FileSessionStore::with_path(&path);
        assert_eq!(store.load(), SessionConfig::default());

        fs::write(&path, b"{not json").unwrap();
        assert_eq!(store.load(), SessionConfig::default());

        fs::write(&path, b"{}").unwrap();
        assert_eq!(store.load().last_file, None);
    }

    #[test]
    fn save_creates_parent_dirs() {
        let dir = tempdir().unwrap();
        let store = FileSessionStore::with_path(dir.path().join("nested").join("config.json"));
        store.save(&SessionConfig::default()).unwrap();
        assert!(store.path().is_file());
    }

    #[test]
    fn existing_last_file_checks_disk() {
        let dir = tempdir().unwrap();
        let timers = dir.path().join("timers.json");
        let cfg = SessionConfig::with_last_file(&timers);
        assert_eq!(cfg.existing_last_file(), None);

        fs::write(&timers, b"{}").unwrap();
        assert_eq!(cfg.existing_last_file(), Some(timers.as_path()));

        assert_eq!(SessionConfig::with_last_file("").existing_last_file(), None);
    }
}
