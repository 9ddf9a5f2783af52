use crate::filesystem::secure::write_with_backups_n;
use crate::vault::ports::KeyValueStore;
use anyhow::{anyhow, Context, Result};
use std::fs;
use std::path::{Path, PathBuf};

/// Key-value storage backed by one `<key>.json` file per key inside a data directory.
pub struct FileKeyValueStore {
    dir: PathBuf,
    backups: usize,
}

impl FileKeyValueStore {
    pub fn new(dir: PathBuf) -> Self {
        Self { dir, backups: 2 }
    }

    pub fn new_with_backups(dir: PathBuf, backups: usize) -> Self {
        Self { dir, backups }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn path_for(&self, key: &str) -> Result<PathBuf> {
        let valid = !key.is_empty()
            && key.chars().all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-');
        if !valid {
            return Err(anyhow!("invalid storage key \"{key}\""));
        }
        Ok(self.dir.join(format!("{key}.json")))
    }
}

impl KeyValueStore for FileKeyValueStore {
    fn get(&self, key: &str) -> Result<Option<Vec<u8>>> {
        let path = self.path_for(key)?;
        if !path.exists() {
            return Ok(None);
        }
        let bytes = fs::read(&path).with_context(|| format!("Failed to read {}", path.display()))?;
        Ok(Some(bytes))
    }

    fn set(&self, key: &str, bytes: &[u8]) -> Result<()> {
        let path = self.path_for(key)?;
        write_with_backups_n(&path, bytes, self.backups)
    }
}
