use crate::vault::ports::KeyValueStore;
use anyhow::{anyhow, Result};
use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

/// In-process key-value storage. Clones share the same map, so a test can keep a handle
/// and inspect or corrupt what the manager wrote.
#[derive(Clone, Default)]
pub struct MemoryKeyValueStore {
    data: Arc<Mutex<HashMap<String, Vec<u8>>>>,
    fail_writes: Arc<AtomicBool>,
    fail_writes_for: Arc<Mutex<HashSet<String>>>,
    fail_reads: Arc<AtomicBool>,
}

impl MemoryKeyValueStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert_raw(&self, key: &str, bytes: &[u8]) {
        let mut guard = self.data.lock().unwrap_or_else(|p| p.into_inner());
        guard.insert(key.to_string(), bytes.to_vec());
    }

    pub fn raw(&self, key: &str) -> Option<Vec<u8>> {
        let guard = self.data.lock().unwrap_or_else(|p| p.into_inner());
        guard.get(key).cloned()
    }

    /// Make every subsequent `set` fail until switched off again.
    pub fn fail_writes(&self, on: bool) {
        self.fail_writes.store(on, Ordering::SeqCst);
    }

    /// Make `set` fail for `key` only; other keys keep writing.
    pub fn fail_writes_for(&self, key: &str, on: bool) {
        let mut keys = self.fail_writes_for.lock().unwrap_or_else(|p| p.into_inner());
        if on {
            keys.insert(key.to_string());
        } else {
            keys.remove(key);
        }
    }

    fn write_blocked(&self, key: &str) -> bool {
        self.fail_writes.load(Ordering::SeqCst)
            || self
                .fail_writes_for
                .lock()
                .unwrap_or_else(|p| p.into_inner())
                .contains(key)
    }

    pub fn fail_reads(&self, on: bool) {
        self.fail_reads.store(on, Ordering::SeqCst);
    }
}

impl KeyValueStore for MemoryKeyValueStore {
    fn get(&self, key: &str) -> Result<Option<Vec<u8>>> {
        if self.fail_reads.load(Ordering::SeqCst) {
            return Err(anyhow!("storage unavailable"));
        }
        Ok(self.raw(key))
    }

    fn set(&self, key: &str, bytes: &[u8]) -> Result<()> {
        if self.write_blocked(key) {
            return Err(anyhow!("storage is read-only for {key}"));
        }
        self.insert_raw(key, bytes);
        Ok(())
    }
}
