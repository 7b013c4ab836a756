//! Blob store implementations backing the persistent cache tier.

use std::collections::HashMap;
use std::fs::{self, File};
use std::io::Write;
use std::path::PathBuf;

use crate::traits::{CacheStore, StoreError};

/// Volatile in-memory store. The deterministic fake for tests, also usable
/// when no persistence is wanted.
#[derive(Debug, Default)]
pub struct MemoryStore {
    map: HashMap<String, String>,
}

impl CacheStore for MemoryStore {
    fn get(&self, key: &str) -> Option<String> {
        self.map.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StoreError> {
        self.map.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn clear(&mut self) {
        self.map.clear();
    }
}

/// File-per-key blob store.
///
/// Keys are hex digests, so they are safe filenames as-is. Writes go to a
/// temp path and rename into place; unreadable files read as absent.
#[derive(Debug)]
pub struct FsStore {
    dir: PathBuf,
}

impl FsStore {
    pub fn new(dir: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let dir = dir.into();
        fs::create_dir_all(&dir)?;
        Ok(Self { dir })
    }

    fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{key}.json"))
    }
}

impl CacheStore for FsStore {
    fn get(&self, key: &str) -> Option<String> {
        fs::read_to_string(self.path_for(key)).ok()
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StoreError> {
        let dest = self.path_for(key);
        let tmp = dest.with_extension("tmp");
        let mut file = File::create(&tmp)?;
        file.write_all(value.as_bytes())?;
        file.flush()?;
        fs::rename(tmp, dest)?;
        Ok(())
    }

    fn clear(&mut self) {
        if let Ok(entries) = fs::read_dir(&self.dir) {
            for entry in entries.flatten() {
                let _ = fs::remove_file(entry.path());
            }
        }
    }
}
