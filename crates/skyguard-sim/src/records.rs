//! Best-run record persistence.
//!
//! The store is a plain key/value interface so hosts can back it with
//! whatever they have. Failures never reach gameplay: reads fall back to the
//! zero record and writes are logged and dropped.

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use std::time::{SystemTime, UNIX_EPOCH};

use log::{debug, warn};

use skyguard_core::constants::RECORD_KEY;
use skyguard_core::error::StoreError;
use skyguard_core::score::{merge_record, Record, RecordUpdate, RunStats};

/// Key/value persistence for the record.
pub trait RecordStore: Send {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError>;
    fn set(&self, key: &str, value: &str) -> Result<(), StoreError>;
}

/// One JSON file per key inside a directory.
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    dir: PathBuf,
}

impl JsonFileStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{key}.json"))
    }
}

impl RecordStore for JsonFileStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        match fs::read_to_string(self.path_for(key)) {
            Ok(raw) => Ok(Some(raw)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StoreError> {
        fs::create_dir_all(&self.dir)?;
        fs::write(self.path_for(key), value)?;
        Ok(())
    }
}

/// Shared in-memory store. Clones see the same data.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    data: Arc<Mutex<HashMap<String, String>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn raw(&self, key: &str) -> Option<String> {
        self.data
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .get(key)
            .cloned()
    }
}

impl RecordStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        Ok(self.raw(key))
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StoreError> {
        self.data
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .insert(key.to_string(), value.to_string());
        Ok(())
    }
}

/// No storage available: nothing is read, every write fails.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullStore;

impl RecordStore for NullStore {
    fn get(&self, _key: &str) -> Result<Option<String>, StoreError> {
        Ok(None)
    }

    fn set(&self, _key: &str, _value: &str) -> Result<(), StoreError> {
        Err(StoreError::Unavailable)
    }
}

/// Current record, or the zero record if missing or unreadable.
pub fn load_record(store: &dyn RecordStore) -> Record {
    let raw = match store.get(RECORD_KEY) {
        Ok(Some(raw)) => raw,
        Ok(None) => return Record::default(),
        Err(e) => {
            warn!("reading record failed: {e}");
            return Record::default();
        }
    };
    serde_json::from_str(&raw).unwrap_or_else(|e| {
        warn!("stored record is corrupt ({e}); starting from zero");
        Record::default()
    })
}

/// Merge a finished run into the stored record. Writes only on change.
pub fn update_record(store: &dyn RecordStore, run: &RunStats, now_secs: u64) -> RecordUpdate {
    let update = merge_record(load_record(store), run, now_secs);
    if update.changed {
        let written = serde_json::to_string(&update.record)
            .map_err(StoreError::from)
            .and_then(|json| store.set(RECORD_KEY, &json));
        match written {
            Ok(()) => debug!("record updated: {:?}", update.record),
            Err(e) => warn!("saving record failed: {e}"),
        }
    }
    update
}

/// Wall clock in unix seconds.
pub fn unix_now_secs() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0)
}

/// Wall clock in unix milliseconds.
pub fn unix_now_ms() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run(waves: u32, kills: u32, leaks: u32) -> RunStats {
        RunStats {
            waves_completed: waves,
            kills,
            leaks,
            ..RunStats::default()
        }
    }

    #[test]
    fn memory_store_round_trip() {
        let store = MemoryStore::new();
        assert_eq!(load_record(&store), Record::default());

        let update = update_record(&store, &run(5, 40, 2), 100);
        assert_eq!(update.score, 6360);
        assert!(update.new_best_score);
        assert_eq!(load_record(&store).best_score, 6360);
        assert_eq!(load_record(&store).updated_at, 100);
    }

    #[test]
    fn unchanged_record_is_not_rewritten() {
        let store = MemoryStore::new();
        update_record(&store, &run(2, 10, 0), 100);
        let before = store.raw(RECORD_KEY);
        let update = update_record(&store, &run(1, 5, 0), 200);
        assert!(!update.changed);
        assert_eq!(store.raw(RECORD_KEY), before);
    }

    #[test]
    fn corrupt_record_reads_as_zero() {
        let store = MemoryStore::new();
        store.set(RECORD_KEY, "{not json").unwrap();
        assert_eq!(load_record(&store), Record::default());
        let update = update_record(&store, &run(1, 0, 0), 5);
        assert_eq!(update.record.best_score, 1000);
    }

    #[test]
    fn null_store_swallows_failures() {
        let update = update_record(&NullStore, &run(3, 3, 0), 7);
        assert!(update.changed);
        assert_eq!(update.record.best_score, 3120);
        assert_eq!(load_record(&NullStore), Record::default());
    }

    #[test]
    fn json_file_store_persists() {
        let dir = std::env::temp_dir().join("skyguard_record_store_test");
        let _ = fs::remove_dir_all(&dir);
        let store = JsonFileStore::new(&dir);
        assert_eq!(store.get(RECORD_KEY).unwrap(), None);

        update_record(&store, &run(4, 20, 1), 42);
        let reopened = JsonFileStore::new(&dir);
        let record = load_record(&reopened);
        assert_eq!(record.best_score, 4680);
        assert_eq!(record.best_waves, 4);
        assert_eq!(record.best_kills, 20);

        let _ = fs::remove_dir_all(&dir);
    }
}
