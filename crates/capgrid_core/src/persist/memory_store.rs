//! In-process snapshot store for tests and ephemeral sessions.

use super::{SnapshotError, SnapshotResult, SnapshotStore};
use std::collections::BTreeMap;
use std::sync::Mutex;

/// Snapshot store backed by a process-local map.
#[derive(Debug, Default)]
pub struct MemorySnapshotStore {
    slots: Mutex<BTreeMap<String, String>>,
    fail_writes: bool,
}

impl MemorySnapshotStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store whose writes always fail; reads still work.
    pub fn failing_writes() -> Self {
        Self {
            slots: Mutex::default(),
            fail_writes: true,
        }
    }

    /// Store pre-populated with raw slot payloads.
    pub fn with_slots<'a>(slots: impl IntoIterator<Item = (&'a str, &'a str)>) -> Self {
        let map = slots
            .into_iter()
            .map(|(key, payload)| (key.to_string(), payload.to_string()))
            .collect();
        Self {
            slots: Mutex::new(map),
            fail_writes: false,
        }
    }

    /// Number of populated slots.
    pub fn len(&self) -> usize {
        self.slots.lock().map_or(0, |slots| slots.len())
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl SnapshotStore for MemorySnapshotStore {
    fn read(&self, key: &str) -> SnapshotResult<Option<String>> {
        let slots = self
            .slots
            .lock()
            .map_err(|_| SnapshotError::Unavailable("memory store lock poisoned"))?;
        Ok(slots.get(key).cloned())
    }

    fn write(&self, key: &str, payload: &str) -> SnapshotResult<()> {
        if self.fail_writes {
            return Err(SnapshotError::Unavailable("writes disabled"));
        }
        let mut slots = self
            .slots
            .lock()
            .map_err(|_| SnapshotError::Unavailable("memory store lock poisoned"))?;
        slots.insert(key.to_string(), payload.to_string());
        Ok(())
    }

    fn clear(&self) -> SnapshotResult<()> {
        let mut slots = self
            .slots
            .lock()
            .map_err(|_| SnapshotError::Unavailable("memory store lock poisoned"))?;
        slots.clear();
        Ok(())
    }
}
