//! In-memory persistence slot.

use super::{PersistenceSlot, SlotError, SlotResult};
use std::collections::HashMap;

/// Map-backed slot for tests and embedders without durable storage.
///
/// Records every successful write so callers can assert sync behavior.
#[derive(Debug, Clone, Default)]
pub struct MemorySlot {
    values: HashMap<String, String>,
    writes: Vec<(String, String)>,
    fail_saves: bool,
}

impl MemorySlot {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a slot that already holds `value` under `key`.
    pub fn with_value(key: impl Into<String>, value: impl Into<String>) -> Self {
        let mut slot = Self::default();
        slot.values.insert(key.into(), value.into());
        slot
    }

    /// Makes every subsequent `save` fail with [`SlotError::Unavailable`].
    pub fn fail_saves(&mut self, fail: bool) {
        self.fail_saves = fail;
    }

    /// Returns the current value for `key` without going through the trait.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.values.get(key).map(String::as_str)
    }

    /// Successful writes in call order.
    pub fn writes(&self) -> &[(String, String)] {
        &self.writes
    }

    pub fn save_count(&self) -> usize {
        self.writes.len()
    }
}

impl PersistenceSlot for MemorySlot {
    fn load(&self, key: &str) -> SlotResult<Option<String>> {
        Ok(self.values.get(key).cloned())
    }

    fn save(&mut self, key: &str, value: &str) -> SlotResult<()> {
        if self.fail_saves {
            return Err(SlotError::Unavailable("memory slot rejects writes".to_string()));
        }
        self.values.insert(key.to_string(), value.to_string());
        self.writes.push((key.to_string(), value.to_string()));
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::MemorySlot;
    use crate::slot::PersistenceSlot;

    #[test]
    fn load_returns_none_for_unknown_key() {
        let slot = MemorySlot::new();
        assert_eq!(slot.load("tasks").unwrap(), None);
    }

    #[test]
    fn failed_save_is_not_recorded() {
        let mut slot = MemorySlot::new();
        slot.fail_saves(true);

        assert!(slot.save("tasks", "[]").is_err());
        assert_eq!(slot.save_count(), 0);
        assert_eq!(slot.get("tasks"), None);
    }
}
