//! Save slots backed by a [`KeyValueStore`].
//!
//! Three slots live under `save0`..`save2`; the active slot index lives
//! under `saveFile`. The in-memory copy of each slot is the source of truth
//! for the UI, so a failed write never loses what the player sees.

use crate::store::{KeyValueStore, StoreError};

pub const SLOT_COUNT: usize = 3;

const ACTIVE_KEY: &str = "saveFile";

fn slot_key(slot: usize) -> String {
    format!("save{slot}")
}

pub struct SaveSlots<S: KeyValueStore> {
    store: S,
    files: [String; SLOT_COUNT],
    active: usize,
}

impl<S: KeyValueStore> SaveSlots<S> {
    /// Read every slot, writing `fresh` into slots that do not exist yet and
    /// `"0"` into a missing active index.
    pub fn load(mut store: S, fresh: &str) -> Self {
        let files = std::array::from_fn(|slot| {
            let key = slot_key(slot);
            store.get_or_init(&key, fresh).unwrap_or_else(|e| {
                log::warn!("could not initialize `{key}`: {e}");
                fresh.to_string()
            })
        });

        let raw_active = store.get_or_init(ACTIVE_KEY, "0").unwrap_or_else(|e| {
            log::warn!("could not initialize `{ACTIVE_KEY}`: {e}");
            "0".to_string()
        });
        let active = match raw_active.trim().parse::<usize>() {
            Ok(slot) if slot < SLOT_COUNT => slot,
            _ => {
                log::warn!("active slot {raw_active:?} is invalid, using slot 0");
                0
            }
        };

        Self {
            store,
            files,
            active,
        }
    }

    pub fn active(&self) -> usize {
        self.active
    }

    pub fn slot_count(&self) -> usize {
        SLOT_COUNT
    }

    /// Encoded contents of `slot`, if it exists.
    pub fn raw(&self, slot: usize) -> Option<&str> {
        self.files.get(slot).map(String::as_str)
    }

    pub fn active_raw(&self) -> &str {
        &self.files[self.active]
    }

    /// Overwrite `slot` in memory and in the store.
    pub fn write(&mut self, slot: usize, encoded: &str) -> Result<(), StoreError> {
        let Some(file) = self.files.get_mut(slot) else {
            return Ok(());
        };
        *file = encoded.to_string();
        self.store.set(&slot_key(slot), encoded)
    }

    pub fn write_active(&mut self, encoded: &str) -> Result<(), StoreError> {
        self.write(self.active, encoded)
    }

    /// Make `slot` the active one and remember the choice. Out-of-range
    /// slots are ignored.
    pub fn select(&mut self, slot: usize) -> Result<(), StoreError> {
        if slot >= SLOT_COUNT {
            return Ok(());
        }
        self.active = slot;
        self.store.set(ACTIVE_KEY, &slot.to_string())
    }

    #[cfg(test)]
    pub fn store(&self) -> &S {
        &self.store
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::testing::ReadOnlyStore;
    use crate::store::MemoryStore;

    const FRESH: &str = "dark|main|0|10|1|0|0|2|0|4|0|5|0";

    #[test]
    fn first_run_initializes_every_key() {
        let slots = SaveSlots::load(MemoryStore::new(), FRESH);
        assert_eq!(slots.active(), 0);
        for slot in 0..SLOT_COUNT {
            assert_eq!(slots.raw(slot), Some(FRESH));
            assert_eq!(slots.store().get(&format!("save{slot}")), Some(FRESH.to_string()));
        }
        assert_eq!(slots.store().get("saveFile"), Some("0".to_string()));
    }

    #[test]
    fn existing_slots_are_kept() {
        let store = MemoryStore::with_entries([
            ("save1", "light|main|5"),
            ("saveFile", "1"),
        ]);
        let slots = SaveSlots::load(store, FRESH);
        assert_eq!(slots.active(), 1);
        assert_eq!(slots.active_raw(), "light|main|5");
        assert_eq!(slots.raw(0), Some(FRESH));
        assert_eq!(slots.raw(3), None);
    }

    #[test]
    fn invalid_active_index_uses_slot_zero() {
        for raw in ["7", "x", "-1", ""] {
            let store = MemoryStore::with_entries([("saveFile", raw)]);
            let slots = SaveSlots::load(store, FRESH);
            assert_eq!(slots.active(), 0, "saveFile = {raw:?}");
        }
    }

    #[test]
    fn write_updates_memory_and_store() {
        let mut slots = SaveSlots::load(MemoryStore::new(), FRESH);
        slots.write(2, "light|options").unwrap();
        assert_eq!(slots.raw(2), Some("light|options"));
        assert_eq!(slots.store().get("save2"), Some("light|options".to_string()));
        assert_eq!(slots.raw(0), Some(FRESH));
    }

    #[test]
    fn select_persists_active_index() {
        let mut slots = SaveSlots::load(MemoryStore::new(), FRESH);
        slots.select(2).unwrap();
        assert_eq!(slots.active(), 2);
        assert_eq!(slots.store().get("saveFile"), Some("2".to_string()));
        slots.write_active("x").unwrap();
        assert_eq!(slots.raw(2), Some("x"));
    }

    #[test]
    fn select_out_of_range_is_ignored() {
        let mut slots = SaveSlots::load(MemoryStore::new(), FRESH);
        slots.select(5).unwrap();
        assert_eq!(slots.active(), 0);
    }

    #[test]
    fn failing_store_still_loads_and_keeps_memory_copy() {
        let mut slots = SaveSlots::load(ReadOnlyStore::default(), FRESH);
        assert_eq!(slots.active_raw(), FRESH);
        assert_eq!(slots.write_active("light|main"), Err(StoreError::Unavailable));
        assert_eq!(slots.active_raw(), "light|main");
    }
}
