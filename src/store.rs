//! String key-value persistence.
//!
//! Games never touch `localStorage` directly; they talk to a
//! [`KeyValueStore`] so the same code runs in the browser and in tests.

use std::collections::HashMap;

use thiserror::Error;

#[derive(Debug, Error, PartialEq)]
pub enum StoreError {
    #[error("storage is not available")]
    Unavailable,
    #[error("failed to write `{key}`: {reason}")]
    Write { key: String, reason: String },
}

pub trait KeyValueStore {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&mut self, key: &str, value: &str) -> Result<(), StoreError>;

    /// Read `key`, writing `default` first if it is absent.
    fn get_or_init(&mut self, key: &str, default: &str) -> Result<String, StoreError> {
        match self.get(key) {
            Some(value) => Ok(value),
            None => {
                log::info!("initializing missing key `{key}`");
                self.set(key, default)?;
                Ok(default.to_string())
            }
        }
    }
}

/// In-memory store. Used by tests and as a fallback when the browser
/// refuses storage access (private mode, sandboxed iframes).
#[derive(Debug, Default, Clone)]
pub struct MemoryStore {
    entries: HashMap<String, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    #[cfg(test)]
    pub fn with_entries<'a>(entries: impl IntoIterator<Item = (&'a str, &'a str)>) -> Self {
        Self {
            entries: entries
                .into_iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
        }
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Option<String> {
        self.entries.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StoreError> {
        self.entries.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

/// `window.localStorage`, falling back to memory when it is unavailable.
pub enum BrowserStore {
    Local(web_sys::Storage),
    Memory(MemoryStore),
}

impl BrowserStore {
    pub fn open() -> Self {
        match web_sys::window().and_then(|w| w.local_storage().ok().flatten()) {
            Some(storage) => BrowserStore::Local(storage),
            // プライベートモードや sandbox iframe では取得できない。
            None => {
                log::warn!("localStorage unavailable, progress will not survive a reload");
                BrowserStore::Memory(MemoryStore::new())
            }
        }
    }
}

impl KeyValueStore for BrowserStore {
    fn get(&self, key: &str) -> Option<String> {
        match self {
            BrowserStore::Local(storage) => storage.get_item(key).ok().flatten(),
            BrowserStore::Memory(memory) => memory.get(key),
        }
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StoreError> {
        match self {
            BrowserStore::Local(storage) => {
                storage
                    .set_item(key, value)
                    .map_err(|e| StoreError::Write {
                        key: key.to_string(),
                        reason: format!("{e:?}"),
                    })
            }
            BrowserStore::Memory(memory) => memory.set(key, value),
        }
    }
}

#[cfg(test)]
pub mod testing {
    use super::*;

    /// A store whose writes always fail.
    #[derive(Default)]
    pub struct ReadOnlyStore {
        pub inner: MemoryStore,
    }

    impl KeyValueStore for ReadOnlyStore {
        fn get(&self, key: &str) -> Option<String> {
            self.inner.get(key)
        }

        fn set(&mut self, _key: &str, _value: &str) -> Result<(), StoreError> {
            Err(StoreError::Unavailable)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn memory_store_get_set() {
        let mut store = MemoryStore::new();
        assert_eq!(store.get("a"), None);
        store.set("a", "1").unwrap();
        assert_eq!(store.get("a"), Some("1".to_string()));
        store.set("a", "2").unwrap();
        assert_eq!(store.get("a"), Some("2".to_string()));
    }

    #[test]
    fn get_or_init_writes_default_once() {
        let mut store = MemoryStore::new();
        assert_eq!(store.get_or_init("k", "x").unwrap(), "x");
        assert_eq!(store.get("k"), Some("x".to_string()));
        assert_eq!(store.get_or_init("k", "y").unwrap(), "x");
    }

    #[test]
    fn get_or_init_keeps_existing_empty_value() {
        let mut store = MemoryStore::with_entries([("k", "")]);
        assert_eq!(store.get_or_init("k", "x").unwrap(), "");
    }

    #[test]
    fn get_or_init_reports_write_failure() {
        let mut store = testing::ReadOnlyStore::default();
        assert_eq!(store.get_or_init("k", "x"), Err(StoreError::Unavailable));
    }

    #[test]
    fn error_messages() {
        let e = StoreError::Write {
            key: "save0".to_string(),
            reason: "QuotaExceededError".to_string(),
        };
        assert_eq!(e.to_string(), "failed to write `save0`: QuotaExceededError");
    }
}
