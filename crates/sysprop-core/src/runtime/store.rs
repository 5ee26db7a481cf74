//! Property store interface and an in-memory implementation

use std::collections::BTreeMap;

use parking_lot::RwLock;

/// Key-value store the accessors read from and write to.
///
/// Implementations decide their own thread-safety; accessors add none.
pub trait PropertyStore {
    /// Raw value for `key`, or `None` when the key is absent
    fn read(&self, key: &str) -> Option<String>;

    /// Store `value` under `key`, returning whether the write took effect
    fn write(&self, key: &str, value: &str) -> bool;
}

/// Thread-safe in-memory store.
///
/// Keys under `ro.` can be written once, mirroring the platform property
/// service; every other key is freely rewritable.
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: RwLock<BTreeMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of all entries in key order
    pub fn entries(&self) -> BTreeMap<String, String> {
        self.entries.read().clone()
    }
}

impl PropertyStore for MemoryStore {
    fn read(&self, key: &str) -> Option<String> {
        self.entries.read().get(key).cloned()
    }

    fn write(&self, key: &str, value: &str) -> bool {
        let mut map = self.entries.write();
        if key.starts_with("ro.") && map.contains_key(key) {
            tracing::debug!(key, "rejected write to read-only property");
            return false;
        }
        map.insert(key.to_string(), value.to_string());
        true
    }
}

impl<S: PropertyStore + ?Sized> PropertyStore for &S {
    fn read(&self, key: &str) -> Option<String> {
        (**self).read(key)
    }

    fn write(&self, key: &str, value: &str) -> bool {
        (**self).write(key, value)
    }
}
