use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use crate::error::StorageError;

/// Synchronous key-value storage facility (browser `localStorage` or similar)
pub trait KeyValueStorage {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError>;
    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError>;
    fn remove(&mut self, key: &str) -> Result<(), StorageError>;
}

#[derive(Debug, Default)]
struct MemoryInner {
    entries: HashMap<String, String>,
    fail_writes: bool,
    disabled: bool,
    /// Maximum total bytes of keys plus values; `None` = unbounded
    quota: Option<usize>,
}

impl MemoryInner {
    fn used_bytes_with(&self, key: &str, value: &str) -> usize {
        let existing: usize = self
            .entries
            .iter()
            .filter(|(k, _)| k.as_str() != key)
            .map(|(k, v)| k.len() + v.len())
            .sum();
        existing + key.len() + value.len()
    }
}

/// In-memory storage whose clones share the same entries.
///
/// Failure switches make it stand in for a full or disabled browser storage.
#[derive(Debug, Clone, Default)]
pub struct MemoryStorage {
    inner: Rc<RefCell<MemoryInner>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Storage limited to `bytes` of keys plus values
    pub fn with_quota(bytes: usize) -> Self {
        let storage = Self::default();
        storage.inner.borrow_mut().quota = Some(bytes);
        storage
    }

    /// Make every `set` fail as if the quota were exceeded
    pub fn set_fail_writes(&self, fail: bool) {
        self.inner.borrow_mut().fail_writes = fail;
    }

    /// Make every operation fail as if storage were turned off
    pub fn set_disabled(&self, disabled: bool) {
        self.inner.borrow_mut().disabled = disabled;
    }

    /// Write a raw value, bypassing failure switches
    pub fn seed(&self, key: &str, value: &str) {
        self.inner
            .borrow_mut()
            .entries
            .insert(key.to_string(), value.to_string());
    }

    /// Read a raw value, bypassing failure switches
    pub fn raw(&self, key: &str) -> Option<String> {
        self.inner.borrow().entries.get(key).cloned()
    }

    pub fn len(&self) -> usize {
        self.inner.borrow().entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.borrow().entries.is_empty()
    }
}

impl KeyValueStorage for MemoryStorage {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        let inner = self.inner.borrow();
        if inner.disabled {
            return Err(StorageError::Unavailable("storage is disabled".to_string()));
        }
        Ok(inner.entries.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        let mut inner = self.inner.borrow_mut();
        if inner.disabled {
            return Err(StorageError::Unavailable("storage is disabled".to_string()));
        }
        let over_quota = inner
            .quota
            .is_some_and(|quota| inner.used_bytes_with(key, value) > quota);
        if inner.fail_writes || over_quota {
            return Err(StorageError::WriteFailed {
                key: key.to_string(),
                reason: "quota exceeded".to_string(),
            });
        }
        inner.entries.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<(), StorageError> {
        let mut inner = self.inner.borrow_mut();
        if inner.disabled {
            return Err(StorageError::Unavailable("storage is disabled".to_string()));
        }
        inner.entries.remove(key);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_set_get_remove() {
        let mut storage = MemoryStorage::new();
        assert_eq!(storage.get("k").unwrap(), None);

        storage.set("k", "v").unwrap();
        assert_eq!(storage.get("k").unwrap(), Some("v".to_string()));

        storage.remove("k").unwrap();
        assert_eq!(storage.get("k").unwrap(), None);
        assert!(storage.is_empty());
    }

    #[test]
    fn test_clones_share_entries() {
        let mut storage = MemoryStorage::new();
        let handle = storage.clone();

        storage.set("k", "v").unwrap();
        assert_eq!(handle.raw("k"), Some("v".to_string()));

        handle.seed("other", "x");
        assert_eq!(storage.get("other").unwrap(), Some("x".to_string()));
        assert_eq!(storage.len(), 2);
    }

    #[test]
    fn test_fail_writes() {
        let mut storage = MemoryStorage::new();
        storage.set_fail_writes(true);

        let err = storage.set("k", "v").unwrap_err();
        assert!(matches!(err, StorageError::WriteFailed { .. }));
        assert_eq!(storage.raw("k"), None);
        // reads still work
        assert_eq!(storage.get("k").unwrap(), None);
    }

    #[test]
    fn test_disabled() {
        let mut storage = MemoryStorage::new();
        storage.seed("k", "v");
        storage.set_disabled(true);

        assert!(matches!(storage.get("k"), Err(StorageError::Unavailable(_))));
        assert!(matches!(storage.set("k", "w"), Err(StorageError::Unavailable(_))));
        assert!(matches!(storage.remove("k"), Err(StorageError::Unavailable(_))));
    }

    #[test]
    fn test_quota() {
        let mut storage = MemoryStorage::with_quota(10);
        storage.set("ab", "cdef").unwrap();
        // replacing an existing value only counts the new size
        storage.set("ab", "cdefgh").unwrap();
        assert!(storage.set("xyz", "123").is_err());
        assert_eq!(storage.raw("xyz"), None);
    }
}
