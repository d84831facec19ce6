use super::backend::KvBackend;
use crate::error::{Result, RmdifyError};
use std::cell::RefCell;
use std::collections::BTreeMap;

/// In-memory storage backend for testing.
///
/// Uses `RefCell` for interior mutability since rmdify is single-threaded.
#[derive(Default)]
pub struct MemBackend {
    items: RefCell<BTreeMap<String, String>>,
    quota: Option<u64>,
    simulate_write_error: RefCell<bool>,
}

impl MemBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Limit the total size of stored values, in bytes.
    pub fn with_quota(mut self, bytes: u64) -> Self {
        self.quota = Some(bytes);
        self
    }

    /// Enable write error simulation for testing error handling.
    pub fn set_simulate_write_error(&self, simulate: bool) {
        *self.simulate_write_error.borrow_mut() = simulate;
    }

    /// Test helper to plant a raw value, bypassing quota and error simulation.
    pub fn insert_raw(&self, key: &str, value: &str) {
        self.items
            .borrow_mut()
            .insert(key.to_string(), value.to_string());
    }

    fn used_bytes_excluding(&self, key: &str) -> u64 {
        self.items
            .borrow()
            .iter()
            .filter(|(k, _)| k.as_str() != key)
            .map(|(_, v)| v.len() as u64)
            .sum()
    }
}

impl KvBackend for MemBackend {
    fn get_item(&self, key: &str) -> Result<Option<String>> {
        Ok(self.items.borrow().get(key).cloned())
    }

    fn set_item(&self, key: &str, value: &str) -> Result<()> {
        if *self.simulate_write_error.borrow() {
            return Err(RmdifyError::Store("Simulated write error".to_string()));
        }
        if let Some(quota) = self.quota {
            let needed = self.used_bytes_excluding(key) + value.len() as u64;
            if needed > quota {
                return Err(RmdifyError::QuotaExceeded {
                    key: key.to_string(),
                    needed,
                    quota,
                });
            }
        }
        self.items
            .borrow_mut()
            .insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove_item(&self, key: &str) -> Result<()> {
        self.items.borrow_mut().remove(key);
        Ok(())
    }

    fn keys(&self) -> Result<Vec<String>> {
        Ok(self.items.borrow().keys().cloned().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn set_get_remove() {
        let backend = MemBackend::new();
        backend.set_item("a", "1").unwrap();
        assert_eq!(backend.get_item("a").unwrap().as_deref(), Some("1"));
        backend.remove_item("a").unwrap();
        assert_eq!(backend.get_item("a").unwrap(), None);
        backend.remove_item("a").unwrap();
    }

    #[test]
    fn quota_counts_replacement_once() {
        let backend = MemBackend::new().with_quota(10);
        backend.set_item("a", "12345").unwrap();
        backend.set_item("a", "1234567890").unwrap();
        let err = backend.set_item("b", "x").unwrap_err();
        assert!(matches!(err, RmdifyError::QuotaExceeded { needed: 11, .. }));
    }

    #[test]
    fn simulated_write_error() {
        let backend = MemBackend::new();
        backend.set_simulate_write_error(true);
        assert!(backend.set_item("a", "1").is_err());
        assert!(backend.keys().unwrap().is_empty());
    }
}
