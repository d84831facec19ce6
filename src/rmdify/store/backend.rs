use crate::error::Result;

/// Raw string key/value storage.
///
/// This handles the "how" of storage (filesystem vs memory), while
/// [`LocalStore`](super::local::LocalStore) handles the "what" (documents,
/// indices, doctor).
pub trait KvBackend {
    /// Read a value. `Ok(None)` when the key is absent.
    fn get_item(&self, key: &str) -> Result<Option<String>>;

    /// Write a value, replacing any previous one.
    /// Fails with `QuotaExceeded` when the backend is full.
    fn set_item(&self, key: &str, value: &str) -> Result<()>;

    /// Remove a key. Removing an absent key is not an error.
    fn remove_item(&self, key: &str) -> Result<()>;

    /// Every key currently stored.
    fn keys(&self) -> Result<Vec<String>>;
}
