use crate::error::Result;
use crate::settings::merge_defaults;
use serde_json::Value;

/// Abstract interface for key-value JSON storage.
///
/// Methods take `&self`; implementations that hold state use interior
/// mutability, since the engine is single-threaded.
pub trait StorageBackend {
    /// Load the blob stored under `key`.
    /// Returns Ok(None) if the key was never written.
    /// Returns Err on I/O failures or if the stored bytes are not JSON.
    fn get(&self, key: &str) -> Result<Option<Value>>;

    /// Replace the blob stored under `key`.
    fn set(&self, key: &str, value: &Value) -> Result<()>;

    /// Overlay `patch` onto the stored blob and persist the result.
    ///
    /// Uses the same rules as [`merge_defaults`], with the stored blob as the
    /// defaults: objects merge key by key and `patch` wins. Returns the
    /// merged blob.
    fn merge(&self, key: &str, patch: &Value) -> Result<Value> {
        let current = self.get(key)?.unwrap_or(Value::Null);
        let merged = merge_defaults(&current, patch);
        self.set(key, &merged)?;
        Ok(merged)
    }
}
