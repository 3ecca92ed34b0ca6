use super::backend::StorageBackend;
use crate::error::{DeckError, Result};
use serde_json::Value;
use std::cell::RefCell;
use std::collections::HashMap;

/// In-memory storage backend for testing.
///
/// Uses `RefCell` for interior mutability since the engine is
/// single-threaded.
#[derive(Default)]
pub struct MemBackend {
    blobs: RefCell<HashMap<String, Value>>,
    simulate_write_error: RefCell<bool>,
}

impl MemBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a blob directly, bypassing `set`.
    pub fn with_blob(self, key: &str, value: Value) -> Self {
        self.blobs.borrow_mut().insert(key.to_string(), value);
        self
    }

    /// Enable write error simulation for testing error handling.
    pub fn set_simulate_write_error(&self, simulate: bool) {
        *self.simulate_write_error.borrow_mut() = simulate;
    }
}

impl StorageBackend for MemBackend {
    fn get(&self, key: &str) -> Result<Option<Value>> {
        Ok(self.blobs.borrow().get(key).cloned())
    }

    fn set(&self, key: &str, value: &Value) -> Result<()> {
        if *self.simulate_write_error.borrow() {
            return Err(DeckError::Store("Simulated write error".to_string()));
        }
        self.blobs
            .borrow_mut()
            .insert(key.to_string(), value.clone());
        Ok(())
    }
}
