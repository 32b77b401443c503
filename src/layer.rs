//! In-memory key-value layer with a one-way read-only lock.

use std::collections::HashMap;

use parking_lot::Mutex;

use crate::error::ConfigError;
use crate::store::{normalize_prefix, ConfigStore, KeyList};

#[derive(Debug)]
struct LayerState {
    values: HashMap<String, String>,
    writable: bool,
}

/// A single flat source of key-value pairs.
///
/// Layers start writable; calling [`lock_read_only`](Layer::lock_read_only)
/// makes the layer permanently read-only, which is the usual pattern for a
/// defaults layer populated once at startup. All operations are serialized
/// behind an internal mutex, so a `Layer` can be shared across threads
/// (typically as an `Arc<Layer>` inside a [`LayerStack`](crate::LayerStack)).
#[derive(Debug)]
pub struct Layer {
    name: String,
    state: Mutex<LayerState>,
}

impl Layer {
    /// Creates an empty, writable layer with the given name.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            state: Mutex::new(LayerState {
                values: HashMap::new(),
                writable: true,
            }),
        }
    }

    /// Gets the layer name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Makes the layer read-only, permanently.
    ///
    /// Idempotent. There is no way back: subsequent `set_string`,
    /// `delete_value` and `clear` calls fail for the rest of the layer's
    /// lifetime.
    pub fn lock_read_only(&self) {
        self.state.lock().writable = false;
    }

    /// Deletes all values from the layer.
    pub fn clear(&self) -> Result<(), ConfigError> {
        let mut state = self.state.lock();
        if !state.writable {
            return Err(ConfigError::ReadOnlyLayer(self.name.clone()));
        }
        state.values.clear();
        Ok(())
    }
}

impl ConfigStore for Layer {
    fn is_writable(&self) -> bool {
        self.state.lock().writable
    }

    fn get_string(&self, key: &str) -> Option<String> {
        self.state.lock().values.get(key).cloned()
    }

    fn set_string(&self, key: &str, value: &str) -> Result<(), ConfigError> {
        let mut state = self.state.lock();
        if !state.writable {
            return Err(ConfigError::ReadOnlyLayer(self.name.clone()));
        }
        state.values.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn delete_value(&self, key: &str) -> Result<(), ConfigError> {
        let mut state = self.state.lock();
        if !state.writable {
            return Err(ConfigError::ReadOnlyLayer(self.name.clone()));
        }
        state.values.remove(key);
        Ok(())
    }

    fn list_keys(&self, prefix: &str, out: &mut KeyList, direct: bool) {
        let prefix = normalize_prefix(prefix);

        let state = self.state.lock();
        for key in state.values.keys() {
            if let Some(rest) = key.strip_prefix(prefix.as_str()) {
                let rest = if direct {
                    rest.split('.').next().unwrap_or(rest)
                } else {
                    rest
                };
                out.add(rest);
            }
        }
    }
}
