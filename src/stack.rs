//! Priority-ordered stack of layers resolved as one key space.

use std::sync::Arc;

use parking_lot::Mutex;

use crate::error::ConfigError;
use crate::layer::Layer;
use crate::store::{ConfigStore, KeyList};

#[derive(Debug)]
struct StackEntry {
    layer: Arc<Layer>,
    priority: i32,
    writable: bool,
}

/// An ordered collection of [`Layer`]s answering a single logical key space.
///
/// Reads resolve top-down: the highest-priority layer containing the key
/// wins, with insertion order breaking ties (earlier-inserted wins). Writes
/// go to the first layer that was added via
/// [`add_writable_layer`](LayerStack::add_writable_layer) and is itself
/// still writable.
///
/// The stack holds non-owning `Arc` references, so a layer can be shared by
/// several stacks or reused after [`remove_layer`](LayerStack::remove_layer).
///
/// ## Example
///
/// ```
/// use std::sync::Arc;
/// use configstack::{ConfigStore, Layer, LayerStack};
///
/// let defaults = Arc::new(Layer::new("defaults"));
/// defaults.set_string("server.port", "8080")?;
/// defaults.lock_read_only();
///
/// let overrides = Arc::new(Layer::new("overrides"));
/// overrides.set_string("server.port", "9090")?;
///
/// let stack = LayerStack::new();
/// stack.add_layer(defaults, 10);
/// stack.add_writable_layer(overrides.clone(), 20);
///
/// // the higher-priority layer shadows the default
/// assert_eq!(stack.get_string("server.port").as_deref(), Some("9090"));
///
/// // writes land in the writable layer
/// stack.set_string("server.host", "example.com")?;
/// assert_eq!(overrides.get_string("server.host").as_deref(), Some("example.com"));
/// # Ok::<(), configstack::ConfigError>(())
/// ```
#[derive(Debug, Default)]
pub struct LayerStack {
    entries: Mutex<Vec<StackEntry>>,
}

impl LayerStack {
    /// Creates a stack with no layers.
    pub fn new() -> Self {
        Self::default()
    }

    fn add_entry(&self, layer: Arc<Layer>, priority: i32, writable: bool) {
        let mut entries = self.entries.lock();

        // insert before the first strictly lower priority, keeping the list
        // in descending order with earlier-inserted entries winning ties
        let slot = entries
            .iter()
            .position(|e| e.priority < priority)
            .unwrap_or(entries.len());

        entries.insert(
            slot,
            StackEntry {
                layer,
                priority,
                writable,
            },
        );
    }

    /// Adds a layer that only participates in reads.
    pub fn add_layer(&self, layer: Arc<Layer>, priority: i32) {
        self.add_entry(layer, priority, false);
    }

    /// Adds a layer that is also eligible to receive writes.
    ///
    /// Writes through the stack succeed only while at least one layer added
    /// this way is itself writable.
    pub fn add_writable_layer(&self, layer: Arc<Layer>, priority: i32) {
        self.add_entry(layer, priority, true);
    }

    /// Removes a layer, matched by identity. Returns whether it was present.
    pub fn remove_layer(&self, layer: &Arc<Layer>) -> bool {
        let mut entries = self.entries.lock();
        match entries.iter().position(|e| Arc::ptr_eq(&e.layer, layer)) {
            Some(idx) => {
                entries.remove(idx);
                true
            }
            None => false,
        }
    }

    /// Returns a snapshot of the layers in current resolution order,
    /// highest priority first.
    pub fn layers(&self) -> Vec<Arc<Layer>> {
        self.entries.lock().iter().map(|e| e.layer.clone()).collect()
    }
}

impl ConfigStore for LayerStack {
    fn is_writable(&self) -> bool {
        self.entries
            .lock()
            .iter()
            .any(|e| e.writable && e.layer.is_writable())
    }

    fn get_string(&self, key: &str) -> Option<String> {
        self.entries
            .lock()
            .iter()
            .find_map(|e| e.layer.get_string(key))
    }

    fn set_string(&self, key: &str, value: &str) -> Result<(), ConfigError> {
        let entries = self.entries.lock();
        let target = entries
            .iter()
            .find(|e| e.writable && e.layer.is_writable())
            .ok_or(ConfigError::NoWritableLayer)?;
        target.layer.set_string(key, value)
    }

    /// Deliberately a no-op: a delete through a stack has no single obvious
    /// target layer. Present for interface compatibility only; delete on the
    /// owning [`Layer`] directly.
    fn delete_value(&self, _key: &str) -> Result<(), ConfigError> {
        Ok(())
    }

    fn list_keys(&self, prefix: &str, out: &mut KeyList, direct: bool) {
        for entry in self.entries.lock().iter() {
            entry.layer.list_keys(prefix, out, direct);
        }
    }
}
