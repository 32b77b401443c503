//! Layered, string-keyed configuration store.
//!
//! Values live under dotted keys (`server.port`) in flat [`Layer`]s. A
//! [`LayerStack`] merges several layers by priority so defaults, loaded
//! files and runtime overrides answer one logical key space, and a [`View`]
//! scopes any of them to a key prefix with typed accessors. The INI codec
//! ([`load_ini`]/[`save_ini`]) reads and writes the same interface, so it
//! works identically against a layer, a stack or a view.
//!
//! ## Example
//!
//! ```
//! use std::sync::Arc;
//! use configstack::{ConfigStore, Layer, LayerStack, View, load_ini};
//!
//! let defaults = Arc::new(Layer::new("defaults"));
//! load_ini(&*defaults, "[server]\nport=8080\nhost=localhost\n".as_bytes())?;
//! defaults.lock_read_only();
//!
//! let overrides = Arc::new(Layer::new("overrides"));
//!
//! let stack = Arc::new(LayerStack::new());
//! stack.add_layer(defaults, 10);
//! stack.add_writable_layer(overrides, 20);
//!
//! let server = View::new(stack, "server");
//! assert_eq!(server.get_int("port"), Some(8080));
//!
//! server.set_int("port", 9090)?; // lands in the overrides layer
//! assert_eq!(server.get_int("port"), Some(9090));
//! # Ok::<(), configstack::ConfigError>(())
//! ```

mod error;
mod ini;
mod layer;
mod stack;
mod store;
mod view;

pub use error::ConfigError;
pub use ini::{load_ini, save_ini, save_ini_plain};
pub use layer::Layer;
pub use stack::LayerStack;
pub use store::{ConfigStore, KeyList};
pub use view::View;
