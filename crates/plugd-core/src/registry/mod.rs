//! Plugin registry
//!
//! The registry maps plugin names to [`Plugin`] records so the server
//! bootstrap can look up whatever plugins its configuration names.
//!
//! ## Lifecycle
//!
//! 1. `PluginRegistry::new()` creates an empty registry.
//! 2. Every compiled-in plugin registers itself, once, before serving starts.
//! 3. `into_shared()` freezes the registry behind an `Arc`. From then on it
//!    is read-only and lookups may run from any number of threads.
//!
//! Registration takes `&mut self`, so the freeze is enforced by the type
//! system rather than by a lock.
//!
//! ## Registration
//!
//! Plugin crates expose a `register` function called during initialization:
//!
//! ```rust,ignore
//! # use plugd_core::{Plugin, PluginRegistry, Result};
//! // In plugd-plugin-router
//! pub fn register(registry: &mut PluginRegistry) -> Result<()> {
//!     registry.register(Plugin::new("router").with_setup4(setup4))
//! }
//! ```

use crate::error::{Error, Result};
use crate::setup::Plugin;
use std::collections::HashMap;
use std::collections::hash_map::Entry;
use std::sync::Arc;
use tracing::{error, info, warn};

/// Name-keyed directory of registered plugins
///
/// Entries are never removed or replaced once inserted.
#[derive(Debug, Default)]
pub struct PluginRegistry {
    plugins: HashMap<String, Plugin>,
}

impl PluginRegistry {
    /// Create a new empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a plugin
    ///
    /// # Errors
    ///
    /// - [`Error::InvalidPlugin`] if the plugin has an empty name. The
    ///   registry is left unchanged.
    /// - [`Error::DuplicateRegistration`] if a plugin with the same name is
    ///   already registered. This is fatal ([`Error::is_fatal`]): the caller
    ///   must stop initialization. The existing entry is kept.
    ///
    /// # Example
    ///
    /// ```rust
    /// # use plugd_core::{Plugin, PluginRegistry};
    /// let mut registry = PluginRegistry::new();
    /// registry.register(Plugin::new("noop")).unwrap();
    /// assert!(registry.register(Plugin::new("noop")).unwrap_err().is_fatal());
    /// ```
    pub fn register(&mut self, plugin: Plugin) -> Result<()> {
        if plugin.name().is_empty() {
            return Err(Error::invalid_plugin("cannot register a plugin without a name"));
        }

        info!("Registering plugin '{}'", plugin.name());

        match self.plugins.entry(plugin.name().to_string()) {
            Entry::Occupied(entry) => {
                error!("Plugin '{}' is already registered", entry.key());
                Err(Error::duplicate(entry.key().clone()))
            }
            Entry::Vacant(entry) => {
                if plugin.setup4().is_none() && plugin.setup6().is_none() {
                    warn!(
                        "Plugin '{}' provides neither a DHCPv4 nor a DHCPv6 setup",
                        entry.key()
                    );
                }
                entry.insert(plugin);
                Ok(())
            }
        }
    }

    /// Look up a plugin by exact name
    ///
    /// Returns `None` if no plugin with that name was registered.
    pub fn lookup(&self, name: &str) -> Option<&Plugin> {
        self.plugins.get(name)
    }

    /// Check if a plugin is registered
    pub fn contains(&self, name: &str) -> bool {
        self.plugins.contains_key(name)
    }

    /// Number of registered plugins
    pub fn len(&self) -> usize {
        self.plugins.len()
    }

    /// Whether no plugin has been registered
    pub fn is_empty(&self) -> bool {
        self.plugins.is_empty()
    }

    /// Names of all registered plugins, sorted
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.plugins.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    /// Freeze the registry for the serving phase
    pub fn into_shared(self) -> Arc<Self> {
        Arc::new(self)
    }
}
