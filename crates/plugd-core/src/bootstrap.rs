//! Handler chain assembly
//!
//! Turns the configured plugin lists into handler chains by looking each
//! plugin up in the registry and calling the matching setup capability.
//! Chains keep configuration order.

use crate::config::{PluginConfig, ServerConfig};
use crate::error::{Error, Result};
use crate::handler::{Handler4, Handler6};
use crate::registry::PluginRegistry;
use crate::setup::{Plugin, ProtocolFamily};
use std::sync::Arc;
use tracing::{debug, info};

/// Handler chains for both families
///
/// A family that is not configured has an empty chain.
#[derive(Default)]
pub struct ServerHandlers {
    /// DHCPv4 handlers, in chain order
    pub handlers4: Vec<Arc<dyn Handler4>>,
    /// DHCPv6 handlers, in chain order
    pub handlers6: Vec<Arc<dyn Handler6>>,
}

/// Build the DHCPv4 handler chain
///
/// # Errors
///
/// - [`Error::UnknownPlugin`] if a name is not registered
/// - [`Error::UnsupportedFamily`] if the plugin has no DHCPv4 setup
/// - [`Error::Setup`] if the plugin's setup fails; its message is kept as is
pub fn load_plugins4(
    registry: &PluginRegistry,
    plugins: &[PluginConfig],
) -> Result<Vec<Arc<dyn Handler4>>> {
    plugins
        .iter()
        .map(|entry| {
            let plugin = find(registry, entry, ProtocolFamily::V4)?;
            let setup = plugin
                .setup4()
                .ok_or_else(|| Error::unsupported_family(plugin.name(), ProtocolFamily::V4))?;
            let handler = setup
                .setup(&entry.args)
                .map_err(|e| setup_failed(plugin, e))?;
            info!("Loaded {} plugin '{}'", ProtocolFamily::V4, plugin.name());
            Ok(handler)
        })
        .collect()
}

/// Build the DHCPv6 handler chain
///
/// Same contract as [`load_plugins4`].
pub fn load_plugins6(
    registry: &PluginRegistry,
    plugins: &[PluginConfig],
) -> Result<Vec<Arc<dyn Handler6>>> {
    plugins
        .iter()
        .map(|entry| {
            let plugin = find(registry, entry, ProtocolFamily::V6)?;
            let setup = plugin
                .setup6()
                .ok_or_else(|| Error::unsupported_family(plugin.name(), ProtocolFamily::V6))?;
            let handler = setup
                .setup(&entry.args)
                .map_err(|e| setup_failed(plugin, e))?;
            info!("Loaded {} plugin '{}'", ProtocolFamily::V6, plugin.name());
            Ok(handler)
        })
        .collect()
}

/// Build the handler chains of every configured family
pub fn build_server(registry: &PluginRegistry, config: &ServerConfig) -> Result<ServerHandlers> {
    let mut handlers = ServerHandlers::default();

    if let Some(server4) = &config.server4 {
        handlers.handlers4 = load_plugins4(registry, &server4.plugins)?;
    }
    if let Some(server6) = &config.server6 {
        handlers.handlers6 = load_plugins6(registry, &server6.plugins)?;
    }

    Ok(handlers)
}

fn find<'a>(
    registry: &'a PluginRegistry,
    entry: &PluginConfig,
    family: ProtocolFamily,
) -> Result<&'a Plugin> {
    debug!(
        "Looking up {} plugin '{}' with args {:?}",
        family, entry.name, entry.args
    );
    registry
        .lookup(&entry.name)
        .ok_or_else(|| Error::unknown_plugin(&entry.name))
}

fn setup_failed(plugin: &Plugin, err: Error) -> Error {
    let message = match err {
        Error::InvalidArgs(msg) | Error::Other(msg) => msg,
        other => other.to_string(),
    };
    Error::setup(plugin.name(), message)
}
