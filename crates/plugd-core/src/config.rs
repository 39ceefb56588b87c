//! Configuration types for plugd
//!
//! This module defines the structures the server bootstrap reads to decide
//! which plugins to activate, in which order, and with which arguments.

use serde::{Deserialize, Serialize};
use std::net::{Ipv4Addr, Ipv6Addr, SocketAddr};
use std::path::Path;

use crate::error::{Error, Result};
use crate::setup::ProtocolFamily;

/// Default DHCPv4 server port
pub const DHCPV4_SERVER_PORT: u16 = 67;

/// Default DHCPv6 server port
pub const DHCPV6_SERVER_PORT: u16 = 547;

/// Main server configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ServerConfig {
    /// DHCPv4 listener and plugin chain (absent = DHCPv4 disabled)
    #[serde(default)]
    pub server4: Option<ListenerConfig>,

    /// DHCPv6 listener and plugin chain (absent = DHCPv6 disabled)
    #[serde(default)]
    pub server6: Option<ListenerConfig>,
}

impl ServerConfig {
    /// Parse a configuration from JSON text
    ///
    /// Listeners without explicit `listen` addresses get the family's
    /// wildcard address and default port. The result is validated.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let mut config: ServerConfig = serde_json::from_str(json)?;

        if let Some(server4) = config.server4.as_mut()
            && server4.listen.is_empty()
        {
            server4.listen = default_listen(ProtocolFamily::V4);
        }
        if let Some(server6) = config.server6.as_mut()
            && server6.listen.is_empty()
        {
            server6.listen = default_listen(ProtocolFamily::V6);
        }

        config.validate()?;
        Ok(config)
    }

    /// Read and parse a JSON configuration file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::from_json_str(&text)
    }

    /// Listener configuration for a family
    pub fn listener(&self, family: ProtocolFamily) -> Option<&ListenerConfig> {
        match family {
            ProtocolFamily::V4 => self.server4.as_ref(),
            ProtocolFamily::V6 => self.server6.as_ref(),
        }
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        if self.server4.is_none() && self.server6.is_none() {
            return Err(Error::config(
                "No server configured: at least one of server4/server6 is required",
            ));
        }

        for family in [ProtocolFamily::V4, ProtocolFamily::V6] {
            if let Some(listener) = self.listener(family) {
                listener.validate(family)?;
            }
        }

        Ok(())
    }
}

/// Listener configuration for one protocol family
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ListenerConfig {
    /// Addresses to listen on
    #[serde(default)]
    pub listen: Vec<SocketAddr>,

    /// Plugins to load, in handler chain order
    pub plugins: Vec<PluginConfig>,
}

impl ListenerConfig {
    /// Create a listener on the family's default address
    pub fn new(family: ProtocolFamily) -> Self {
        Self {
            listen: default_listen(family),
            plugins: Vec::new(),
        }
    }

    /// Append a plugin to the chain
    pub fn with_plugin(mut self, plugin: PluginConfig) -> Self {
        self.plugins.push(plugin);
        self
    }

    /// Validate the listener configuration
    pub fn validate(&self, family: ProtocolFamily) -> Result<()> {
        if self.plugins.is_empty() {
            return Err(Error::config(format!("{} server has no plugins", family)));
        }

        for addr in &self.listen {
            let matches_family = match family {
                ProtocolFamily::V4 => addr.is_ipv4(),
                ProtocolFamily::V6 => addr.is_ipv6(),
            };
            if !matches_family {
                return Err(Error::config(format!(
                    "{} server cannot listen on {}",
                    family, addr
                )));
            }
        }

        for plugin in &self.plugins {
            if plugin.name.trim().is_empty() {
                return Err(Error::config(format!(
                    "{} server lists a plugin with an empty name",
                    family
                )));
            }
        }

        Ok(())
    }
}

/// One entry of a plugin chain
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PluginConfig {
    /// Registered plugin name
    pub name: String,

    /// Arguments passed verbatim to the plugin's setup
    #[serde(default)]
    pub args: Vec<String>,
}

impl PluginConfig {
    /// Create a plugin entry
    pub fn new<I, S>(name: impl Into<String>, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            name: name.into(),
            args: args.into_iter().map(Into::into).collect(),
        }
    }
}

fn default_listen(family: ProtocolFamily) -> Vec<SocketAddr> {
    match family {
        ProtocolFamily::V4 => vec![SocketAddr::from((Ipv4Addr::UNSPECIFIED, DHCPV4_SERVER_PORT))],
        ProtocolFamily::V6 => vec![SocketAddr::from((Ipv6Addr::UNSPECIFIED, DHCPV6_SERVER_PORT))],
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    const SAMPLE: &str = r#"{
        "server4": {
            "plugins": [
                { "name": "router", "args": ["10.0.0.1"] },
                { "name": "dns", "args": ["8.8.8.8", "8.8.4.4"] }
            ]
        },
        "server6": {
            "listen": ["[::1]:5547"],
            "plugins": [{ "name": "dns", "args": ["2001:4860:4860::8888"] }]
        }
    }"#;

    #[test]
    fn parses_and_fills_default_listen() {
        let config = ServerConfig::from_json_str(SAMPLE).unwrap();

        let server4 = config.server4.as_ref().unwrap();
        assert_eq!(server4.listen, vec!["0.0.0.0:67".parse().unwrap()]);
        assert_eq!(server4.plugins.len(), 2);
        assert_eq!(server4.plugins[0], PluginConfig::new("router", ["10.0.0.1"]));

        let server6 = config.listener(ProtocolFamily::V6).unwrap();
        assert_eq!(server6.listen, vec!["[::1]:5547".parse().unwrap()]);
    }

    #[test]
    fn args_default_to_empty() {
        let config =
            ServerConfig::from_json_str(r#"{"server4": {"plugins": [{"name": "nop"}]}}"#).unwrap();
        assert!(config.server4.unwrap().plugins[0].args.is_empty());
    }

    #[test]
    fn rejects_empty_config() {
        let err = ServerConfig::from_json_str("{}").unwrap_err();
        assert!(matches!(err, Error::Config(_)));
    }

    #[test]
    fn rejects_listener_without_plugins() {
        let err = ServerConfig::from_json_str(r#"{"server6": {"plugins": []}}"#).unwrap_err();
        assert!(err.to_string().contains("DHCPv6 server has no plugins"));
    }

    #[test]
    fn rejects_wrong_family_address() {
        let config = ServerConfig {
            server4: Some(ListenerConfig {
                listen: vec!["[::]:67".parse().unwrap()],
                plugins: vec![PluginConfig::new("nop", Vec::<String>::new())],
            }),
            server6: None,
        };
        assert!(matches!(config.validate(), Err(Error::Config(_))));
    }

    #[test]
    fn rejects_blank_plugin_name() {
        let config = ServerConfig {
            server4: Some(
                ListenerConfig::new(ProtocolFamily::V4)
                    .with_plugin(PluginConfig::new("  ", Vec::<String>::new())),
            ),
            server6: None,
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn loads_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(SAMPLE.as_bytes()).unwrap();

        let config = ServerConfig::from_file(file.path()).unwrap();
        assert!(config.server4.is_some());
        assert!(config.server6.is_some());
    }

    #[test]
    fn missing_file_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = ServerConfig::from_file(dir.path().join("absent.json")).unwrap_err();
        assert!(matches!(err, Error::Io(_)));
    }
}
