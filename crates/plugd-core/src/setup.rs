// # Setup Contract
//
// A plugin contributes handler construction logic for DHCPv4, DHCPv6, or
// both. Each family's logic is a setup capability: it takes the plugin's
// configured arguments and returns a ready handler, or fails.
//
// ## Implementations
//
// A setup capability is anything implementing [`Setup4`] / [`Setup6`]. Plain
// functions and closures qualify through blanket impls:
//
// ```rust,ignore
// use plugd_core::{Plugin, Result};
// use plugd_core::handler::Handler4;
// use std::sync::Arc;
//
// fn setup4(args: &[String]) -> Result<Arc<dyn Handler4>> {
//     /* parse args, build handler */
// }
//
// let plugin = Plugin::new("router").with_setup4(setup4);
// ```

use crate::error::Result;
use crate::handler::{Handler4, Handler6};
use std::fmt;
use std::sync::Arc;

/// Protocol family a setup capability targets
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ProtocolFamily {
    /// DHCPv4
    V4,
    /// DHCPv6
    V6,
}

impl fmt::Display for ProtocolFamily {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProtocolFamily::V4 => write!(f, "DHCPv4"),
            ProtocolFamily::V6 => write!(f, "DHCPv6"),
        }
    }
}

/// DHCPv4 setup capability
///
/// The meaning of `args` belongs to the plugin. The core passes them through
/// untouched and never inspects the returned handler.
pub trait Setup4: Send + Sync {
    /// Build a DHCPv4 handler from the configured arguments
    fn setup(&self, args: &[String]) -> Result<Arc<dyn Handler4>>;
}

/// DHCPv6 setup capability
pub trait Setup6: Send + Sync {
    /// Build a DHCPv6 handler from the configured arguments
    fn setup(&self, args: &[String]) -> Result<Arc<dyn Handler6>>;
}

impl<F> Setup4 for F
where
    F: Fn(&[String]) -> Result<Arc<dyn Handler4>> + Send + Sync,
{
    fn setup(&self, args: &[String]) -> Result<Arc<dyn Handler4>> {
        self(args)
    }
}

impl<F> Setup6 for F
where
    F: Fn(&[String]) -> Result<Arc<dyn Handler6>> + Send + Sync,
{
    fn setup(&self, args: &[String]) -> Result<Arc<dyn Handler6>> {
        self(args)
    }
}

/// A named plugin and its setup capabilities
///
/// Either capability may be absent. A plugin with neither is legal, though
/// nothing can ever be loaded from it.
#[derive(Clone)]
pub struct Plugin {
    name: String,
    setup4: Option<Arc<dyn Setup4>>,
    setup6: Option<Arc<dyn Setup6>>,
}

impl Plugin {
    /// Create a plugin with no setup capabilities
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            setup4: None,
            setup6: None,
        }
    }

    /// Attach a DHCPv4 setup capability
    pub fn with_setup4(mut self, setup: impl Setup4 + 'static) -> Self {
        self.setup4 = Some(Arc::new(setup));
        self
    }

    /// Attach a DHCPv6 setup capability
    pub fn with_setup6(mut self, setup: impl Setup6 + 'static) -> Self {
        self.setup6 = Some(Arc::new(setup));
        self
    }

    /// Plugin name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// DHCPv4 setup capability, if the plugin provides one
    pub fn setup4(&self) -> Option<&Arc<dyn Setup4>> {
        self.setup4.as_ref()
    }

    /// DHCPv6 setup capability, if the plugin provides one
    pub fn setup6(&self) -> Option<&Arc<dyn Setup6>> {
        self.setup6.as_ref()
    }

    /// Whether the plugin has a setup capability for `family`
    pub fn supports(&self, family: ProtocolFamily) -> bool {
        match family {
            ProtocolFamily::V4 => self.setup4.is_some(),
            ProtocolFamily::V6 => self.setup6.is_some(),
        }
    }
}

impl fmt::Debug for Plugin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Plugin")
            .field("name", &self.name)
            .field("setup4", &self.setup4.is_some())
            .field("setup6", &self.setup6.is_some())
            .finish()
    }
}
