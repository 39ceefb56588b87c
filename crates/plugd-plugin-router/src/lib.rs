// # Router Plugin
//
// Sets the default gateway for DHCPv4 clients. There is no DHCPv6
// counterpart: IPv6 hosts learn their routers from router advertisements.
//
// ## Configuration
//
// ```json
// { "name": "router", "args": ["192.168.1.1"] }
// ```

use plugd_core::handler::{Handler4, Message4, Outcome, option4};
use plugd_core::{Error, Plugin, PluginRegistry, Result};

use std::net::Ipv4Addr;
use std::sync::Arc;
use tracing::info;

/// Registered plugin name
pub const PLUGIN_NAME: &str = "router";

/// DHCPv4 handler that always sets the Router option
#[derive(Debug, Clone)]
pub struct RouterHandler {
    routers: Vec<Ipv4Addr>,
}

impl RouterHandler {
    pub fn new(routers: Vec<Ipv4Addr>) -> Self {
        Self { routers }
    }
}

#[async_trait::async_trait]
impl Handler4 for RouterHandler {
    async fn handle(&self, _request: &Message4, mut response: Message4) -> Outcome<Message4> {
        let value: Vec<u8> = self.routers.iter().flat_map(|ip| ip.octets()).collect();
        response.set_option(option4::ROUTER, value);
        Outcome::Continue(response)
    }
}

/// DHCPv4 setup: every argument is a router address
pub fn setup4(args: &[String]) -> Result<Arc<dyn Handler4>> {
    if args.is_empty() {
        return Err(Error::invalid_args("need at least one router IP address"));
    }

    let routers = args
        .iter()
        .map(|arg| {
            arg.parse::<Ipv4Addr>()
                .map_err(|_| Error::invalid_args(format!("invalid router IP address '{}'", arg)))
        })
        .collect::<Result<Vec<_>>>()?;

    info!("Loaded {} router(s)", routers.len());
    Ok(Arc::new(RouterHandler::new(routers)))
}

/// The plugin record
pub fn plugin() -> Plugin {
    Plugin::new(PLUGIN_NAME).with_setup4(setup4)
}

/// Register the router plugin with the registry
pub fn register(registry: &mut PluginRegistry) -> Result<()> {
    registry.register(plugin())
}
