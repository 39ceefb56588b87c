// # DNS Plugin
//
// Hands out recursive DNS server addresses.
//
// ## Configuration
//
// Arguments are the server addresses, in preference order. The DHCPv4 chain
// takes IPv4 addresses, the DHCPv6 chain IPv6 addresses:
//
// ```json
// { "name": "dns", "args": ["8.8.8.8", "8.8.4.4"] }
// { "name": "dns", "args": ["2001:4860:4860::8888"] }
// ```
//
// ## Behavior
//
// The option is only added to responses whose request asked for it
// (Parameter Request List on DHCPv4, Option Request on DHCPv6).

use plugd_core::handler::{Handler4, Handler6, Message4, Message6, Outcome, option4, option6};
use plugd_core::{Error, Plugin, PluginRegistry, Result};

use std::net::{Ipv4Addr, Ipv6Addr};
use std::str::FromStr;
use std::sync::Arc;
use tracing::info;

/// Registered plugin name
pub const PLUGIN_NAME: &str = "dns";

/// DHCPv4 handler adding the Domain Name Server option
#[derive(Debug, Clone)]
pub struct DnsHandler4 {
    servers: Vec<Ipv4Addr>,
}

impl DnsHandler4 {
    pub fn new(servers: Vec<Ipv4Addr>) -> Self {
        Self { servers }
    }
}

#[async_trait::async_trait]
impl Handler4 for DnsHandler4 {
    async fn handle(&self, request: &Message4, mut response: Message4) -> Outcome<Message4> {
        if request.is_option_requested(option4::DOMAIN_NAME_SERVER) {
            let value: Vec<u8> = self.servers.iter().flat_map(|ip| ip.octets()).collect();
            response.set_option(option4::DOMAIN_NAME_SERVER, value);
        }
        Outcome::Continue(response)
    }
}

/// DHCPv6 handler adding the DNS Recursive Name Server option
#[derive(Debug, Clone)]
pub struct DnsHandler6 {
    servers: Vec<Ipv6Addr>,
}

impl DnsHandler6 {
    pub fn new(servers: Vec<Ipv6Addr>) -> Self {
        Self { servers }
    }
}

#[async_trait::async_trait]
impl Handler6 for DnsHandler6 {
    async fn handle(&self, request: &Message6, mut response: Message6) -> Outcome<Message6> {
        if request.is_option_requested(option6::DNS_SERVERS) {
            let value: Vec<u8> = self.servers.iter().flat_map(|ip| ip.octets()).collect();
            response.set_option(option6::DNS_SERVERS, value);
        }
        Outcome::Continue(response)
    }
}

fn parse_servers<T: FromStr>(args: &[String], kind: &str) -> Result<Vec<T>> {
    if args.is_empty() {
        return Err(Error::invalid_args("need at least one DNS server"));
    }
    args.iter()
        .map(|arg| {
            arg.parse()
                .map_err(|_| Error::invalid_args(format!("expected an {} address, got '{}'", kind, arg)))
        })
        .collect()
}

/// DHCPv4 setup: every argument is an IPv4 server address
pub fn setup4(args: &[String]) -> Result<Arc<dyn Handler4>> {
    let servers = parse_servers::<Ipv4Addr>(args, "IPv4")?;
    info!("Loaded {} DHCPv4 DNS server(s)", servers.len());
    Ok(Arc::new(DnsHandler4::new(servers)))
}

/// DHCPv6 setup: every argument is an IPv6 server address
pub fn setup6(args: &[String]) -> Result<Arc<dyn Handler6>> {
    let servers = parse_servers::<Ipv6Addr>(args, "IPv6")?;
    info!("Loaded {} DHCPv6 DNS server(s)", servers.len());
    Ok(Arc::new(DnsHandler6::new(servers)))
}

/// The plugin record
pub fn plugin() -> Plugin {
    Plugin::new(PLUGIN_NAME)
        .with_setup4(setup4)
        .with_setup6(setup6)
}

/// Register the DNS plugin with the registry
pub fn register(registry: &mut PluginRegistry) -> Result<()> {
    registry.register(plugin())
}
