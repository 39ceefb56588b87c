// # plugd-core
//
// Core library for the plugd DHCPv4/DHCPv6 server.
//
// ## Architecture Overview
//
// The server is assembled from plugins. This library provides the contract
// between plugins and the server bootstrap:
// - **Plugin**: a named unit with optional DHCPv4 and DHCPv6 setup capabilities
// - **Setup4 / Setup6**: build a packet handler from string arguments
// - **Handler4 / Handler6**: per-packet handlers consumed by the dispatcher
// - **PluginRegistry**: name-keyed directory of registered plugins
// - **bootstrap**: assembles handler chains from configuration
//
// ## Design Principles
//
// 1. **Explicit registry**: no global state; the registry is built during
//    initialization, then frozen behind an `Arc` for the serving phase
// 2. **Fail fast**: duplicate plugin names are a fatal startup error
// 3. **Opaque plugins**: the core stores setup capabilities and returns them
//    unchanged; it never interprets arguments or handlers

pub mod bootstrap;
pub mod config;
pub mod error;
pub mod handler;
pub mod registry;
pub mod setup;

// Re-export core types for convenience
pub use bootstrap::{ServerHandlers, build_server, load_plugins4, load_plugins6};
pub use config::{ListenerConfig, PluginConfig, ServerConfig};
pub use error::{Error, Result};
pub use handler::{Handler4, Handler6, Message4, Message6, Outcome};
pub use registry::PluginRegistry;
pub use setup::{Plugin, ProtocolFamily, Setup4, Setup6};
