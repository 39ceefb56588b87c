//! Test doubles and common utilities for registry contract tests
//!
//! The doubles stand in for real plugins: they record how often their setup
//! ran and tag every response they touch, so tests can check which handlers
//! a chain contains and in what order.

#![allow(dead_code)]

use plugd_core::error::{Error, Result};
use plugd_core::handler::{Handler4, Handler6, Message4, Message6, Outcome};
use plugd_core::{Plugin, PluginRegistry};
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

/// Option code the doubles append their tag to (site-specific range)
pub const TAG_OPTION4: u8 = 224;

/// Option code the doubles append their tag to on DHCPv6
pub const TAG_OPTION6: u16 = 65000;

/// A DHCPv4 handler that appends its tag byte to the response
pub struct TagHandler4 {
    pub tag: u8,
}

#[async_trait::async_trait]
impl Handler4 for TagHandler4 {
    async fn handle(&self, _request: &Message4, mut response: Message4) -> Outcome<Message4> {
        let mut tags = response.option(TAG_OPTION4).unwrap_or_default().to_vec();
        tags.push(self.tag);
        response.set_option(TAG_OPTION4, tags);
        Outcome::Continue(response)
    }
}

/// A DHCPv6 handler that appends its tag byte to the response
pub struct TagHandler6 {
    pub tag: u8,
}

#[async_trait::async_trait]
impl Handler6 for TagHandler6 {
    async fn handle(&self, _request: &Message6, mut response: Message6) -> Outcome<Message6> {
        let mut tags = response.option(TAG_OPTION6).unwrap_or_default().to_vec();
        tags.push(self.tag);
        response.set_option(TAG_OPTION6, tags);
        Outcome::Continue(response)
    }
}

/// Setup strategy that builds tag handlers and counts its invocations
///
/// Expects exactly one argument: the tag byte in decimal.
#[derive(Clone, Default)]
pub struct CountingSetup {
    calls: Arc<AtomicUsize>,
}

impl CountingSetup {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of setup invocations so far (both families)
    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    fn parse_tag(&self, args: &[String]) -> Result<u8> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        match args {
            [tag] => tag
                .parse()
                .map_err(|_| Error::invalid_args(format!("'{}' is not a tag byte", tag))),
            _ => Err(Error::invalid_args(format!(
                "want exactly 1 argument, got {}",
                args.len()
            ))),
        }
    }
}

impl plugd_core::Setup4 for CountingSetup {
    fn setup(&self, args: &[String]) -> Result<Arc<dyn Handler4>> {
        let tag = self.parse_tag(args)?;
        Ok(Arc::new(TagHandler4 { tag }))
    }
}

impl plugd_core::Setup6 for CountingSetup {
    fn setup(&self, args: &[String]) -> Result<Arc<dyn Handler6>> {
        let tag = self.parse_tag(args)?;
        Ok(Arc::new(TagHandler6 { tag }))
    }
}

/// Plain-function DHCPv4 setup that ignores its arguments
pub fn nop_setup4(_args: &[String]) -> Result<Arc<dyn Handler4>> {
    Ok(Arc::new(TagHandler4 { tag: 0 }))
}

/// Plain-function DHCPv6 setup that ignores its arguments
pub fn nop_setup6(_args: &[String]) -> Result<Arc<dyn Handler6>> {
    Ok(Arc::new(TagHandler6 { tag: 0 }))
}

/// Registry with `"static"` (DHCPv4 only) and `"dns"` (both families)
pub fn static_and_dns_registry() -> PluginRegistry {
    let mut registry = PluginRegistry::new();
    registry
        .register(Plugin::new("static").with_setup4(nop_setup4))
        .expect("static registers");
    registry
        .register(
            Plugin::new("dns")
                .with_setup4(nop_setup4)
                .with_setup6(nop_setup6),
        )
        .expect("dns registers");
    registry
}

/// Run a DHCPv4 chain the way the dispatcher does
pub async fn run_chain4(handlers: &[Arc<dyn Handler4>], request: &Message4) -> Option<Message4> {
    let mut response = Message4::reply_to(request);
    for handler in handlers {
        match handler.handle(request, response).await {
            Outcome::Continue(next) => response = next,
            Outcome::Stop(last) => return last,
        }
    }
    Some(response)
}

/// Run a DHCPv6 chain the way the dispatcher does
pub async fn run_chain6(handlers: &[Arc<dyn Handler6>], request: &Message6) -> Option<Message6> {
    let mut response = Message6::reply_to(request);
    for handler in handlers {
        match handler.handle(request, response).await {
            Outcome::Continue(next) => response = next,
            Outcome::Stop(last) => return last,
        }
    }
    Some(response)
}
