// # Handler Traits
//
// Defines the shape of the per-packet handlers that plugin setup
// capabilities produce.
//
// The core never calls these itself. Handlers are handed to the server's
// dispatcher, which runs them in configuration order for every incoming
// packet: each handler receives the request and the response built so far,
// and either passes the response on or ends the chain.
//
// ## Usage
//
// ```rust,ignore
// use plugd_core::handler::{Handler4, Message4, Outcome};
//
// struct Nop;
//
// #[async_trait::async_trait]
// impl Handler4 for Nop {
//     async fn handle(&self, _request: &Message4, response: Message4) -> Outcome<Message4> {
//         Outcome::Continue(response)
//     }
// }
// ```

pub mod message;

pub use message::{Message4, Message6, option4, option6};

use async_trait::async_trait;

/// What a handler decided to do with the response
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome<M> {
    /// Pass the (possibly modified) response to the next handler
    Continue(M),
    /// End the chain here
    ///
    /// `None` drops the packet without replying.
    Stop(Option<M>),
}

impl<M> Outcome<M> {
    /// Whether the chain stops after this handler
    pub fn is_stop(&self) -> bool {
        matches!(self, Outcome::Stop(_))
    }

    /// The response carried by this outcome, if any
    pub fn into_response(self) -> Option<M> {
        match self {
            Outcome::Continue(m) => Some(m),
            Outcome::Stop(m) => m,
        }
    }
}

/// A DHCPv4 packet handler
///
/// Implementations must be thread-safe: the dispatcher shares one handler
/// instance across all in-flight requests.
#[async_trait]
pub trait Handler4: Send + Sync {
    /// Process one request
    async fn handle(&self, request: &Message4, response: Message4) -> Outcome<Message4>;
}

/// A DHCPv6 packet handler
#[async_trait]
pub trait Handler6: Send + Sync {
    /// Process one request
    async fn handle(&self, request: &Message6, response: Message6) -> Outcome<Message6>;
}
