//! Contracts for the external collaborators carrying traffic across the
//! privilege boundary. The actual transport (message ports, native
//! messaging, whatever the embedder uses) lives outside this crate; the
//! shim only needs one asynchronous call primitive and one named-event
//! subscription primitive.

use std::rc::Rc;

use futures_util::future::LocalBoxFuture;
use serde_json::Value;
use thiserror::Error;

pub mod loopback;

/// Failure of the underlying channel or a host-side throw. The gateway never
/// propagates this to API consumers.
#[derive(Debug, Clone, Error)]
#[error("transport failure: {0}")]
pub struct TransportError(pub String);

/// Receives one unsolicited event payload delivered by the host.
pub type EventSink = Rc<dyn Fn(Value)>;

/// The single narrow request/response channel into the privileged host.
///
/// Exactly one logical request per call; the implementation is responsible
/// for matching the response to its request and must resolve or reject
/// exactly once.
pub trait CallPrimitive {
    fn call(
        &self,
        method: &str,
        args: Vec<Value>,
    ) -> LocalBoxFuture<'static, Result<Value, TransportError>>;
}

/// Host-side push delivery, keyed by qualified event name. Feeds the relay.
pub trait EventPrimitive {
    fn subscribe(&self, event: &str, sink: EventSink);
    fn unsubscribe(&self, event: &str);
}
