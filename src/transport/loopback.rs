//! In-memory host double for tests and demos. Tests should rely on this
//! instead of hand-rolling transport fakes so assertions stay stable while
//! the shim evolves.

use std::cell::RefCell;
use std::collections::{HashMap, HashSet};
use std::rc::Rc;

use futures_util::future::LocalBoxFuture;
use serde_json::Value;

use super::{CallPrimitive, EventPrimitive, EventSink, TransportError};

pub type HostHandler = Rc<dyn Fn(Vec<Value>) -> Result<Value, TransportError>>;

#[derive(Debug, Clone)]
pub struct RecordedCall {
    pub method: String,
    pub args: Vec<Value>,
}

/// Loopback "privileged host": answers calls from registered handlers,
/// records every request it sees, and lets a test push events into whatever
/// sinks the relay has registered.
#[derive(Default)]
pub struct LoopbackHost {
    handlers: RefCell<HashMap<String, HostHandler>>,
    failing: RefCell<HashSet<String>>,
    sinks: RefCell<HashMap<String, Vec<EventSink>>>,
    calls: RefCell<Vec<RecordedCall>>,
}

impl LoopbackHost {
    pub fn new() -> Rc<Self> {
        Rc::new(Self::default())
    }

    /// Answer `method` with `handler`. Unhandled methods resolve to null.
    pub fn handle(
        &self,
        method: &str,
        handler: impl Fn(Vec<Value>) -> Result<Value, TransportError> + 'static,
    ) {
        self.handlers
            .borrow_mut()
            .insert(method.to_string(), Rc::new(handler));
    }

    /// Force every call to `method` to reject at the transport level.
    pub fn fail(&self, method: &str) {
        self.failing.borrow_mut().insert(method.to_string());
    }

    /// Deliver an unsolicited event into the context, as the real host would.
    pub fn emit(&self, event: &str, payload: Value) {
        let sinks = self
            .sinks
            .borrow()
            .get(event)
            .cloned()
            .unwrap_or_default();
        for sink in sinks {
            sink(payload.clone());
        }
    }

    pub fn calls(&self) -> Vec<RecordedCall> {
        self.calls.borrow().clone()
    }

    pub fn calls_for(&self, method: &str) -> usize {
        self.calls
            .borrow()
            .iter()
            .filter(|call| call.method == method)
            .count()
    }

    pub fn has_subscriber(&self, event: &str) -> bool {
        self.sinks
            .borrow()
            .get(event)
            .map(|sinks| !sinks.is_empty())
            .unwrap_or(false)
    }
}

impl CallPrimitive for LoopbackHost {
    fn call(
        &self,
        method: &str,
        args: Vec<Value>,
    ) -> LocalBoxFuture<'static, Result<Value, TransportError>> {
        self.calls.borrow_mut().push(RecordedCall {
            method: method.to_string(),
            args: args.clone(),
        });

        let outcome = if self.failing.borrow().contains(method) {
            Err(TransportError(format!("forced failure for {method}")))
        } else if let Some(handler) = self.handlers.borrow().get(method).cloned() {
            handler(args)
        } else {
            Ok(Value::Null)
        };

        Box::pin(async move { outcome })
    }
}

impl EventPrimitive for LoopbackHost {
    fn subscribe(&self, event: &str, sink: EventSink) {
        self.sinks
            .borrow_mut()
            .entry(event.to_string())
            .or_default()
            .push(sink);
    }

    fn unsubscribe(&self, event: &str) {
        self.sinks.borrow_mut().remove(event);
    }
}
