//! Cross-boundary call gateway: the single chokepoint that turns a
//! `(name, args)` pair into an asynchronous round trip to the privileged
//! host. The gateway never surfaces a transport failure to the caller; a
//! failed call degrades to an empty result and leaves a note in the
//! last-error slot.

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use futures_util::future::LocalBoxFuture;
use serde_json::Value;
use tracing::{debug, warn};

use crate::api::Env;
use crate::codec::CodecFn;
use crate::payload::{flatten_args, Arg, Callback};
use crate::transport::CallPrimitive;

/// Client-side bookkeeping handler for methods with semantics that cannot be
/// delegated to the host verbatim.
pub type LocalFn = Rc<dyn Fn(&Rc<Env>, Vec<Arg>) -> Dispatch>;

/// How a named method reaches (or deliberately fails to reach) the host.
#[derive(Clone)]
pub enum MethodKind {
    /// Forwarded across the boundary, optionally through an argument codec.
    Proxied { codec: Option<CodecFn> },
    /// Declared so the surface stays syntactically complete, but not backed
    /// by the host: calls warn and complete empty without touching the
    /// transport.
    Unimplemented,
    /// Runs in this context; routed by the namespace layer, not the gateway.
    Local(LocalFn),
}

pub struct MethodSpec {
    /// Fully-qualified name as the host knows it, e.g. `tabs.create`.
    pub qualified: String,
    pub kind: MethodKind,
}

impl MethodSpec {
    pub fn proxied(qualified: impl Into<String>) -> Self {
        Self {
            qualified: qualified.into(),
            kind: MethodKind::Proxied { codec: None },
        }
    }

    pub fn proxied_with(qualified: impl Into<String>, codec: CodecFn) -> Self {
        Self {
            qualified: qualified.into(),
            kind: MethodKind::Proxied { codec: Some(codec) },
        }
    }

    pub fn unimplemented(qualified: impl Into<String>) -> Self {
        Self {
            qualified: qualified.into(),
            kind: MethodKind::Unimplemented,
        }
    }

    pub fn local(
        qualified: impl Into<String>,
        f: impl Fn(&Rc<Env>, Vec<Arg>) -> Dispatch + 'static,
    ) -> Self {
        Self {
            qualified: qualified.into(),
            kind: MethodKind::Local(Rc::new(f)),
        }
    }
}

/// Outcome of one invocation. Exactly one of the two completion paths fires:
/// either the captured trailing callback is invoked with the eventual
/// result, or the caller awaits the future. Never both, never neither.
pub enum Dispatch {
    /// A trailing callback was captured; a detached task will invoke it.
    Callback,
    /// No trailing callback; the caller awaits the result.
    Future(LocalBoxFuture<'static, Option<Value>>),
}

impl fmt::Debug for Dispatch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Dispatch::Callback => f.write_str("Callback"),
            Dispatch::Future(_) => f.write_str("Future"),
        }
    }
}

impl Dispatch {
    pub fn ready(value: Option<Value>) -> Self {
        Dispatch::Future(Box::pin(async move { value }))
    }

    pub fn into_future(self) -> Option<LocalBoxFuture<'static, Option<Value>>> {
        match self {
            Dispatch::Future(fut) => Some(fut),
            Dispatch::Callback => None,
        }
    }
}

/// Strips a trailing function argument, which by convention is the caller's
/// completion callback rather than payload.
pub(crate) fn take_trailing_callback(args: &mut Vec<Arg>) -> Option<Callback> {
    match args.last() {
        Some(Arg::Func(_)) => match args.pop() {
            Some(Arg::Func(callback)) => Some(callback),
            _ => None,
        },
        _ => None,
    }
}

/// Complete a client-side method with `value`, honoring the trailing
/// callback convention exactly the way a proxied call does.
pub fn complete_local(value: Option<Value>, args: &mut Vec<Arg>) -> Dispatch {
    match take_trailing_callback(args) {
        Some(callback) => {
            match &value {
                Some(v) => callback.invoke(std::slice::from_ref(v)),
                None => callback.invoke(&[]),
            }
            Dispatch::Callback
        }
        None => Dispatch::ready(value),
    }
}

pub struct Gateway {
    transport: Rc<dyn CallPrimitive>,
    /// Detail of the most recent degraded call; cleared on each new round
    /// trip. The proxied surface itself never rejects, so this side channel
    /// is the only place failure detail survives.
    last_error: RefCell<Option<String>>,
    debug: bool,
}

impl Gateway {
    pub fn new(transport: Rc<dyn CallPrimitive>, debug: bool) -> Rc<Self> {
        Rc::new(Self {
            transport,
            last_error: RefCell::new(None),
            debug,
        })
    }

    pub fn last_error(&self) -> Option<String> {
        self.last_error.borrow().clone()
    }

    /// Issue one request for `spec` with `args`. At most one request per
    /// invocation; no batching, no dedup.
    pub fn invoke(self: &Rc<Self>, spec: &MethodSpec, mut args: Vec<Arg>) -> Dispatch {
        let callback = take_trailing_callback(&mut args);

        let codec = match &spec.kind {
            MethodKind::Proxied { codec } => *codec,
            MethodKind::Unimplemented => {
                warn!(
                    target: "gateway",
                    method = %spec.qualified,
                    "method is not backed by the host; completing empty"
                );
                return complete_empty(callback);
            }
            MethodKind::Local(_) => {
                warn!(
                    target: "gateway",
                    method = %spec.qualified,
                    "local method routed to the gateway; completing empty"
                );
                return complete_empty(callback);
            }
        };

        // Cleared here, not inside the round-trip future: a caller reading
        // the slot right after dispatch must see this call's state, not a
        // previous call's stale detail.
        self.last_error.borrow_mut().take();

        let args = match codec {
            Some(transform) => transform(args),
            None => args,
        };
        let values = flatten_args(args);
        let fut = self.round_trip(spec.qualified.clone(), values);

        match callback {
            Some(callback) => {
                tokio::task::spawn_local(async move {
                    match fut.await {
                        Some(value) => callback.invoke(std::slice::from_ref(&value)),
                        None => callback.invoke(&[]),
                    }
                });
                Dispatch::Callback
            }
            None => Dispatch::Future(fut),
        }
    }

    fn round_trip(
        self: &Rc<Self>,
        method: String,
        args: Vec<Value>,
    ) -> LocalBoxFuture<'static, Option<Value>> {
        let gateway = Rc::clone(self);
        Box::pin(async move {
            if gateway.debug {
                let preview = Value::from(args.clone());
                debug!(
                    target: "gateway",
                    method = %method,
                    args = %preview,
                    "dispatching call"
                );
            }
            match gateway.transport.call(&method, args).await {
                Ok(value) => {
                    if gateway.debug {
                        debug!(target: "gateway", method = %method, result = %value, "call resolved");
                    }
                    Some(value)
                }
                Err(err) => {
                    warn!(
                        target: "gateway",
                        method = %method,
                        error = %err,
                        "call failed; degrading to an empty result"
                    );
                    *gateway.last_error.borrow_mut() = Some(err.to_string());
                    None
                }
            }
        })
    }
}

fn complete_empty(callback: Option<Callback>) -> Dispatch {
    match callback {
        Some(callback) => {
            callback.invoke(&[]);
            Dispatch::Callback
        }
        None => Dispatch::ready(None),
    }
}
