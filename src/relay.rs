//! Event relay: bridges host-originated push notifications to any number of
//! locally registered listeners. The relay owns the channel-to-listener-set
//! mapping for the lifetime of the context; dispatch is driven entirely by
//! the transport delivering named events into this context.

use std::cell::RefCell;
use std::collections::HashMap;
use std::fmt;
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::rc::Rc;

use serde_json::Value;
use tracing::{debug, error};

use crate::error::ShimError;
use crate::transport::EventPrimitive;

/// A locally registered listener. Identity is pointer identity: registering
/// the same `Listener` value twice yields two independently removable
/// entries, while structurally identical closures stay distinct.
#[derive(Clone)]
pub struct Listener(Rc<dyn Fn(&Value)>);

impl Listener {
    pub fn new(f: impl Fn(&Value) + 'static) -> Self {
        Self(Rc::new(f))
    }

    pub fn ptr_eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }

    fn call(&self, payload: &Value) {
        (self.0)(payload)
    }
}

impl fmt::Debug for Listener {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Listener")
    }
}

#[derive(Default)]
struct ChannelState {
    listeners: Vec<Listener>,
    /// Whether a sink is currently registered with the host primitive.
    hooked: bool,
}

pub struct EventRelay {
    host: Rc<dyn EventPrimitive>,
    channels: RefCell<HashMap<String, ChannelState>>,
}

impl EventRelay {
    pub fn new(host: Rc<dyn EventPrimitive>) -> Rc<Self> {
        Rc::new(Self {
            host,
            channels: RefCell::new(HashMap::new()),
        })
    }

    /// Handle for one named channel. Handles are cheap; the listener set
    /// lives here.
    pub fn channel(self: &Rc<Self>, name: impl Into<String>) -> EventChannel {
        EventChannel {
            name: name.into(),
            relay: Rc::clone(self),
        }
    }

    pub fn subscribe(self: &Rc<Self>, channel: &str, listener: Listener) {
        let needs_hook = {
            let mut channels = self.channels.borrow_mut();
            let state = channels.entry(channel.to_string()).or_default();
            state.listeners.push(listener);
            if state.hooked {
                false
            } else {
                state.hooked = true;
                true
            }
        };

        if needs_hook {
            let relay = Rc::downgrade(self);
            let sink_channel = channel.to_string();
            self.host.subscribe(
                channel,
                Rc::new(move |payload: Value| {
                    if let Some(relay) = relay.upgrade() {
                        relay.deliver(&sink_channel, &payload);
                    }
                }),
            );
        }
    }

    /// Removes the first entry matching `listener` by identity; no-op when
    /// absent. Unhooks from the host once the channel empties.
    pub fn unsubscribe(&self, channel: &str, listener: &Listener) {
        let unhook = {
            let mut channels = self.channels.borrow_mut();
            let Some(state) = channels.get_mut(channel) else {
                return;
            };
            if let Some(position) = state.listeners.iter().position(|l| l.ptr_eq(listener)) {
                state.listeners.remove(position);
            }
            if state.listeners.is_empty() && state.hooked {
                state.hooked = false;
                true
            } else {
                false
            }
        };

        if unhook {
            self.host.unsubscribe(channel);
        }
    }

    /// Fan one delivered payload out to every listener in registration
    /// order. A failing listener never blocks the listeners after it.
    pub fn deliver(&self, channel: &str, payload: &Value) {
        let listeners = match self.channels.borrow().get(channel) {
            Some(state) => state.listeners.clone(),
            None => return,
        };
        debug!(target: "relay", channel, count = listeners.len(), "delivering event");
        for listener in listeners {
            if let Err(panic) = catch_unwind(AssertUnwindSafe(|| listener.call(payload))) {
                let detail = panic
                    .downcast_ref::<&str>()
                    .map(|s| (*s).to_string())
                    .or_else(|| panic.downcast_ref::<String>().cloned())
                    .unwrap_or_else(|| "non-string panic".to_string());
                error!(target: "relay", channel, detail = %detail, "listener panicked during delivery");
            }
        }
    }

    pub fn listener_count(&self, channel: &str) -> usize {
        self.channels
            .borrow()
            .get(channel)
            .map(|state| state.listeners.len())
            .unwrap_or(0)
    }
}

/// Per-channel event handle with the standard emitter contract. Rule
/// management and listener introspection are declared for surface
/// compatibility but intentionally unsupported: they fail loudly instead of
/// silently no-oping, unlike the gateway's deliberately stubbed methods.
pub struct EventChannel {
    name: String,
    relay: Rc<EventRelay>,
}

impl EventChannel {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn add_listener(&self, listener: Listener) {
        self.relay.subscribe(&self.name, listener);
    }

    pub fn remove_listener(&self, listener: &Listener) {
        self.relay.unsubscribe(&self.name, listener);
    }

    pub fn add_rules(&self, _rules: Vec<Value>) -> Result<(), ShimError> {
        Err(ShimError::NotImplemented("event rule management"))
    }

    pub fn get_rules(&self) -> Result<Vec<Value>, ShimError> {
        Err(ShimError::NotImplemented("event rule management"))
    }

    pub fn remove_rules(&self, _rule_ids: Vec<Value>) -> Result<(), ShimError> {
        Err(ShimError::NotImplemented("event rule management"))
    }

    pub fn has_listeners(&self) -> Result<bool, ShimError> {
        Err(ShimError::NotImplemented("listener introspection"))
    }
}
