//! The synthesized API surface: namespace objects, the declarative factory
//! table, and the lazy installer that memoizes each namespace on first read.

pub mod namespaces;
pub mod registry;
pub mod root;

use std::collections::HashMap;
use std::rc::Rc;

use serde_json::Value;

use crate::codec::CodecFn;
use crate::config::BootstrapConfig;
use crate::error::ShimError;
use crate::gateway::{Dispatch, Gateway, MethodKind, MethodSpec};
use crate::payload::Arg;
use crate::relay::{EventChannel, EventRelay};

/// Everything a namespace factory closes over: gateway, relay and ambient
/// configuration. Passed explicitly so the construction routine stays
/// self-contained and can be transplanted into another context through a
/// single bridge binding (see `bridge`).
pub struct Env {
    pub gateway: Rc<Gateway>,
    pub relay: Rc<EventRelay>,
    pub config: BootstrapConfig,
}

impl Env {
    pub fn new(gateway: Rc<Gateway>, relay: Rc<EventRelay>, config: BootstrapConfig) -> Rc<Self> {
        Rc::new(Self {
            gateway,
            relay,
            config,
        })
    }
}

/// One resolved API namespace: proxied methods, constants, event channel
/// handles and (for storage) named sub-areas. Built exactly once by its
/// factory; mutated only during that construction, effectively frozen after.
pub struct Namespace {
    name: String,
    env: Rc<Env>,
    methods: HashMap<&'static str, MethodSpec>,
    events: HashMap<&'static str, Rc<EventChannel>>,
    constants: HashMap<&'static str, Value>,
    areas: HashMap<&'static str, Rc<Namespace>>,
}

impl Namespace {
    pub fn new(env: &Rc<Env>, name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            env: Rc::clone(env),
            methods: HashMap::new(),
            events: HashMap::new(),
            constants: HashMap::new(),
            areas: HashMap::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    fn qualified(&self, member: &str) -> String {
        format!("{}.{}", self.name, member)
    }

    // Construction-time surface wiring. Consuming builders, used by the
    // namespace factories only.

    pub fn with_proxied(mut self, method: &'static str) -> Self {
        let spec = MethodSpec::proxied(self.qualified(method));
        self.methods.insert(method, spec);
        self
    }

    pub fn with_proxied_codec(mut self, method: &'static str, codec: CodecFn) -> Self {
        let spec = MethodSpec::proxied_with(self.qualified(method), codec);
        self.methods.insert(method, spec);
        self
    }

    pub fn with_unimplemented(mut self, method: &'static str) -> Self {
        let spec = MethodSpec::unimplemented(self.qualified(method));
        self.methods.insert(method, spec);
        self
    }

    pub fn with_local(
        mut self,
        method: &'static str,
        f: impl Fn(&Rc<Env>, Vec<Arg>) -> Dispatch + 'static,
    ) -> Self {
        let spec = MethodSpec::local(self.qualified(method), f);
        self.methods.insert(method, spec);
        self
    }

    pub fn with_event(mut self, event: &'static str) -> Self {
        let channel = Rc::new(self.env.relay.channel(self.qualified(event)));
        self.events.insert(event, channel);
        self
    }

    pub fn with_constant(mut self, name: &'static str, value: Value) -> Self {
        self.constants.insert(name, value);
        self
    }

    pub fn with_area(mut self, name: &'static str, area: Rc<Namespace>) -> Self {
        self.areas.insert(name, area);
        self
    }

    // Consumer surface.

    /// Invoke a member method with the caller's own trailing-callback-or-
    /// await convention.
    pub fn call(&self, method: &str, args: Vec<Arg>) -> Result<Dispatch, ShimError> {
        let spec = self
            .methods
            .get(method)
            .ok_or_else(|| ShimError::UnknownMethod(self.qualified(method)))?;
        match &spec.kind {
            MethodKind::Local(handler) => Ok(handler(&self.env, args)),
            _ => Ok(self.env.gateway.invoke(spec, args)),
        }
    }

    pub fn has_method(&self, method: &str) -> bool {
        self.methods.contains_key(method)
    }

    pub fn event(&self, event: &str) -> Result<Rc<EventChannel>, ShimError> {
        self.events
            .get(event)
            .cloned()
            .ok_or_else(|| ShimError::UnknownEvent(self.qualified(event)))
    }

    pub fn constant(&self, name: &str) -> Option<&Value> {
        self.constants.get(name)
    }

    pub fn area(&self, name: &str) -> Option<Rc<Namespace>> {
        self.areas.get(name).cloned()
    }
}
