//! Root API object with self-replacing lazy slots. Each namespace slot is a
//! tagged variant: unresolved (holding its factory and any pre-existing
//! stub) or resolved (the memoized object). The first read constructs and
//! replaces; later reads return the identical object without re-invoking the
//! factory. Single-threaded per context, so no construction race exists.

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use tracing::debug;

use super::registry::{FactoryFn, NamespaceDescriptor};
use super::{Env, Namespace};
use crate::error::ShimError;

enum Slot {
    /// Installed but never read.
    Unresolved {
        factory: FactoryFn,
        stub: Option<Namespace>,
    },
    /// First read replaced the accessor with the constructed object.
    Resolved(Rc<Namespace>),
    /// The factory failed. The key stays defined and every later read
    /// reports the same failure; a slot must never silently vanish once
    /// installed.
    Poisoned(String),
}

pub struct ApiRoot {
    env: Rc<Env>,
    slots: RefCell<HashMap<String, Slot>>,
}

impl ApiRoot {
    /// Walk the descriptor table and install one lazy slot per namespace
    /// whose gating predicate admits this context. A namespace whose
    /// predicate declines is not defined at all, so presence tests see it
    /// absent rather than empty.
    pub fn install(
        env: Rc<Env>,
        descriptors: Vec<NamespaceDescriptor>,
    ) -> Result<Rc<Self>, ShimError> {
        let mut slots = HashMap::new();
        for descriptor in descriptors {
            if let Some(predicate) = descriptor.should_inject {
                if !predicate(&env.config)? {
                    debug!(
                        target: "bridge",
                        namespace = descriptor.name,
                        "gating predicate declined injection"
                    );
                    continue;
                }
            }
            slots.insert(
                descriptor.name.to_string(),
                Slot::Unresolved {
                    factory: descriptor.factory,
                    stub: None,
                },
            );
        }
        Ok(Rc::new(Self {
            env,
            slots: RefCell::new(slots),
        }))
    }

    /// Pre-populate a partial surface for `name`. The factory extends the
    /// stub on first read instead of starting from an empty object. No-op
    /// once the slot has resolved or when the namespace was gated out.
    pub fn install_stub(&self, name: &str, stub: Namespace) {
        if let Some(Slot::Unresolved { stub: existing, .. }) = self.slots.borrow_mut().get_mut(name)
        {
            *existing = Some(stub);
        }
    }

    /// Access one namespace. The first read runs the factory exactly once
    /// and memoizes structurally; unread namespaces incur zero construction
    /// cost. Returns `None` for names that were never installed (unknown or
    /// gated out). A factory failure poisons the slot: the key stays
    /// present and every later read repeats the failure.
    pub fn namespace(&self, name: &str) -> Result<Option<Rc<Namespace>>, ShimError> {
        let (factory, stub) = {
            let mut slots = self.slots.borrow_mut();
            match slots.remove(name) {
                None => return Ok(None),
                Some(Slot::Resolved(existing)) => {
                    let out = Rc::clone(&existing);
                    slots.insert(name.to_string(), Slot::Resolved(existing));
                    return Ok(Some(out));
                }
                Some(Slot::Poisoned(detail)) => {
                    slots.insert(name.to_string(), Slot::Poisoned(detail.clone()));
                    return Err(ShimError::Bootstrap(detail));
                }
                Some(Slot::Unresolved { factory, stub }) => (factory, stub),
            }
        };

        let base = stub.unwrap_or_else(|| Namespace::new(&self.env, name));
        let built = match factory(&self.env, base) {
            Ok(built) => built,
            Err(err) => {
                self.slots
                    .borrow_mut()
                    .insert(name.to_string(), Slot::Poisoned(err.to_string()));
                return Err(err);
            }
        };
        let resolved = Rc::new(built);
        self.slots
            .borrow_mut()
            .insert(name.to_string(), Slot::Resolved(Rc::clone(&resolved)));
        debug!(target: "bridge", namespace = name, "namespace constructed");
        Ok(Some(resolved))
    }

    pub fn contains(&self, name: &str) -> bool {
        self.slots.borrow().contains_key(name)
    }

    pub fn names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.slots.borrow().keys().cloned().collect();
        names.sort();
        names
    }

    /// Failure detail from the most recent degraded call, if any. The
    /// proxied surface itself never rejects, so this is the only place a
    /// consumer can observe a transport failure.
    pub fn last_error(&self) -> Option<String> {
        self.env.gateway.last_error()
    }

    pub fn env(&self) -> &Rc<Env> {
        &self.env
    }
}
