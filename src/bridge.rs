//! Boundary bridge: decides once at startup whether the privileged
//! primitives are reachable here or whether this code is already inside the
//! restricted page context, stages the environment accordingly, runs the
//! self-contained install routine, and finalizes the global surface.

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use tracing::{debug, info};

use crate::api::registry;
use crate::api::root::ApiRoot;
use crate::api::Env;
use crate::config::BootstrapConfig;
use crate::error::ShimError;
use crate::gateway::Gateway;
use crate::relay::EventRelay;
use crate::transport::{CallPrimitive, EventPrimitive};

/// Transient binding carrying the gateway/relay environment into the page
/// context during bootstrap. Deleted during finalization so page code can
/// never reach the raw primitives.
pub const BOOTSTRAP_BINDING: &str = "__extshim_env";

pub const API_BINDING: &str = "browser";
/// Installed alongside `browser` with the same identity.
pub const API_ALIAS: &str = "chrome";

#[derive(Clone)]
pub enum GlobalValue {
    Api(Rc<ApiRoot>),
    Bootstrap(Rc<Env>),
}

struct Binding {
    value: GlobalValue,
    writable: bool,
    configurable: bool,
}

/// Global bindings of one page execution context.
#[derive(Default)]
pub struct PageGlobals {
    bindings: RefCell<HashMap<String, Binding>>,
}

impl PageGlobals {
    pub fn new() -> Self {
        Self::default()
    }

    /// Define or redefine a binding. Redefinition of a non-configurable
    /// binding is rejected.
    pub fn define(
        &self,
        name: &str,
        value: GlobalValue,
        writable: bool,
        configurable: bool,
    ) -> Result<(), ShimError> {
        let mut bindings = self.bindings.borrow_mut();
        if let Some(existing) = bindings.get(name) {
            if !existing.configurable {
                return Err(ShimError::NonConfigurable(name.to_string()));
            }
        }
        bindings.insert(
            name.to_string(),
            Binding {
                value,
                writable,
                configurable,
            },
        );
        Ok(())
    }

    /// Plain assignment: allowed for writable bindings without touching the
    /// binding's flags.
    pub fn set(&self, name: &str, value: GlobalValue) -> Result<(), ShimError> {
        let mut bindings = self.bindings.borrow_mut();
        match bindings.get_mut(name) {
            Some(binding) if binding.writable => {
                binding.value = value;
                Ok(())
            }
            Some(_) => Err(ShimError::NonWritable(name.to_string())),
            None => Err(ShimError::Bootstrap(format!("no binding named {name}"))),
        }
    }

    pub fn get(&self, name: &str) -> Option<GlobalValue> {
        self.bindings.borrow().get(name).map(|b| b.value.clone())
    }

    pub fn contains(&self, name: &str) -> bool {
        self.bindings.borrow().contains_key(name)
    }

    pub fn remove(&self, name: &str) -> Result<bool, ShimError> {
        let mut bindings = self.bindings.borrow_mut();
        match bindings.get(name) {
            None => Ok(false),
            Some(binding) if !binding.configurable => {
                Err(ShimError::NonConfigurable(name.to_string()))
            }
            Some(_) => {
                bindings.remove(name);
                Ok(true)
            }
        }
    }
}

/// The privileged primitives, when this context can reach them directly.
pub struct HostPrimitives {
    pub call: Rc<dyn CallPrimitive>,
    pub events: Rc<dyn EventPrimitive>,
}

/// What the current execution context can reach, probed once at startup.
pub struct ContextCapabilities {
    pub primitives: Option<HostPrimitives>,
    pub config: BootstrapConfig,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BridgeMode {
    /// The privileged primitives are reachable here; the API is synthesized
    /// for the more restricted page context through the bootstrap binding.
    PrivilegedAdjacent,
    /// Already inside the restricted context; the privileged side has
    /// pre-populated the bootstrap binding.
    InPage,
}

pub struct Bridge;

impl Bridge {
    pub fn mode(capabilities: &ContextCapabilities) -> BridgeMode {
        if capabilities.primitives.is_some() {
            BridgeMode::PrivilegedAdjacent
        } else {
            BridgeMode::InPage
        }
    }

    /// Decide reachability, stage the environment, run the page-side install
    /// routine, and finalize the global surface.
    pub fn bootstrap(
        page: &PageGlobals,
        capabilities: ContextCapabilities,
    ) -> Result<Rc<ApiRoot>, ShimError> {
        let mode = Self::mode(&capabilities);
        debug!(target: "bridge", ?mode, "bootstrapping extension api");

        if let Some(primitives) = capabilities.primitives {
            let gateway = Gateway::new(primitives.call, capabilities.config.debug);
            let relay = EventRelay::new(primitives.events);
            let env = Env::new(gateway, relay, capabilities.config);
            // Read-only so page code cannot swap the environment out from
            // under the install routine; still configurable so finalization
            // can delete it.
            page.define(BOOTSTRAP_BINDING, GlobalValue::Bootstrap(env), false, true)?;
        }

        install_in_page(page)
    }
}

/// Self-contained install routine executed against the page context. It may
/// reach the outer context only through the bootstrap binding; everything
/// else it needs travels inside `Env`.
pub fn install_in_page(page: &PageGlobals) -> Result<Rc<ApiRoot>, ShimError> {
    let env = match page.get(BOOTSTRAP_BINDING) {
        Some(GlobalValue::Bootstrap(env)) => env,
        _ => {
            return Err(ShimError::Bootstrap(
                "bootstrap environment binding is missing".to_string(),
            ))
        }
    };

    let root = ApiRoot::install(env, registry::descriptors())?;

    // Fixed-identity, enumerable, writable but non-reconfigurable.
    page.define(API_BINDING, GlobalValue::Api(Rc::clone(&root)), true, false)?;
    page.define(API_ALIAS, GlobalValue::Api(Rc::clone(&root)), true, false)?;
    page.remove(BOOTSTRAP_BINDING)?;

    info!(
        target: "bridge",
        namespaces = root.names().len(),
        "extension api installed"
    );
    Ok(root)
}
