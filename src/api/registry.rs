//! Declarative namespace factory table. Each entry is pure configuration:
//! an optional injection predicate and a builder. The table enumerates its
//! own entries explicitly; nothing reflects over ambient state.

use std::rc::Rc;

use super::namespaces;
use super::{Env, Namespace};
use crate::config::BootstrapConfig;
use crate::error::ShimError;

/// Builder from a base stub object to the fully-wired namespace object.
pub type FactoryFn = fn(&Rc<Env>, Namespace) -> Result<Namespace, ShimError>;

/// Pure predicate over ambient manifest/context data deciding whether the
/// namespace should exist at all in this context.
pub type InjectFn = fn(&BootstrapConfig) -> Result<bool, ShimError>;

pub struct NamespaceDescriptor {
    pub name: &'static str,
    pub should_inject: Option<InjectFn>,
    pub factory: FactoryFn,
}

/// The full factory table. Per-namespace method lists live in the builders;
/// the table itself only names them.
pub fn descriptors() -> Vec<NamespaceDescriptor> {
    vec![
        NamespaceDescriptor {
            name: "tabs",
            should_inject: None,
            factory: namespaces::tabs::build,
        },
        NamespaceDescriptor {
            name: "windows",
            should_inject: None,
            factory: namespaces::windows::build,
        },
        NamespaceDescriptor {
            name: "runtime",
            should_inject: None,
            factory: namespaces::runtime::build,
        },
        NamespaceDescriptor {
            name: "storage",
            should_inject: None,
            factory: namespaces::storage::build,
        },
        NamespaceDescriptor {
            name: "cookies",
            should_inject: None,
            factory: namespaces::cookies::build,
        },
        NamespaceDescriptor {
            name: "notifications",
            should_inject: None,
            factory: namespaces::notifications::build,
        },
        NamespaceDescriptor {
            name: "contextMenus",
            should_inject: None,
            factory: namespaces::menus::build,
        },
        NamespaceDescriptor {
            name: "webNavigation",
            should_inject: None,
            factory: namespaces::navigation::build,
        },
        NamespaceDescriptor {
            name: "browserAction",
            should_inject: Some(namespaces::action::should_inject),
            factory: namespaces::action::build,
        },
        NamespaceDescriptor {
            name: "i18n",
            should_inject: None,
            factory: namespaces::i18n::build,
        },
    ]
}
