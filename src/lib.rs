//! Client-side compatibility layer for a browser-extension-style API.
//!
//! Content running inside an unprivileged execution context gets a rich,
//! namespaced API surface (`tabs`, `windows`, `storage`, ...) while all real
//! work happens in a privileged host process. This crate fabricates the
//! surface, marshals every call through one narrow asynchronous channel, and
//! demultiplexes host-originated events back to local listeners. Namespaces
//! are constructed lazily on first access and memoized in place; transport
//! failures degrade to empty results instead of surfacing to callers.

pub mod api;
pub mod bridge;
pub mod codec;
pub mod config;
pub mod error;
pub mod gateway;
pub mod payload;
pub mod relay;
pub mod transport;

pub use api::root::ApiRoot;
pub use api::{Env, Namespace};
pub use bridge::{
    Bridge, BridgeMode, ContextCapabilities, GlobalValue, HostPrimitives, PageGlobals,
    API_ALIAS, API_BINDING, BOOTSTRAP_BINDING,
};
pub use config::BootstrapConfig;
pub use error::ShimError;
pub use gateway::{Dispatch, Gateway, MethodKind, MethodSpec};
pub use payload::{Arg, Callback, ImageData};
pub use relay::{EventChannel, EventRelay, Listener};
