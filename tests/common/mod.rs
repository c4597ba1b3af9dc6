//! Shared fixture: a page context bootstrapped against the loopback host.

use std::rc::Rc;

use serde_json::json;

use extshim::transport::loopback::LoopbackHost;
use extshim::{
    ApiRoot, BootstrapConfig, Bridge, ContextCapabilities, HostPrimitives, PageGlobals,
};

pub struct Fixture {
    pub host: Rc<LoopbackHost>,
    pub page: PageGlobals,
    pub root: Rc<ApiRoot>,
}

pub fn default_config() -> BootstrapConfig {
    BootstrapConfig {
        extension_id: Some("test-extension".into()),
        manifest: json!({
            "name": "fixture",
            "browser_action": { "default_title": "fixture" },
        }),
        debug: false,
    }
}

pub fn bootstrap(config: BootstrapConfig) -> Fixture {
    let host = LoopbackHost::new();
    let page = PageGlobals::new();
    let root = Bridge::bootstrap(
        &page,
        ContextCapabilities {
            primitives: Some(HostPrimitives {
                call: host.clone(),
                events: host.clone(),
            }),
            config,
        },
    )
    .expect("bootstrap page context");
    Fixture { host, page, root }
}
