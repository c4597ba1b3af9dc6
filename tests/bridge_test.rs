mod common;

use std::rc::Rc;

use extshim::transport::loopback::LoopbackHost;
use extshim::{
    Bridge, BridgeMode, ContextCapabilities, Env, EventRelay, Gateway, GlobalValue,
    HostPrimitives, PageGlobals, ShimError, API_ALIAS, API_BINDING, BOOTSTRAP_BINDING,
};

#[tokio::test]
async fn finalized_page_exposes_browser_and_chrome_with_one_identity() {
    let fixture = common::bootstrap(common::default_config());

    let browser = match fixture.page.get(API_BINDING) {
        Some(GlobalValue::Api(root)) => root,
        _ => panic!("browser binding missing"),
    };
    let chrome = match fixture.page.get(API_ALIAS) {
        Some(GlobalValue::Api(root)) => root,
        _ => panic!("chrome binding missing"),
    };

    assert!(Rc::ptr_eq(&browser, &chrome), "alias shares identity");
    assert!(Rc::ptr_eq(&browser, &fixture.root));
    assert!(
        !fixture.page.contains(BOOTSTRAP_BINDING),
        "bootstrap binding must not survive finalization"
    );
}

#[tokio::test]
async fn api_bindings_resist_redefinition_and_deletion_but_allow_assignment() {
    let fixture = common::bootstrap(common::default_config());

    assert!(matches!(
        fixture.page.define(
            API_BINDING,
            GlobalValue::Api(Rc::clone(&fixture.root)),
            true,
            true,
        ),
        Err(ShimError::NonConfigurable(name)) if name == API_BINDING
    ));
    assert!(matches!(
        fixture.page.remove(API_ALIAS),
        Err(ShimError::NonConfigurable(_))
    ));

    // Plain assignment stays open so page code can shadow the surface.
    fixture
        .page
        .set(API_BINDING, GlobalValue::Api(Rc::clone(&fixture.root)))
        .expect("writable binding accepts assignment");
}

#[tokio::test]
async fn mode_follows_primitive_reachability() {
    let host = LoopbackHost::new();
    let adjacent = ContextCapabilities {
        primitives: Some(HostPrimitives {
            call: host.clone(),
            events: host,
        }),
        config: common::default_config(),
    };
    assert_eq!(Bridge::mode(&adjacent), BridgeMode::PrivilegedAdjacent);

    let in_page = ContextCapabilities {
        primitives: None,
        config: common::default_config(),
    };
    assert_eq!(Bridge::mode(&in_page), BridgeMode::InPage);
}

#[tokio::test]
async fn in_page_bootstrap_consumes_a_pre_populated_binding() {
    let host = LoopbackHost::new();
    let env = Env::new(
        Gateway::new(host.clone(), false),
        EventRelay::new(host),
        common::default_config(),
    );

    // The privileged side stages the environment before handing over.
    let page = PageGlobals::new();
    page.define(BOOTSTRAP_BINDING, GlobalValue::Bootstrap(env), false, true)
        .expect("stage bootstrap binding");

    let root = Bridge::bootstrap(
        &page,
        ContextCapabilities {
            primitives: None,
            config: common::default_config(),
        },
    )
    .expect("in-page bootstrap");

    assert!(root.contains("runtime"));
    assert!(page.contains(API_BINDING));
    assert!(!page.contains(BOOTSTRAP_BINDING));
}

#[tokio::test]
async fn in_page_bootstrap_without_the_binding_fails() {
    let page = PageGlobals::new();
    let result = Bridge::bootstrap(
        &page,
        ContextCapabilities {
            primitives: None,
            config: common::default_config(),
        },
    );
    assert!(matches!(result, Err(ShimError::Bootstrap(_))));
}
