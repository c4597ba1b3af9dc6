mod common;

use std::cell::Cell;
use std::rc::Rc;

use serde_json::json;

use extshim::api::registry::NamespaceDescriptor;
use extshim::transport::loopback::LoopbackHost;
use extshim::{ApiRoot, BootstrapConfig, Env, EventRelay, Gateway, Namespace, ShimError};

thread_local! {
    static BUILD_COUNT: Cell<usize> = Cell::new(0);
}

fn counting_factory(_env: &Rc<Env>, base: Namespace) -> Result<Namespace, ShimError> {
    BUILD_COUNT.with(|count| count.set(count.get() + 1));
    Ok(base.with_constant("MARK", json!(true)))
}

fn failing_factory(_env: &Rc<Env>, _base: Namespace) -> Result<Namespace, ShimError> {
    Err(ShimError::Bootstrap("factory defect".to_string()))
}

fn gate_open(_config: &BootstrapConfig) -> Result<bool, ShimError> {
    Ok(true)
}

fn gate_closed(_config: &BootstrapConfig) -> Result<bool, ShimError> {
    Ok(false)
}

fn gate_broken(_config: &BootstrapConfig) -> Result<bool, ShimError> {
    Err(ShimError::Bootstrap("predicate defect".to_string()))
}

fn make_env() -> Rc<Env> {
    let host = LoopbackHost::new();
    Env::new(
        Gateway::new(host.clone(), false),
        EventRelay::new(host),
        BootstrapConfig::default(),
    )
}

#[tokio::test]
async fn factory_runs_once_and_reads_return_the_identical_object() {
    BUILD_COUNT.with(|count| count.set(0));
    let root = ApiRoot::install(
        make_env(),
        vec![NamespaceDescriptor {
            name: "custom",
            should_inject: None,
            factory: counting_factory,
        }],
    )
    .expect("install");

    assert!(root.contains("custom"));
    assert_eq!(
        BUILD_COUNT.with(|count| count.get()),
        0,
        "unread namespaces incur zero construction cost"
    );

    let first = root.namespace("custom").expect("read").expect("resolved");
    let second = root.namespace("custom").expect("read").expect("resolved");
    assert!(Rc::ptr_eq(&first, &second));
    assert_eq!(BUILD_COUNT.with(|count| count.get()), 1);
    assert_eq!(first.constant("MARK"), Some(&json!(true)));
}

#[tokio::test]
async fn gated_out_namespace_is_absent_not_empty() {
    let root = ApiRoot::install(
        make_env(),
        vec![
            NamespaceDescriptor {
                name: "present",
                should_inject: Some(gate_open),
                factory: counting_factory,
            },
            NamespaceDescriptor {
                name: "absent",
                should_inject: Some(gate_closed),
                factory: counting_factory,
            },
        ],
    )
    .expect("install");

    assert!(root.contains("present"));
    assert!(!root.contains("absent"), "key must not exist at all");
    assert!(root.namespace("absent").expect("read").is_none());
}

#[tokio::test]
async fn broken_predicate_fails_the_bootstrap() {
    let result = ApiRoot::install(
        make_env(),
        vec![NamespaceDescriptor {
            name: "broken",
            should_inject: Some(gate_broken),
            factory: counting_factory,
        }],
    );
    assert!(matches!(result, Err(ShimError::Bootstrap(_))));
}

#[tokio::test]
async fn broken_factory_keeps_failing_without_losing_the_slot() {
    let root = ApiRoot::install(
        make_env(),
        vec![NamespaceDescriptor {
            name: "broken",
            should_inject: None,
            factory: failing_factory,
        }],
    )
    .expect("install");

    assert!(matches!(
        root.namespace("broken"),
        Err(ShimError::Bootstrap(_))
    ));

    // The key must stay defined after the failure; a later read repeats
    // the error instead of pretending the namespace was never installed.
    assert!(root.contains("broken"));
    assert!(matches!(
        root.namespace("broken"),
        Err(ShimError::Bootstrap(_))
    ));
}

#[tokio::test]
async fn factory_extends_a_pre_existing_stub() {
    BUILD_COUNT.with(|count| count.set(0));
    let env = make_env();
    let root = ApiRoot::install(
        Rc::clone(&env),
        vec![NamespaceDescriptor {
            name: "custom",
            should_inject: None,
            factory: counting_factory,
        }],
    )
    .expect("install");

    root.install_stub(
        "custom",
        Namespace::new(&env, "custom").with_constant("SEED", json!(7)),
    );

    let resolved = root.namespace("custom").expect("read").expect("resolved");
    assert_eq!(resolved.constant("SEED"), Some(&json!(7)));
    assert_eq!(resolved.constant("MARK"), Some(&json!(true)));
}

#[tokio::test]
async fn browser_action_gating_follows_the_manifest() {
    let with_action = common::bootstrap(common::default_config());
    assert!(with_action.root.contains("browserAction"));

    let without_action = common::bootstrap(BootstrapConfig {
        extension_id: Some("test-extension".into()),
        manifest: json!({ "name": "no action here" }),
        debug: false,
    });
    assert!(!without_action.root.contains("browserAction"));
    assert!(without_action
        .root
        .namespace("browserAction")
        .expect("read")
        .is_none());
}
