mod common;

use std::rc::Rc;

use serde_json::json;

use extshim::{Arg, BootstrapConfig, Dispatch, ImageData};

#[tokio::test]
async fn storage_sync_is_an_alias_of_local_and_session_is_not() {
    let fixture = common::bootstrap(common::default_config());
    let storage = fixture
        .root
        .namespace("storage")
        .expect("read slot")
        .expect("storage installed");

    let local = storage.area("local").expect("local area");
    let sync = storage.area("sync").expect("sync area");
    let session = storage.area("session").expect("session area");

    assert!(Rc::ptr_eq(&local, &sync), "sync resolves to the local area");
    assert!(!Rc::ptr_eq(&local, &session));

    let Dispatch::Future(fut) = sync
        .call("get", vec![Arg::Value(json!(["theme"]))])
        .expect("call")
    else {
        panic!("expected future");
    };
    fut.await;

    let calls = fixture.host.calls();
    assert_eq!(calls.len(), 1);
    assert_eq!(
        calls[0].method, "storage.local.get",
        "aliased writes land on the local area's qualified name"
    );
}

#[tokio::test]
async fn runtime_answers_manifest_and_url_without_the_host() {
    let fixture = common::bootstrap(common::default_config());
    let runtime = fixture
        .root
        .namespace("runtime")
        .expect("read slot")
        .expect("runtime installed");

    let Dispatch::Future(fut) = runtime.call("getManifest", vec![]).expect("call") else {
        panic!("expected future");
    };
    let manifest = fut.await.expect("manifest");
    assert_eq!(manifest["name"], json!("fixture"));

    let Dispatch::Future(fut) = runtime
        .call("getURL", vec![Arg::Value(json!("popup.html"))])
        .expect("call")
    else {
        panic!("expected future");
    };
    assert_eq!(
        fut.await,
        Some(json!("chrome-extension://test-extension/popup.html"))
    );

    assert_eq!(runtime.constant("id"), Some(&json!("test-extension")));
    assert!(fixture.host.calls().is_empty(), "nothing crossed the boundary");
}

#[tokio::test]
async fn runtime_id_is_absent_without_an_extension_id() {
    let fixture = common::bootstrap(BootstrapConfig {
        extension_id: None,
        manifest: json!({ "name": "anonymous" }),
        debug: false,
    });
    let runtime = fixture
        .root
        .namespace("runtime")
        .expect("read slot")
        .expect("runtime installed");
    assert_eq!(runtime.constant("id"), None);
}

#[tokio::test]
async fn platform_constants_are_exposed_per_namespace() {
    let fixture = common::bootstrap(common::default_config());

    let tabs = fixture
        .root
        .namespace("tabs")
        .expect("read slot")
        .expect("tabs installed");
    assert_eq!(tabs.constant("TAB_ID_NONE"), Some(&json!(-1)));

    let windows = fixture
        .root
        .namespace("windows")
        .expect("read slot")
        .expect("windows installed");
    assert_eq!(windows.constant("WINDOW_ID_NONE"), Some(&json!(-1)));
    assert_eq!(windows.constant("WINDOW_ID_CURRENT"), Some(&json!(-2)));
}

#[tokio::test]
async fn set_icon_encodes_a_size_keyed_buffer_map_before_the_boundary() {
    let fixture = common::bootstrap(common::default_config());
    let action = fixture
        .root
        .namespace("browserAction")
        .expect("read slot")
        .expect("browserAction installed");

    let pixels = |size: u32| ImageData::new(size, size, vec![0x7F; (size * size * 4) as usize]);
    let Dispatch::Future(fut) = action
        .call(
            "setIcon",
            vec![Arg::object([(
                "imageData",
                Arg::object([
                    ("16", Arg::Image(pixels(16))),
                    ("32", Arg::Image(pixels(32))),
                    ("48", Arg::Image(pixels(48))),
                ]),
            )])],
        )
        .expect("call")
    else {
        panic!("expected future");
    };
    fut.await;

    let calls = fixture.host.calls();
    assert_eq!(calls[0].method, "browserAction.setIcon");
    let image_data = &calls[0].args[0]["imageData"];
    for size in ["16", "32", "48"] {
        let variant = &image_data[size];
        assert!(variant["data"].is_string(), "variant {size} carries base64");
        assert_eq!(variant["width"], variant["height"]);
    }
    assert_eq!(image_data["32"]["width"], json!(32));
}

#[tokio::test]
async fn notification_create_encodes_a_single_icon_buffer() {
    let fixture = common::bootstrap(common::default_config());
    let notifications = fixture
        .root
        .namespace("notifications")
        .expect("read slot")
        .expect("notifications installed");

    let Dispatch::Future(fut) = notifications
        .call(
            "create",
            vec![
                Arg::Value(json!("note-1")),
                Arg::object([
                    ("title", Arg::Value(json!("Done"))),
                    ("iconUrl", Arg::Image(ImageData::new(2, 2, vec![0xFF; 16]))),
                ]),
            ],
        )
        .expect("call")
    else {
        panic!("expected future");
    };
    fut.await;

    let calls = fixture.host.calls();
    assert_eq!(calls[0].method, "notifications.create");
    assert_eq!(calls[0].args[0], json!("note-1"));
    // The options object follows the notification id; the codec still
    // finds and rewrites it.
    let icon = &calls[0].args[1]["iconUrl"];
    assert_eq!(icon["width"], json!(2));
    assert!(icon["data"].is_string());
    assert_eq!(calls[0].args[1]["title"], json!("Done"));
}

#[tokio::test]
async fn i18n_answers_the_ui_language_locally() {
    let fixture = common::bootstrap(common::default_config());
    let i18n = fixture
        .root
        .namespace("i18n")
        .expect("read slot")
        .expect("i18n installed");

    let Dispatch::Future(fut) = i18n.call("getUILanguage", vec![]).expect("call") else {
        panic!("expected future");
    };
    assert_eq!(fut.await, Some(json!("en-US")));
    assert!(fixture.host.calls().is_empty());
}
