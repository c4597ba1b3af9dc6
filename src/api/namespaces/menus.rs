use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use serde_json::{json, Value};
use tracing::debug;
use uuid::Uuid;

use crate::api::{Env, Namespace};
use crate::error::ShimError;
use crate::gateway::{take_trailing_callback, Dispatch, MethodSpec};
use crate::payload::{Arg, Callback};
use crate::relay::Listener;

pub const ACTION_MENU_TOP_LEVEL_LIMIT: i64 = 6;

/// Click handlers are not boundary-transferable, so `create` retains them
/// here keyed by item id and the `onClicked` channel re-associates them.
/// Entries persist for the lifetime of the context; there is no eviction.
#[derive(Default)]
struct ClickRegistry {
    handlers: RefCell<HashMap<String, Callback>>,
}

pub fn build(_env: &Rc<Env>, base: Namespace) -> Result<Namespace, ShimError> {
    let registry = Rc::new(ClickRegistry::default());

    let create_registry = Rc::clone(&registry);
    let ns = base
        .with_local("create", move |env, args| {
            create_item(env, &create_registry, args)
        })
        .with_proxied("update")
        .with_proxied("remove")
        .with_proxied("removeAll")
        .with_event("onClicked")
        .with_constant(
            "ACTION_MENU_TOP_LEVEL_LIMIT",
            json!(ACTION_MENU_TOP_LEVEL_LIMIT),
        );

    // Wired once at construction; the registry lookup happens on every
    // delivery.
    ns.event("onClicked")?
        .add_listener(Listener::new(move |payload| {
            dispatch_click(&registry, payload)
        }));

    Ok(ns)
}

/// Create-with-identifier: synthesize an id when the caller omits one,
/// privately retain any click handler, forward the serializable remainder,
/// and resolve with the item id.
fn create_item(env: &Rc<Env>, registry: &Rc<ClickRegistry>, mut args: Vec<Arg>) -> Dispatch {
    let completion = take_trailing_callback(&mut args);

    let mut entries = match args.into_iter().next() {
        Some(Arg::Object(entries)) => entries,
        Some(Arg::Value(Value::Object(map))) => map
            .into_iter()
            .map(|(k, v)| (k, Arg::Value(v)))
            .collect(),
        _ => Default::default(),
    };

    let id = match entries.get("id") {
        Some(Arg::Value(Value::String(id))) => id.clone(),
        _ => Uuid::new_v4().to_string(),
    };
    entries.insert("id".to_string(), Arg::Value(Value::String(id.clone())));

    if let Some(Arg::Func(handler)) = entries.remove("onclick") {
        registry.handlers.borrow_mut().insert(id.clone(), handler);
    }

    let spec = MethodSpec::proxied("contextMenus.create");
    let forwarded = env
        .gateway
        .invoke(&spec, vec![Arg::Object(entries)])
        .into_future();

    let result = Value::String(id);
    match completion {
        Some(callback) => {
            tokio::task::spawn_local(async move {
                if let Some(fut) = forwarded {
                    let _ = fut.await;
                }
                callback.invoke(std::slice::from_ref(&result));
            });
            Dispatch::Callback
        }
        None => Dispatch::Future(Box::pin(async move {
            if let Some(fut) = forwarded {
                let _ = fut.await;
            }
            Some(result)
        })),
    }
}

/// Look the clicked item's handler up by id and invoke it with the click
/// info and the tab context, but only when both are present.
fn dispatch_click(registry: &Rc<ClickRegistry>, payload: &Value) {
    let info = match payload.get("info") {
        Some(info) => info.clone(),
        None => payload.clone(),
    };
    let Some(item_id) = info.get("menuItemId") else {
        return;
    };
    let key = match item_id {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    };

    let handler = registry.handlers.borrow().get(&key).cloned();
    let Some(handler) = handler else {
        debug!(target: "relay", item = %key, "menu click with no retained handler");
        return;
    };
    let Some(tab) = payload.get("tab").cloned() else {
        return;
    };
    handler.invoke(&[info, tab]);
}
