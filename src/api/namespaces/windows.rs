use std::rc::Rc;

use serde_json::json;

use crate::api::{Env, Namespace};
use crate::error::ShimError;

pub const WINDOW_ID_NONE: i64 = -1;
pub const WINDOW_ID_CURRENT: i64 = -2;

pub fn build(_env: &Rc<Env>, base: Namespace) -> Result<Namespace, ShimError> {
    Ok(base
        .with_proxied("create")
        .with_proxied("update")
        .with_proxied("remove")
        .with_proxied("get")
        .with_proxied("getAll")
        .with_proxied("getCurrent")
        .with_proxied("getLastFocused")
        .with_event("onCreated")
        .with_event("onRemoved")
        .with_event("onFocusChanged")
        .with_constant("WINDOW_ID_NONE", json!(WINDOW_ID_NONE))
        .with_constant("WINDOW_ID_CURRENT", json!(WINDOW_ID_CURRENT)))
}
