use std::rc::Rc;

use serde_json::json;

use crate::api::{Env, Namespace};
use crate::error::ShimError;

/// Sentinel for "no tab", mirroring the platform constant.
pub const TAB_ID_NONE: i64 = -1;

pub fn build(_env: &Rc<Env>, base: Namespace) -> Result<Namespace, ShimError> {
    Ok(base
        .with_proxied("create")
        .with_proxied("update")
        .with_proxied("remove")
        .with_proxied("query")
        .with_proxied("get")
        .with_proxied("captureVisibleTab")
        // Cross-page messaging has no host backing yet; the method stays
        // callable so feature probes keep working.
        .with_unimplemented("sendMessage")
        .with_event("onCreated")
        .with_event("onUpdated")
        .with_event("onRemoved")
        .with_event("onActivated")
        .with_constant("TAB_ID_NONE", json!(TAB_ID_NONE)))
}
