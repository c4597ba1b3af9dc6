use std::rc::Rc;

use serde_json::Value;

use crate::api::{Env, Namespace};
use crate::error::ShimError;
use crate::gateway::{complete_local, Dispatch};
use crate::payload::Arg;

pub fn build(env: &Rc<Env>, base: Namespace) -> Result<Namespace, ShimError> {
    let mut ns = base
        .with_proxied("sendMessage")
        .with_unimplemented("connect")
        .with_unimplemented("reload")
        // Answered from ambient configuration; never crosses the boundary.
        .with_local("getManifest", get_manifest)
        .with_local("getURL", get_url)
        .with_event("onMessage")
        .with_event("onInstalled")
        .with_event("onStartup");

    if let Some(id) = env.config.extension_id.clone() {
        ns = ns.with_constant("id", Value::String(id));
    }
    Ok(ns)
}

fn get_manifest(env: &Rc<Env>, mut args: Vec<Arg>) -> Dispatch {
    complete_local(Some(env.config.manifest.clone()), &mut args)
}

fn get_url(env: &Rc<Env>, mut args: Vec<Arg>) -> Dispatch {
    let path = match args.first() {
        Some(Arg::Value(Value::String(path))) => path.clone(),
        _ => String::new(),
    };
    let url = env.config.extension_url(&path);
    complete_local(Some(Value::String(url)), &mut args)
}
