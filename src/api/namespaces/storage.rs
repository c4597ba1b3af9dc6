use std::rc::Rc;

use crate::api::{Env, Namespace};
use crate::error::ShimError;

pub fn build(env: &Rc<Env>, base: Namespace) -> Result<Namespace, ShimError> {
    let local = Rc::new(area(env, "local"));
    let session = Rc::new(area(env, "session"));

    Ok(base
        .with_event("onChanged")
        .with_area("local", Rc::clone(&local))
        // `sync` resolves to the same backing area as `local`: a
        // configuration-time assignment, not a runtime indirection.
        .with_area("sync", local)
        .with_area("session", session))
}

fn area(env: &Rc<Env>, name: &str) -> Namespace {
    Namespace::new(env, format!("storage.{name}"))
        .with_proxied("get")
        .with_proxied("set")
        .with_proxied("remove")
        .with_proxied("clear")
}
