use std::rc::Rc;

use crate::api::{Env, Namespace};
use crate::error::ShimError;

pub fn build(_env: &Rc<Env>, base: Namespace) -> Result<Namespace, ShimError> {
    Ok(base
        .with_proxied("get")
        .with_proxied("getAll")
        .with_proxied("set")
        .with_proxied("remove")
        .with_event("onChanged"))
}
