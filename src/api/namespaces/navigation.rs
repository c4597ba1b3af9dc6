use std::rc::Rc;

use crate::api::{Env, Namespace};
use crate::error::ShimError;

pub fn build(_env: &Rc<Env>, base: Namespace) -> Result<Namespace, ShimError> {
    Ok(base
        .with_proxied("getFrame")
        .with_proxied("getAllFrames")
        .with_event("onBeforeNavigate")
        .with_event("onCommitted")
        .with_event("onCompleted")
        .with_event("onErrorOccurred"))
}
