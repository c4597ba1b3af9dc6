use std::rc::Rc;

use crate::api::{Env, Namespace};
use crate::codec::encode_image_arguments;
use crate::error::ShimError;

pub fn build(_env: &Rc<Env>, base: Namespace) -> Result<Namespace, ShimError> {
    Ok(base
        // Notification options may carry a raw icon buffer.
        .with_proxied_codec("create", encode_image_arguments)
        .with_proxied_codec("update", encode_image_arguments)
        .with_proxied("clear")
        .with_proxied("getAll")
        .with_event("onClicked")
        .with_event("onClosed")
        .with_event("onButtonClicked"))
}
