use std::rc::Rc;

use crate::api::{Env, Namespace};
use crate::codec::encode_image_arguments;
use crate::config::BootstrapConfig;
use crate::error::ShimError;

/// Only extensions declaring a browser action get the namespace at all; a
/// consumer probing for the property must see it absent otherwise.
pub fn should_inject(config: &BootstrapConfig) -> Result<bool, ShimError> {
    Ok(config.manifest_flag("browser_action"))
}

pub fn build(_env: &Rc<Env>, base: Namespace) -> Result<Namespace, ShimError> {
    Ok(base
        // setIcon accepts one buffer or a size-keyed map of buffers.
        .with_proxied_codec("setIcon", encode_image_arguments)
        .with_proxied("setTitle")
        .with_proxied("getTitle")
        .with_proxied("setBadgeText")
        .with_proxied("getBadgeText")
        .with_proxied("setPopup")
        .with_proxied("enable")
        .with_proxied("disable")
        .with_event("onClicked"))
}
