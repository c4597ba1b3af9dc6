//! Per-method argument transforms applied before the gateway is invoked.
//!
//! The only non-serializable shape the fabricated surface accepts today is a
//! raw pixel buffer, either directly or as a map of named variants (one
//! buffer per icon size). A buffer that cannot be converted degrades to null
//! so a single bad image never aborts an otherwise valid call.

use std::collections::BTreeMap;

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine as _;
use serde_json::{json, Value};
use tracing::warn;

use crate::payload::{Arg, ImageData};

/// A pure transform over the positional argument list. Must be idempotent-
/// safe and must not mutate arguments it does not recognize.
pub type CodecFn = fn(Vec<Arg>) -> Vec<Arg>;

/// Object keys under which the fabricated surface accepts pixel buffers.
const IMAGE_KEYS: &[&str] = &["imageData", "iconUrl", "icon"];

/// Boundary-safe representation of a pixel buffer. A buffer whose length
/// does not match its dimensions degrades to null.
pub fn encode_image(image: &ImageData) -> Value {
    let expected = image.width as usize * image.height as usize * 4;
    if image.data.len() != expected {
        warn!(
            target: "gateway",
            width = image.width,
            height = image.height,
            len = image.data.len(),
            "pixel buffer does not match its dimensions; substituting null"
        );
        return Value::Null;
    }
    json!({
        "width": image.width,
        "height": image.height,
        "data": BASE64.encode(&image.data),
    })
}

/// Codec for methods whose options object may carry pixel buffers, directly
/// or as a size-keyed map (`{"16": image, "32": image}`). The options object
/// is the first object-shaped argument; some methods take a plain id before
/// it. Map keys are preserved; values that are already plain payloads pass
/// through.
pub fn encode_image_arguments(mut args: Vec<Arg>) -> Vec<Arg> {
    let options = args.iter_mut().find(|arg| matches!(arg, Arg::Object(_)));
    if let Some(Arg::Object(entries)) = options {
        for key in IMAGE_KEYS {
            if let Some(entry) = entries.remove(*key) {
                entries.insert((*key).to_string(), encode_entry(entry));
            }
        }
    }
    args
}

fn encode_entry(entry: Arg) -> Arg {
    match entry {
        Arg::Image(image) => Arg::Value(encode_image(&image)),
        Arg::Object(variants) => Arg::Object(
            variants
                .into_iter()
                .map(|(k, v)| (k, encode_entry(v)))
                .collect::<BTreeMap<_, _>>(),
        ),
        other => other,
    }
}
