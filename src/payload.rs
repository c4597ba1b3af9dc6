use std::collections::BTreeMap;
use std::fmt;
use std::rc::Rc;

use serde_json::Value;
use tracing::warn;

/// A function captured from a caller: either the trailing completion callback
/// of a proxied call, or a click handler buried inside a properties object.
///
/// Identity is pointer identity, so two wrappers around the same closure
/// allocation compare equal while structurally identical closures do not.
#[derive(Clone)]
pub struct Callback(Rc<dyn Fn(&[Value])>);

impl Callback {
    pub fn new(f: impl Fn(&[Value]) + 'static) -> Self {
        Self(Rc::new(f))
    }

    pub fn invoke(&self, args: &[Value]) {
        (self.0)(args)
    }

    pub fn ptr_eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }
}

impl fmt::Debug for Callback {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Callback")
    }
}

/// Raw RGBA pixel buffer. Not representable across the boundary in its
/// native form; the codec converts it before the gateway is reached.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageData {
    pub width: u32,
    pub height: u32,
    pub data: Vec<u8>,
}

impl ImageData {
    pub fn new(width: u32, height: u32, data: Vec<u8>) -> Self {
        Self {
            width,
            height,
            data,
        }
    }
}

/// One positional argument of a fabricated API call.
///
/// The fabricated surface accepts shapes a JSON payload cannot carry
/// (functions, pixel buffers), so the argument list is a tree whose leaves
/// may be non-transferable until the codec and the gateway have processed
/// them.
#[derive(Debug, Clone)]
pub enum Arg {
    /// Already boundary-safe.
    Value(Value),
    /// Raw pixel buffer; a per-method codec turns it into a safe payload.
    Image(ImageData),
    /// A function. Never crosses the boundary.
    Func(Callback),
    /// Mixed object that may nest any of the above.
    Object(BTreeMap<String, Arg>),
}

impl Arg {
    pub fn object<K: Into<String>>(entries: impl IntoIterator<Item = (K, Arg)>) -> Self {
        Arg::Object(entries.into_iter().map(|(k, v)| (k.into(), v)).collect())
    }

    pub fn is_func(&self) -> bool {
        matches!(self, Arg::Func(_))
    }

    /// Collapse into a wire payload. Leaves the codec did not convert are
    /// substituted with null rather than aborting the call.
    pub fn into_wire(self) -> Value {
        match self {
            Arg::Value(value) => value,
            Arg::Image(_) => {
                warn!(
                    target: "gateway",
                    "raw pixel buffer reached the boundary without a codec; substituting null"
                );
                Value::Null
            }
            Arg::Func(_) => {
                warn!(
                    target: "gateway",
                    "function argument is not boundary-transferable; substituting null"
                );
                Value::Null
            }
            Arg::Object(entries) => Value::Object(
                entries
                    .into_iter()
                    .map(|(k, v)| (k, v.into_wire()))
                    .collect(),
            ),
        }
    }
}

impl From<Value> for Arg {
    fn from(value: Value) -> Self {
        Arg::Value(value)
    }
}

pub fn flatten_args(args: Vec<Arg>) -> Vec<Value> {
    args.into_iter().map(Arg::into_wire).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn wire_conversion_preserves_values_and_nulls_the_rest() {
        let arg = Arg::object([
            ("url", Arg::Value(json!("https://example.com"))),
            ("onclick", Arg::Func(Callback::new(|_| {}))),
            ("icon", Arg::Image(ImageData::new(1, 1, vec![0; 4]))),
        ]);
        assert_eq!(
            arg.into_wire(),
            json!({ "url": "https://example.com", "onclick": null, "icon": null })
        );
    }

    #[test]
    fn callback_identity_is_pointer_identity() {
        let a = Callback::new(|_| {});
        let b = a.clone();
        let c = Callback::new(|_| {});
        assert!(a.ptr_eq(&b));
        assert!(!a.ptr_eq(&c));
    }
}
