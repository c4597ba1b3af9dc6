use thiserror::Error;

/// Failures this layer is allowed to surface to its callers.
///
/// Transport failures never appear here: the gateway swallows them and
/// degrades the call result instead (see `gateway`).
#[derive(Debug, Error)]
pub enum ShimError {
    /// A declared-but-unsupported capability was invoked. Raised loudly so a
    /// real capability gap is never masked by a silent no-op.
    #[error("{0} is not implemented")]
    NotImplemented(&'static str),

    #[error("unknown method: {0}")]
    UnknownMethod(String),

    #[error("unknown event: {0}")]
    UnknownEvent(String),

    #[error("global binding {0} is not configurable")]
    NonConfigurable(String),

    #[error("global binding {0} is not writable")]
    NonWritable(String),

    /// Construction-time misconfiguration: a gating predicate or a namespace
    /// factory failed. Indicates a programming defect, not a runtime
    /// condition, so it propagates instead of being recovered.
    #[error("bootstrap failed: {0}")]
    Bootstrap(String),
}
