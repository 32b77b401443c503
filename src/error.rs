use thiserror::Error;

/// Errors produced by the configuration store.
///
/// Read-only violations are precondition errors: they indicate the caller
/// wrote to a target that can never accept the write, not a transient
/// condition worth retrying.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ConfigError {
    #[error("layer '{0}' is read-only")]
    ReadOnlyLayer(String),

    #[error("view is read-only")]
    ReadOnlyView,

    #[error("no writable layer in the stack")]
    NoWritableLayer,

    #[error("target is not writable")]
    ReadOnlyTarget,

    #[error("stream error: {0}")]
    Io(#[from] std::io::Error),
}
