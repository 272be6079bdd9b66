use thiserror::Error;

/// Configuration errors raised while computing a layout.
///
/// These are programming/config errors, not runtime conditions: the host
/// propagates them out of its loop and exits.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LayoutError {
    #[error("unknown logo location: {0}")]
    UnknownLocation(String),
}
