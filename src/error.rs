use thiserror::Error;

/// Errors surfaced by the merge engines.
///
/// All of them are contract violations local to the call that raised them.
/// A failed call never leaves the engine in a different state.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum MergeError {
    /// Bad construction input: no sources, or an absent source slot.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// `take_next` was called after every source ran dry.
    #[error("merge is exhausted")]
    Exhausted,

    /// The engines are read-only views over their sources.
    #[error("unsupported operation: {0}")]
    UnsupportedOperation(&'static str),
}

pub type Result<T> = std::result::Result<T, MergeError>;
