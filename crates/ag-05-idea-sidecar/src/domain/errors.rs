use thiserror::Error;

/// Idea Sidecar failures.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum IdeaError {
    /// Idea text exceeds the stored field size.
    #[error("idea text too long: {len} bytes, max {max}")]
    TextTooLong { len: usize, max: usize },
}
