use shared_types::VoteError;
use thiserror::Error;

/// Section Registry failures.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum SectionError {
    /// New posts are rejected while the section is disabled.
    #[error("comment section {area}/{name} is disabled")]
    Disabled { area: String, name: String },

    /// Subject vote arithmetic failed.
    #[error(transparent)]
    Vote(#[from] VoteError),
}
