use shared_types::VoteError;
use thiserror::Error;

/// Governance failures.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum GovernanceError {
    /// Only the current CEO may perform this operation.
    #[error("caller {caller} is not the protocol CEO")]
    NotCeo { caller: String },

    /// Poll or option names share the display-name size cap.
    #[error("poll name too long: {len} bytes, max {max}")]
    NameTooLong { len: usize, max: usize },

    /// Votes target active polls and options only.
    #[error("poll {poll_index} option {option_index:?} is not active")]
    PollInactive {
        poll_index: u128,
        option_index: Option<u8>,
    },

    /// A poll cannot carry more than 256 options (u8 index space).
    #[error("poll {poll_index} has no free option index")]
    OptionIndexExhausted { poll_index: u128 },

    /// The poll counter is exhausted.
    #[error("poll counter overflow")]
    PollCounterOverflow,

    /// Vote arithmetic failed.
    #[error(transparent)]
    Vote(#[from] VoteError),
}
