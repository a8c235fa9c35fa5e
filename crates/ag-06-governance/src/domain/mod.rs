mod admin;
mod errors;
mod poll;

pub use admin::{FeeAsset, ProtocolCeo, ProtocolRoot};
pub use errors::GovernanceError;
pub use poll::{Poll, PollOption, MAX_POLL_NAME_LEN};
