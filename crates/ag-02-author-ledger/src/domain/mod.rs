mod entities;
mod errors;

pub use entities::{AuthorLedger, PositionClaim, MAX_DISPLAY_NAME_LEN};
pub use errors::LedgerError;
