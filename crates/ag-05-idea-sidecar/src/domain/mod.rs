mod entities;
mod errors;

pub use entities::{Idea, MAX_IDEA_LEN};
pub use errors::IdeaError;
