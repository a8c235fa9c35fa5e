mod board;
mod config;
mod entities;
mod errors;
mod level;

pub use board::{AreaBoard, SequenceClaim};
pub use config::PostConfig;
pub use entities::{ParentRef, Post, PostDraft};
pub use errors::PostError;
pub use level::NestingLevel;
