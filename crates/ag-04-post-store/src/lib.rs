//! # ag-04-post-store
//!
//! Post Store subsystem: the thread data itself and its lifecycle state
//! machine.
//!
//! ## Role in System
//!
//! - **One Generic Post Type**: comments and replies at every depth are
//!   one `Post` record parameterized by `NestingLevel`; the four families
//!   per area differ only in that tag, and the depth cap is configuration
//! - **Soft Delete**: deletion is a status flag, never removal, so replies
//!   that address their parent by (author, position) always resolve
//! - **Family Sequences**: each (area, level) family hands out a
//!   family-local `sequence_id` for chronological enumeration, distinct
//!   from the author-scoped position used for addressing

pub mod domain;

pub use domain::*;
