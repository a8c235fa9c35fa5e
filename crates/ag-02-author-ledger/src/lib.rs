//! # ag-02-author-ledger
//!
//! Author Ledger subsystem: one record per author public identity,
//! carrying the monotonic post-position counter and profile display
//! controls.
//!
//! ## Role in System
//!
//! - **Arena Allocator**: the ledger is the arena, `post_and_reply_count`
//!   is the next-free index, and every post identity is (author, index)
//! - **Exactly-once Claims**: a position is claimed atomically with the
//!   creation of the post that uses it; the protocol service commits the
//!   incremented ledger and the new post in one transition
//! - **Monotonic Forever**: the counter never decreases, even after post
//!   deletion

pub mod domain;

pub use domain::*;
