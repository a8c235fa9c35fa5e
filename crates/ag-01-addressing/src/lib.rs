//! # ag-01-addressing
//!
//! Identity & Address Deriver for Agora-Chain.
//!
//! ## Role in System
//!
//! - **Pure Function**: maps (entity kind, scoping seeds) to a unique
//!   32-byte storage key; holds no state of its own
//! - **Re-derivable**: any client can recompute a post's key from the
//!   author identity and the position recorded on the parent post
//! - **Collision-free**: the author identity is part of every post seed,
//!   and positions are strictly unique per author
//!
//! ## Architecture Compliance
//!
//! - NO I/O operations
//! - NO async code
//! - Deterministic output for identical input, always

pub mod domain;

pub use domain::*;
