//! # Shared Types Crate
//!
//! This crate contains the domain entities shared by every protocol
//! subsystem: identities, bounded names, derived record keys, the vote
//! aggregator, and the protocol-wide error taxonomy.
//!
//! ## Design Principles
//!
//! - **Single Source of Truth**: All cross-subsystem types are defined here.
//! - **Opaque Identities**: Authors and weighting assets are 32-byte ids;
//!   no signature or key material is interpreted by this workspace.
//! - **Shared Arithmetic**: There is exactly one vote aggregator. Posts,
//!   section subjects, and poll options all tally through it.

pub mod entities;
pub mod errors;
pub mod voting;

pub use entities::*;
pub use errors::*;
pub use voting::*;
