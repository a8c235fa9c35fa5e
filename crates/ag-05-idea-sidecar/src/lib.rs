//! # ag-05-idea-sidecar
//!
//! Idea Sidecar subsystem: an optional, independently-lifecycled
//! annotation attached to a post by composite key.
//!
//! ## Role in System
//!
//! - Created lazily by the first annotation call targeting a post
//! - Zero-or-one per post; never destroyed
//! - Survives the annotated post's deletion untouched

pub mod domain;

pub use domain::*;
