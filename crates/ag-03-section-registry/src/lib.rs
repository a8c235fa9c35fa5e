//! # ag-03-section-registry
//!
//! Section Registry subsystem: one record per (area, section name) pair.
//!
//! ## Role in System
//!
//! - **Post Gate**: a disabled section rejects new posts; existing posts
//!   remain readable, votable, and repliable
//! - **Subject Tallies**: each section carries aggregate votes cast on the
//!   section's subject itself (the video or page), separate from any
//!   individual post's tally
//! - Sections are created explicitly before any posts target them and are
//!   never destroyed

pub mod domain;

pub use domain::*;
