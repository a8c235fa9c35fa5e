//! # ag-06-governance
//!
//! Administrative and peripheral records consumed by the protocol as
//! external collaborators:
//!
//! - **Owner Succession**: a single privileged CEO capability,
//!   transferable only by its current holder
//! - **Fee-Asset Registry**: the accepted weighting assets and their
//!   decimal precision; vote operations are gated on membership here
//! - **Polls**: a simple poll / poll-option CRUD + vote feature reusing
//!   the shared vote aggregator

pub mod domain;

pub use domain::*;
