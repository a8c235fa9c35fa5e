//! # ag-07-protocol
//!
//! The operation surface of Agora-Chain: one named operation per protocol
//! action, each applied as an atomic, all-or-nothing unit of work against
//! the versioned record store.
//!
//! ## Role in System
//!
//! - **Inbound Port**: [`AgoraApi`], the full operation set consumed by
//!   clients (RPC, HTTP, or embedded)
//! - **Outbound Port**: [`RecordStore`], durable keyed storage with
//!   optimistic concurrency; any engine qualifies as long as key
//!   derivation and commit atomicity hold
//! - **Service**: [`AgoraService`] reads the records an operation touches,
//!   runs the pure domain transitions, and commits one state transition;
//!   the loser of a concurrent race on any touched record is rejected
//!   with no partial effect and is never retried internally

pub mod adapters;
pub mod ports;
pub mod requests;
pub mod service;

pub use adapters::*;
pub use ports::*;
pub use requests::*;
pub use service::*;
