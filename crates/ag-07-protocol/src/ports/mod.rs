pub mod inbound;
pub mod outbound;

pub use inbound::AgoraApi;
pub use outbound::{
    CommitError, Expectation, IndexKey, RecordStore, RecordWrite, StateTransition, StoreError,
    Versioned, WriteOp,
};
