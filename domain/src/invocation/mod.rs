//! Model invocation: call policy and result types.

pub mod policy;
pub mod value_objects;

pub use policy::InvocationPolicy;
pub use value_objects::{
    CONSENSUS_FALLBACK_TEXT, CONSENSUS_MODEL_ID, ConsensusResult, FanOutResult, InvocationResult,
    InvocationStatus, UNAVAILABLE_ANSWER_TEXT,
};
