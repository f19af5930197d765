//! Application-level configuration.
//!
//! - [`OrchestrationParams`]: timeouts, token requests and retry policy for
//!   each call site (fan-out, single model, consensus)

pub mod orchestration_params;

pub use orchestration_params::OrchestrationParams;
