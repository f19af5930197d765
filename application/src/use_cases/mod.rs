//! Use cases
//!
//! Application-level operations that orchestrate domain logic.

pub mod ask_model;
pub mod chat_service;
pub mod consensus;
pub mod fan_out;
pub mod invoke_model;
