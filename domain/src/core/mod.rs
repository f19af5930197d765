//! Core domain concepts shared across all subdomains.
//!
//! - [`model::Model`]: model identifiers served by the providers
//! - [`question::Question`]: a validated, non-blank question
//! - [`caller::CallerId`]: opaque identity of the asking user
//! - [`error::DomainError`]: domain-level errors

pub mod caller;
pub mod error;
pub mod model;
pub mod question;
pub mod string;
