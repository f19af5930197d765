//! Prompt construction.

mod template;

pub use template::{DEFAULT_ANSWER_BUDGET, PromptTemplate};
