//! Prompt domain
//!
//! Templates for question answering, debate rounds and debate summaries.

mod template;

pub use template::{PromptTemplate, HISTORY_EXCERPT_CHARS, SUMMARY_ARGUMENT_COUNT, SUMMARY_EXCERPT_CHARS};
