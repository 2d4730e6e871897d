//! Model admission policies applied before models reach the dispatcher.

mod selection;

pub use selection::{
    DEFAULT_CODING_PATTERNS, DEFAULT_ULTRA_LARGE_PATTERNS, ModelSelectionPolicy,
};
