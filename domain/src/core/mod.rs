//! Core domain concepts shared across all subdomains.
//!
//! - [`model::ModelId`]: the name of a model served by the inference backend
//! - [`error::DomainError`]: caller input and state-machine errors
//! - [`string`]: UTF-8 safe truncation helpers

pub mod error;
pub mod model;
pub mod string;
