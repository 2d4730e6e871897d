//! Application-level configuration.
//!
//! This module provides configuration types that control how use cases behave:
//!
//! - [`DispatchParams`]: concurrency ceiling and default fan-out width
//! - [`CatalogParams`]: model list caching and admission policy
//! - [`DebateParams`]: debate limits, pacing and summary behaviour
//! - [`ForumConfig`]: container handed to [`ForumService`](crate::ForumService)

pub mod forum_config;
pub mod params;

pub use forum_config::ForumConfig;
pub use params::{CatalogParams, DebateParams, DispatchParams};
