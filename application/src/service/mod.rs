//! Service facade
//!
//! [`ForumService`] is the single entry point for the presentation layer.
//! It wires the use cases together and keeps per-caller state in a
//! [`SessionStore`].

pub mod forum_service;
pub mod session_store;

pub use forum_service::ForumService;
pub use session_store::{DebateHandle, SessionId, SessionStore};
