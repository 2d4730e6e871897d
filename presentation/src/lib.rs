//! Presentation layer for palaver
//!
//! This crate contains CLI definitions, output formatters,
//! progress reporters, and the live stream printer.

pub mod cli;
pub mod output;
pub mod progress;

// Re-export commonly used types
pub use cli::commands::{AskArgs, Cli, Command, DebateArgs, ModelsArgs, OutputFormat, ResourcesArgs};
pub use output::console::ConsoleFormatter;
pub use progress::reporter::{ProgressReporter, SimpleProgress};
pub use progress::stream::StreamPrinter;
