//! Infrastructure layer for palaver
//!
//! This crate contains adapters that implement the ports defined
//! in the application layer, including configuration file loading.

pub mod config;
pub mod logging;
pub mod ollama;
pub mod system;

// Re-export commonly used types
pub use config::{
    ConfigLoader, ConfigValidationError, FileBackendConfig, FileConfig, FileDebateConfig,
    FileDispatchConfig, FileLoggingConfig, FileModelsConfig, FileOutputConfig, FileOutputFormat,
};
pub use logging::JsonlEventLogger;
pub use ollama::{OllamaBackend, OllamaConfig, OllamaError};
pub use system::HostProbe;
