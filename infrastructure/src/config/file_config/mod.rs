//! Raw TOML configuration data types
//!
//! These structs represent the exact structure of the TOML config file.
//! They are deserialized directly and use domain types where appropriate.

mod backend;
mod debate;
mod dispatch;
mod logging;
mod models;
mod output;

pub use backend::FileBackendConfig;
pub use debate::FileDebateConfig;
pub use dispatch::FileDispatchConfig;
pub use logging::FileLoggingConfig;
pub use models::FileModelsConfig;
pub use output::{FileOutputConfig, FileOutputFormat};

use palaver_application::ForumConfig;
use palaver_domain::ConfigIssue;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Raised when the configuration has at least one error-severity issue
#[derive(Debug, Error)]
#[error("invalid configuration: {}", .issues.iter().map(|i| i.message.as_str()).collect::<Vec<_>>().join("; "))]
pub struct ConfigValidationError {
    pub issues: Vec<ConfigIssue>,
}

/// Complete file configuration (raw TOML structure)
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileConfig {
    /// Ollama server location and timeouts
    pub backend: FileBackendConfig,
    /// Fan-out limits
    pub dispatch: FileDispatchConfig,
    /// Model list caching and filtering
    pub models: FileModelsConfig,
    /// Debate limits and pacing
    pub debate: FileDebateConfig,
    /// Output settings
    pub output: FileOutputConfig,
    /// Log destinations
    pub logging: FileLoggingConfig,
}

impl FileConfig {
    /// Validate the entire configuration, returning all detected issues.
    pub fn validate(&self) -> Vec<ConfigIssue> {
        let mut issues = Vec::new();
        self.backend.validate(&mut issues);
        self.dispatch.validate(&mut issues);
        self.models.validate(&mut issues);
        self.debate.validate(&mut issues);
        issues
    }

    /// Validate and split the issues: errors fail, warnings are returned.
    pub fn check(&self) -> Result<Vec<ConfigIssue>, ConfigValidationError> {
        let (errors, warnings): (Vec<_>, Vec<_>) =
            self.validate().into_iter().partition(ConfigIssue::is_error);
        if errors.is_empty() {
            Ok(warnings)
        } else {
            Err(ConfigValidationError { issues: errors })
        }
    }

    pub fn to_forum_config(&self) -> ForumConfig {
        ForumConfig::new(
            self.dispatch.to_params(),
            self.models.to_params(),
            self.debate.to_params(),
        )
    }
}
