//! Logging configuration from TOML (`[logging]` section)

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Raw logging configuration from TOML
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileLoggingConfig {
    /// Write tracing output to this file in addition to stderr
    pub file: Option<PathBuf>,
    /// Append every orchestration event as one JSON line to this file
    pub event_log: Option<PathBuf>,
}

impl FileLoggingConfig {
    /// `file` with a leading `~` expanded to the home directory
    pub fn file_path(&self) -> Option<PathBuf> {
        self.file.as_deref().map(expand_home)
    }

    /// `event_log` with a leading `~` expanded to the home directory
    pub fn event_log_path(&self) -> Option<PathBuf> {
        self.event_log.as_deref().map(expand_home)
    }
}

fn expand_home(path: &std::path::Path) -> PathBuf {
    match (path.strip_prefix("~"), dirs::home_dir()) {
        (Ok(rest), Some(home)) => home.join(rest),
        _ => path.to_path_buf(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_relative_path_is_kept() {
        let config = FileLoggingConfig {
            event_log: Some(PathBuf::from("events.jsonl")),
            ..Default::default()
        };
        assert_eq!(config.event_log_path(), Some(PathBuf::from("events.jsonl")));
        assert_eq!(config.file_path(), None);
    }
}
