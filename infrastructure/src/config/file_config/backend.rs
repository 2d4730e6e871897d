//! Backend configuration from TOML (`[backend]` section)

use crate::ollama::OllamaConfig;
use palaver_domain::{ConfigIssue, ConfigIssueCode};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Raw backend configuration from TOML
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileBackendConfig {
    /// Base URL of the Ollama server
    pub url: String,
    pub connect_timeout_secs: u64,
    /// Idle time allowed between two reads of a response body
    pub read_timeout_secs: u64,
    /// Upper bound for a whole request
    pub request_timeout_secs: u64,
}

impl Default for FileBackendConfig {
    fn default() -> Self {
        let defaults = OllamaConfig::default();
        Self {
            url: defaults.base_url,
            connect_timeout_secs: defaults.connect_timeout.as_secs(),
            read_timeout_secs: defaults.read_timeout.as_secs(),
            request_timeout_secs: defaults.request_timeout.as_secs(),
        }
    }
}

impl FileBackendConfig {
    pub fn to_ollama_config(&self) -> OllamaConfig {
        OllamaConfig {
            base_url: self.url.trim().trim_end_matches('/').to_string(),
            connect_timeout: Duration::from_secs(self.connect_timeout_secs),
            read_timeout: Duration::from_secs(self.read_timeout_secs),
            request_timeout: Duration::from_secs(self.request_timeout_secs),
        }
    }

    pub(super) fn validate(&self, issues: &mut Vec<ConfigIssue>) {
        if self.url.trim().is_empty() {
            issues.push(ConfigIssue::error(
                ConfigIssueCode::EmptyBackendUrl,
                "backend.url cannot be empty",
            ));
        }
        for (field, value) in [
            ("connect_timeout_secs", self.connect_timeout_secs),
            ("read_timeout_secs", self.read_timeout_secs),
            ("request_timeout_secs", self.request_timeout_secs),
        ] {
            if value == 0 {
                issues.push(ConfigIssue::error(
                    ConfigIssueCode::ZeroTimeout,
                    format!("backend.{field} cannot be 0"),
                ));
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_trailing_slash_is_dropped() {
        let config = FileBackendConfig {
            url: "http://gpu-box:11434/".to_string(),
            ..Default::default()
        };
        assert_eq!(config.to_ollama_config().base_url, "http://gpu-box:11434");
    }

    #[test]
    fn test_zero_timeout_is_an_error() {
        let config = FileBackendConfig {
            read_timeout_secs: 0,
            ..Default::default()
        };
        let mut issues = Vec::new();
        config.validate(&mut issues);
        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].code, ConfigIssueCode::ZeroTimeout);
        assert!(issues[0].message.contains("read_timeout_secs"));
    }
}
