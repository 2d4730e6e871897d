//! Dispatch configuration from TOML (`[dispatch]` section)

use palaver_application::DispatchParams;
use palaver_domain::{ConfigIssue, ConfigIssueCode};
use serde::{Deserialize, Serialize};

/// Raw dispatch configuration from TOML
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileDispatchConfig {
    /// Global ceiling on concurrently running models
    pub max_concurrent_requests: usize,
    pub default_concurrency: usize,
}

impl Default for FileDispatchConfig {
    fn default() -> Self {
        let defaults = DispatchParams::default();
        Self {
            max_concurrent_requests: defaults.max_concurrent_requests,
            default_concurrency: defaults.default_concurrency,
        }
    }
}

impl FileDispatchConfig {
    pub fn to_params(&self) -> DispatchParams {
        DispatchParams::default()
            .with_max_concurrent_requests(self.max_concurrent_requests.max(1))
            .with_default_concurrency(self.default_concurrency.max(1))
    }

    pub(super) fn validate(&self, issues: &mut Vec<ConfigIssue>) {
        if self.max_concurrent_requests == 0 {
            issues.push(ConfigIssue::error(
                ConfigIssueCode::ZeroConcurrencyCeiling,
                "dispatch.max_concurrent_requests cannot be 0",
            ));
        } else if self.default_concurrency > self.max_concurrent_requests {
            issues.push(ConfigIssue::warning(
                ConfigIssueCode::DefaultConcurrencyAboveCeiling,
                format!(
                    "dispatch.default_concurrency ({}) exceeds max_concurrent_requests ({}); the ceiling applies",
                    self.default_concurrency, self.max_concurrent_requests
                ),
            ));
        }
    }
}
