//! Model catalog configuration from TOML (`[models]` section)

use palaver_application::CatalogParams;
use palaver_domain::{ConfigIssue, ConfigIssueCode, ModelSelectionPolicy};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Raw model catalog configuration from TOML
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileModelsConfig {
    /// How long a fetched model list stays fresh
    pub cache_ttl_secs: u64,
    /// Hide models whose names mark them as too large to run locally
    pub filter_ultra_large: bool,
    pub ultra_large_patterns: Vec<String>,
    /// Name markers of models suited for coding questions
    pub coding_patterns: Vec<String>,
}

impl Default for FileModelsConfig {
    fn default() -> Self {
        let defaults = CatalogParams::default();
        Self {
            cache_ttl_secs: defaults.cache_ttl.as_secs(),
            filter_ultra_large: defaults.policy.filter_ultra_large,
            ultra_large_patterns: defaults.policy.ultra_large_patterns,
            coding_patterns: defaults.policy.coding_patterns,
        }
    }
}

impl FileModelsConfig {
    pub fn to_params(&self) -> CatalogParams {
        CatalogParams::default()
            .with_cache_ttl(Duration::from_secs(self.cache_ttl_secs))
            .with_policy(ModelSelectionPolicy {
                filter_ultra_large: self.filter_ultra_large,
                ultra_large_patterns: non_empty(&self.ultra_large_patterns),
                coding_patterns: non_empty(&self.coding_patterns),
            })
    }

    pub(super) fn validate(&self, issues: &mut Vec<ConfigIssue>) {
        for (field, patterns) in [
            ("ultra_large_patterns", &self.ultra_large_patterns),
            ("coding_patterns", &self.coding_patterns),
        ] {
            if patterns.iter().any(|p| p.trim().is_empty()) {
                issues.push(ConfigIssue::warning(
                    ConfigIssueCode::EmptyPattern,
                    format!("models.{field} contains an empty pattern; it is ignored"),
                ));
            }
        }
    }
}

fn non_empty(patterns: &[String]) -> Vec<String> {
    patterns
        .iter()
        .map(|p| p.trim())
        .filter(|p| !p.is_empty())
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_patterns_are_dropped() {
        let config = FileModelsConfig {
            ultra_large_patterns: vec!["70b".to_string(), " ".to_string()],
            ..Default::default()
        };
        let mut issues = Vec::new();
        config.validate(&mut issues);
        assert_eq!(issues.len(), 1);
        assert!(!issues[0].is_error());
        assert_eq!(config.to_params().policy.ultra_large_patterns, vec!["70b"]);
    }
}
