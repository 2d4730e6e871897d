//! Use case parameters.
//!
//! Static values set at startup from the configuration file. None of them
//! change while the service runs.

use palaver_domain::debate::DebateRules;
use palaver_domain::policy::ModelSelectionPolicy;
use palaver_domain::synthesis::DEFAULT_SUMMARY_PREFERENCES;
use std::time::Duration;

/// Fan-out limits for [`DispatchQueryUseCase`](crate::DispatchQueryUseCase).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DispatchParams {
    /// Global ceiling; no request runs more models at once.
    pub max_concurrent_requests: usize,
    /// Concurrency used when the caller does not ask for one.
    pub default_concurrency: usize,
}

impl Default for DispatchParams {
    fn default() -> Self {
        Self {
            max_concurrent_requests: 5,
            default_concurrency: 3,
        }
    }
}

impl DispatchParams {
    pub fn with_max_concurrent_requests(mut self, max: usize) -> Self {
        self.max_concurrent_requests = max;
        self
    }

    pub fn with_default_concurrency(mut self, concurrency: usize) -> Self {
        self.default_concurrency = concurrency;
        self
    }
}

/// Model list caching for [`ModelCatalog`](crate::ModelCatalog).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatalogParams {
    pub cache_ttl: Duration,
    pub policy: ModelSelectionPolicy,
}

impl Default for CatalogParams {
    fn default() -> Self {
        Self {
            cache_ttl: Duration::from_secs(30),
            policy: ModelSelectionPolicy::default(),
        }
    }
}

impl CatalogParams {
    pub fn with_cache_ttl(mut self, ttl: Duration) -> Self {
        self.cache_ttl = ttl;
        self
    }

    pub fn with_policy(mut self, policy: ModelSelectionPolicy) -> Self {
        self.policy = policy;
        self
    }
}

/// Debate limits and pacing for [`DebateOrchestrator`](crate::DebateOrchestrator).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DebateParams {
    pub rules: DebateRules,
    pub default_rounds: u32,
    /// Pause between two models of the same round
    pub model_pause: Duration,
    /// Pause between two rounds
    pub round_pause: Duration,
    /// Upper bound for the summary model call
    pub summary_timeout: Duration,
    /// Summary models tried when no participant argued
    pub summary_preferences: Vec<String>,
}

impl Default for DebateParams {
    fn default() -> Self {
        Self {
            rules: DebateRules::default(),
            default_rounds: 3,
            model_pause: Duration::from_secs(1),
            round_pause: Duration::from_secs(3),
            summary_timeout: Duration::from_secs(10),
            summary_preferences: DEFAULT_SUMMARY_PREFERENCES
                .iter()
                .map(|s| s.to_string())
                .collect(),
        }
    }
}

impl DebateParams {
    pub fn with_max_participants(mut self, max: usize) -> Self {
        self.rules = DebateRules::new(max);
        self
    }

    /// Set both pauses at once. Tests use `Duration::ZERO`.
    pub fn with_pacing(mut self, model_pause: Duration, round_pause: Duration) -> Self {
        self.model_pause = model_pause;
        self.round_pause = round_pause;
        self
    }

    pub fn with_summary_timeout(mut self, timeout: Duration) -> Self {
        self.summary_timeout = timeout;
        self
    }

    pub fn with_summary_preferences(mut self, preferences: Vec<String>) -> Self {
        self.summary_preferences = preferences;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let dispatch = DispatchParams::default();
        assert_eq!(dispatch.max_concurrent_requests, 5);
        assert_eq!(dispatch.default_concurrency, 3);

        let catalog = CatalogParams::default();
        assert_eq!(catalog.cache_ttl, Duration::from_secs(30));
        assert!(catalog.policy.filter_ultra_large);

        let debate = DebateParams::default();
        assert_eq!(debate.rules.max_participants, 4);
        assert_eq!(debate.default_rounds, 3);
        assert_eq!(debate.summary_timeout, Duration::from_secs(10));
        assert_eq!(debate.summary_preferences[0], "gpt-4");
    }

    #[test]
    fn test_builders() {
        let debate = DebateParams::default()
            .with_max_participants(6)
            .with_pacing(Duration::ZERO, Duration::ZERO);
        assert_eq!(debate.rules.max_participants, 6);
        assert_eq!(debate.model_pause, Duration::ZERO);

        let dispatch = DispatchParams::default().with_max_concurrent_requests(2);
        assert_eq!(dispatch.max_concurrent_requests, 2);
    }
}
