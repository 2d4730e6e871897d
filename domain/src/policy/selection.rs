//! Ultra-large filtering and coding-model selection.

use crate::core::model::ModelId;
use crate::inference::QuestionKind;
use serde::{Deserialize, Serialize};

/// Name markers of models too large to share a host with others.
pub const DEFAULT_ULTRA_LARGE_PATTERNS: &[&str] = &[
    "70b",
    "72b",
    "405b",
    "llama3.1:70b",
    "llama3.2:70b",
    "qwen2.5:72b",
    "codellama:70b",
];

/// Name markers of models known to handle programming questions well.
pub const DEFAULT_CODING_PATTERNS: &[&str] = &[
    "codellama",
    "deepseek-coder",
    "codegemma",
    "starcoder",
    "magicoder",
    "phind-codellama",
    "wizardcoder",
    "llama3",
    "llama3.1",
    "qwen2.5-coder",
    "granite-code",
];

/// Models used for a coding question when none match the coding patterns.
const CODING_FALLBACK_COUNT: usize = 3;

/// Which backend models are offered to callers.
///
/// # Example
///
/// ```
/// use palaver_domain::{ModelId, ModelSelectionPolicy};
///
/// let policy = ModelSelectionPolicy::default();
/// let models = vec![ModelId::new("llama3.1:70b"), ModelId::new("phi3:mini")];
/// assert_eq!(policy.admit(models), vec![ModelId::new("phi3:mini")]);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModelSelectionPolicy {
    /// Drop models matching `ultra_large_patterns`
    pub filter_ultra_large: bool,
    pub ultra_large_patterns: Vec<String>,
    pub coding_patterns: Vec<String>,
}

impl Default for ModelSelectionPolicy {
    fn default() -> Self {
        Self {
            filter_ultra_large: true,
            ultra_large_patterns: to_owned(DEFAULT_ULTRA_LARGE_PATTERNS),
            coding_patterns: to_owned(DEFAULT_CODING_PATTERNS),
        }
    }
}

impl ModelSelectionPolicy {
    pub fn is_ultra_large(&self, model: &ModelId) -> bool {
        model.matches_any(&self.ultra_large_patterns)
    }

    pub fn is_coding_capable(&self, model: &ModelId) -> bool {
        model.matches_any(&self.coding_patterns)
    }

    /// Apply the ultra-large filter (if enabled), preserving order.
    pub fn admit(&self, models: Vec<ModelId>) -> Vec<ModelId> {
        if !self.filter_ultra_large {
            return models;
        }
        models
            .into_iter()
            .filter(|m| !self.is_ultra_large(m))
            .collect()
    }

    /// Models suited to `kind` among `available`.
    ///
    /// Coding questions prefer coding-capable models and fall back to the
    /// first three available when none match.
    pub fn select_for(&self, kind: QuestionKind, available: &[ModelId]) -> Vec<ModelId> {
        match kind {
            QuestionKind::General => available.to_vec(),
            QuestionKind::Coding => {
                let coding: Vec<ModelId> = available
                    .iter()
                    .filter(|m| self.is_coding_capable(m))
                    .cloned()
                    .collect();
                if coding.is_empty() {
                    available.iter().take(CODING_FALLBACK_COUNT).cloned().collect()
                } else {
                    coding
                }
            }
        }
    }

    pub fn with_filter_ultra_large(mut self, enabled: bool) -> Self {
        self.filter_ultra_large = enabled;
        self
    }
}

fn to_owned(patterns: &[&str]) -> Vec<String> {
    patterns.iter().map(|p| p.to_string()).collect()
}
