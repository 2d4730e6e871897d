//! Model identity value object

use serde::{Deserialize, Serialize};
use std::fmt;

/// Name of a model as reported by the inference backend (Value Object)
///
/// The string is opaque: the backend decides what is unique. Classification
/// ("coding-capable", "ultra-large", parameter count) works on the lowercased
/// name through substring matching.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ModelId(String);

impl ModelId {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Lowercased name used by every pattern-based classifier.
    pub fn normalized(&self) -> String {
        self.0.to_lowercase()
    }

    /// Case-insensitive substring match against any of `patterns`.
    ///
    /// # Example
    ///
    /// ```
    /// use palaver_domain::ModelId;
    ///
    /// let model = ModelId::new("DeepSeek-Coder:6.7B");
    /// assert!(model.matches_any(&["deepseek-coder"]));
    /// assert!(!model.matches_any(&["llava"]));
    /// ```
    pub fn matches_any<S: AsRef<str>>(&self, patterns: &[S]) -> bool {
        let name = self.normalized();
        patterns
            .iter()
            .map(|p| p.as_ref().to_lowercase())
            .any(|p| !p.is_empty() && name.contains(&p))
    }
}

impl fmt::Display for ModelId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ModelId {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl From<String> for ModelId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl AsRef<str> for ModelId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl std::str::FromStr for ModelId {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self::new(s))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_keeps_original_case() {
        let model = ModelId::new("Llama3.1:8B");
        assert_eq!(model.to_string(), "Llama3.1:8B");
        assert_eq!(model.normalized(), "llama3.1:8b");
    }

    #[test]
    fn test_matches_any_is_case_insensitive() {
        let model = ModelId::new("qwen2.5:72b");
        assert!(model.matches_any(&["72B"]));
        assert!(model.matches_any(&["nothing", "QWEN"]));
        assert!(!model.matches_any(&["70b"]));
    }

    #[test]
    fn test_empty_pattern_never_matches() {
        let model = ModelId::new("phi3");
        assert!(!model.matches_any(&[""]));
        let none: [&str; 0] = [];
        assert!(!model.matches_any(&none));
    }

    #[test]
    fn test_serializes_as_bare_string() {
        let json = serde_json::to_string(&ModelId::new("mistral:7b")).unwrap();
        assert_eq!(json, "\"mistral:7b\"");
        let back: ModelId = serde_json::from_str(&json).unwrap();
        assert_eq!(back.as_str(), "mistral:7b");
    }
}
