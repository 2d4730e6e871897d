//! Model footprint estimation from the model name.
//!
//! The parameter count is read from the name (`7b`, `1.5b`, `335m`). Sizes
//! assume roughly 2 GB per billion parameters; minimum RAM is 1.5x the size
//! and recommended RAM 2.5x.

use crate::core::model::ModelId;
use crate::core::string::round1;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::LazyLock;

const GB_PER_BILLION: f64 = 2.0;
const MIN_RAM_FACTOR: f64 = 1.5;
const RECOMMENDED_RAM_FACTOR: f64 = 2.5;
const VISION_RAM_FACTOR: f64 = 1.3;
const EMBEDDING_SIZE_FACTOR: f64 = 0.5;

const DEFAULT_SIZE_GB: f64 = 2.0;
const DEFAULT_MIN_RAM_GB: f64 = 4.0;
const DEFAULT_RECOMMENDED_RAM_GB: f64 = 8.0;

const VISION_MARKERS: &[&str] = &["vision", "llava", "clip"];
const CODE_MARKERS: &[&str] = &["code", "coder", "coding"];
const EMBEDDING_MARKERS: &[&str] = &["embed", "embedding"];

/// Tried in order; the first that matches wins.
static PARAM_PATTERNS: LazyLock<[(Regex, f64); 2]> = LazyLock::new(|| {
    [
        (Regex::new(r"(\d+\.?\d*)b").expect("valid regex"), 1.0),
        (Regex::new(r"(\d+\.?\d*)m").expect("valid regex"), 0.001),
    ]
});

/// Coarse model category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ModelCategory {
    #[default]
    Text,
    Code,
    Vision,
    Embedding,
}

impl fmt::Display for ModelCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ModelCategory::Text => write!(f, "text"),
            ModelCategory::Code => write!(f, "code"),
            ModelCategory::Vision => write!(f, "vision"),
            ModelCategory::Embedding => write!(f, "embedding"),
        }
    }
}

/// Estimated footprint of one model. Figures are rounded to one decimal.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelResourceEstimate {
    pub model: ModelId,
    /// Display form of the parameter count ("7B", "1.5B", "335M" or "unknown")
    pub parameters: String,
    pub size_gb: f64,
    pub min_ram_gb: f64,
    pub recommended_ram_gb: f64,
    pub category: ModelCategory,
    pub supports_gpu: bool,
}

/// Estimate resource requirements from the model's name.
///
/// # Example
///
/// ```
/// use palaver_domain::{ModelId, resources::estimate};
///
/// let est = estimate(&ModelId::new("mystery-model-7b"));
/// assert_eq!(est.parameters, "7B");
/// assert_eq!(est.size_gb, 14.0);
/// assert_eq!(est.min_ram_gb, 21.0);
/// assert_eq!(est.recommended_ram_gb, 35.0);
/// ```
pub fn estimate(model: &ModelId) -> ModelResourceEstimate {
    let name = model.normalized();

    let (mut size_gb, min_ram_gb, mut recommended_ram_gb, parameters) =
        match parse_parameter_count(&name) {
            Some(billions) if billions > 0.0 => {
                let size = (billions * GB_PER_BILLION).max(0.5);
                (
                    size,
                    (size * MIN_RAM_FACTOR).max(2.0),
                    (size * RECOMMENDED_RAM_FACTOR).max(4.0),
                    format_parameters(billions),
                )
            }
            _ => (
                DEFAULT_SIZE_GB,
                DEFAULT_MIN_RAM_GB,
                DEFAULT_RECOMMENDED_RAM_GB,
                "unknown".to_string(),
            ),
        };

    let mut category = ModelCategory::Text;
    let mut supports_gpu = true;
    if contains_any(&name, VISION_MARKERS) {
        category = ModelCategory::Vision;
        recommended_ram_gb *= VISION_RAM_FACTOR;
    } else if contains_any(&name, CODE_MARKERS) {
        category = ModelCategory::Code;
    } else if contains_any(&name, EMBEDDING_MARKERS) {
        category = ModelCategory::Embedding;
        size_gb *= EMBEDDING_SIZE_FACTOR;
        supports_gpu = false;
    }

    ModelResourceEstimate {
        model: model.clone(),
        parameters,
        size_gb: round1(size_gb),
        min_ram_gb: round1(min_ram_gb),
        recommended_ram_gb: round1(recommended_ram_gb),
        category,
        supports_gpu,
    }
}

/// Parameter count in billions, if the lowercased name carries one.
fn parse_parameter_count(name: &str) -> Option<f64> {
    PARAM_PATTERNS.iter().find_map(|(re, scale)| {
        re.captures(name)
            .and_then(|caps| caps.get(1))
            .and_then(|m| m.as_str().parse::<f64>().ok())
            .map(|v| v * scale)
    })
}

fn format_parameters(billions: f64) -> String {
    if billions >= 1.0 {
        if billions.fract() == 0.0 {
            format!("{billions:.0}B")
        } else {
            format!("{billions}B")
        }
    } else {
        format!("{:.0}M", billions * 1000.0)
    }
}

fn contains_any(name: &str, markers: &[&str]) -> bool {
    markers.iter().any(|m| name.contains(m))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn est(name: &str) -> ModelResourceEstimate {
        estimate(&ModelId::new(name))
    }

    #[test]
    fn test_seven_billion() {
        let e = est("mystery-model-7b");
        assert_eq!(e.parameters, "7B");
        assert_eq!(e.size_gb, 14.0);
        assert_eq!(e.min_ram_gb, 21.0);
        assert_eq!(e.recommended_ram_gb, 35.0);
        assert_eq!(e.category, ModelCategory::Text);
        assert!(e.supports_gpu);
    }

    #[test]
    fn test_tag_suffix_and_case() {
        let e = est("Llama3.1:8B");
        assert_eq!(e.parameters, "8B");
        assert_eq!(e.size_gb, 16.0);
    }

    #[test]
    fn test_fractional_billions() {
        let e = est("qwen2.5:1.5b");
        assert_eq!(e.parameters, "1.5B");
        assert_eq!(e.size_gb, 3.0);
        assert_eq!(e.min_ram_gb, 4.5);
        assert_eq!(e.recommended_ram_gb, 7.5);
    }

    #[test]
    fn test_sub_billion_uses_floors() {
        let e = est("qwen2.5:0.5b");
        assert_eq!(e.parameters, "500M");
        assert_eq!(e.size_gb, 1.0);
        assert_eq!(e.min_ram_gb, 2.0);
        assert_eq!(e.recommended_ram_gb, 4.0);
    }

    #[test]
    fn test_millions_suffix() {
        let e = est("mxbai-embed-large:335m");
        assert_eq!(e.parameters, "335M");
        assert_eq!(e.category, ModelCategory::Embedding);
        assert!(!e.supports_gpu);
        // 0.67 GB halved for embeddings
        assert_eq!(e.size_gb, 0.3);
    }

    #[test]
    fn test_unknown_falls_back_to_defaults() {
        let e = est("mistral");
        assert_eq!(e.parameters, "unknown");
        assert_eq!(e.size_gb, 2.0);
        assert_eq!(e.min_ram_gb, 4.0);
        assert_eq!(e.recommended_ram_gb, 8.0);
    }

    #[test]
    fn test_vision_boosts_recommended_ram() {
        let e = est("llava:7b");
        assert_eq!(e.category, ModelCategory::Vision);
        assert_eq!(e.recommended_ram_gb, 45.5);
        assert_eq!(e.min_ram_gb, 21.0);
    }

    #[test]
    fn test_code_category_keeps_figures() {
        let e = est("deepseek-coder:6.7b");
        assert_eq!(e.category, ModelCategory::Code);
        assert_eq!(e.parameters, "6.7B");
        assert_eq!(e.size_gb, 13.4);
    }

    #[test]
    fn test_unknown_embedding_halves_default_size() {
        let e = est("nomic-embed-text");
        assert_eq!(e.category, ModelCategory::Embedding);
        assert_eq!(e.size_gb, 1.0);
        assert_eq!(e.recommended_ram_gb, 8.0);
    }
}
