//! Rule tables for hospital statements: money codec, label normalization
//! and non-drug classification.

pub mod keywords;
pub mod money;
pub mod normalize;
pub mod patterns;

pub use keywords::{NonDrugKeywords, NON_DRUG_KEYWORDS};
pub use money::{format_money, format_money_text, parse_money, round_half_up};
pub use normalize::ItemNormalizer;

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use patterns::{BILLING_CODE, BILLING_CODE_DASHED, CONSULTATION_FEE, EMERGENT_CONSULTATION};

/// Current version of the rule file format.
pub const RULES_VERSION: u32 = 1;

/// An ordered (pattern, replacement) pair.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NormalizationRule {
    /// Regex searched case-insensitively in the raw label.
    pub pattern: String,
    /// Standardized label returned on match.
    pub replacement: String,
}

impl NormalizationRule {
    pub fn new(pattern: impl Into<String>, replacement: impl Into<String>) -> Self {
        Self {
            pattern: pattern.into(),
            replacement: replacement.into(),
        }
    }

    /// Built-in rule table. Billing codes take priority over the plain
    /// consultation fee match.
    pub fn builtin() -> Vec<Self> {
        vec![
            Self::new(BILLING_CODE_DASHED, EMERGENT_CONSULTATION),
            Self::new(BILLING_CODE, EMERGENT_CONSULTATION),
            Self::new(CONSULTATION_FEE, EMERGENT_CONSULTATION),
        ]
    }
}

/// Versioned, externally loadable rule configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RulesConfig {
    /// Rule file format version.
    pub version: u32,

    /// Normalization rules in priority order.
    pub normalization: Vec<NormalizationRule>,

    /// Keywords marking non-drug supplies.
    pub non_drug_keywords: Vec<String>,
}

impl Default for RulesConfig {
    fn default() -> Self {
        Self {
            version: RULES_VERSION,
            normalization: NormalizationRule::builtin(),
            non_drug_keywords: NON_DRUG_KEYWORDS.iter().map(|k| k.to_string()).collect(),
        }
    }
}

impl RulesConfig {
    /// Load rules from a JSON file.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let rules: Self =
            serde_json::from_str(&content).map_err(|e| ConfigError::Parse(e.to_string()))?;

        if rules.version > RULES_VERSION {
            return Err(ConfigError::Parse(format!(
                "rule file version {} is newer than supported version {}",
                rules.version, RULES_VERSION
            )));
        }

        Ok(rules)
    }

    /// Save rules to a JSON file.
    pub fn save(&self, path: &Path) -> Result<(), ConfigError> {
        let content =
            serde_json::to_string_pretty(self).map_err(|e| ConfigError::Parse(e.to_string()))?;
        std::fs::write(path, content)?;
        Ok(())
    }
}

/// Compiled, read-only rules shared by every processor.
#[derive(Debug, Clone, Default)]
pub struct RuleBook {
    pub normalizer: ItemNormalizer,
    pub non_drug_keywords: NonDrugKeywords,
}

impl RuleBook {
    /// Compile a rule book from configuration.
    pub fn from_config(config: &RulesConfig) -> Result<Self, ConfigError> {
        Ok(Self {
            normalizer: ItemNormalizer::from_rules(&config.normalization)?,
            non_drug_keywords: NonDrugKeywords::new(&config.non_drug_keywords),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_rules_compile() {
        let book = RuleBook::from_config(&RulesConfig::default()).unwrap();
        assert_eq!(book.normalizer.len(), 3);
        assert_eq!(book.non_drug_keywords.keywords().len(), 8);
    }

    #[test]
    fn test_rules_file_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("rules.json");

        let mut rules = RulesConfig::default();
        rules.normalization.push(NormalizationRule::new("^RM\\b", "Room and Board"));
        rules.save(&path).unwrap();

        let loaded = RulesConfig::from_file(&path).unwrap();
        assert_eq!(loaded, rules);
        assert_eq!(loaded.normalization.last().unwrap().replacement, "Room and Board");
    }

    #[test]
    fn test_rules_file_rejects_future_version() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("rules.json");
        std::fs::write(&path, r#"{"version": 99}"#).unwrap();

        assert!(matches!(
            RulesConfig::from_file(&path),
            Err(ConfigError::Parse(_))
        ));
    }

    #[test]
    fn test_partial_rules_file_keeps_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("rules.json");
        std::fs::write(&path, r#"{"non_drug_keywords": ["GLOVES"]}"#).unwrap();

        let loaded = RulesConfig::from_file(&path).unwrap();
        assert_eq!(loaded.non_drug_keywords, vec!["GLOVES".to_string()]);
        assert_eq!(loaded.normalization, NormalizationRule::builtin());
    }
}
