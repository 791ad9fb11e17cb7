//! Line-item label normalization.

use lazy_static::lazy_static;
use regex::{Regex, RegexBuilder};
use tracing::trace;

use super::NormalizationRule;
use crate::error::ConfigError;

lazy_static! {
    static ref BUILTIN: ItemNormalizer = ItemNormalizer::from_rules(&NormalizationRule::builtin())
        .expect("built-in normalization patterns compile");
}

/// A normalization rule with its pattern compiled.
#[derive(Debug, Clone)]
struct CompiledRule {
    pattern: Regex,
    replacement: String,
}

/// Maps raw line-item labels to standardized labels.
///
/// Rules are tried in declaration order and the first match wins. Matching is
/// a case-insensitive search anywhere in the trimmed label; labels matching no
/// rule are returned trimmed.
#[derive(Debug, Clone)]
pub struct ItemNormalizer {
    rules: Vec<CompiledRule>,
}

impl ItemNormalizer {
    /// Compile a normalizer from an ordered rule table.
    pub fn from_rules(rules: &[NormalizationRule]) -> Result<Self, ConfigError> {
        let rules = rules
            .iter()
            .map(|rule| {
                let pattern = RegexBuilder::new(&rule.pattern)
                    .case_insensitive(true)
                    .build()
                    .map_err(|e| ConfigError::InvalidPattern {
                        pattern: rule.pattern.clone(),
                        reason: e.to_string(),
                    })?;
                Ok(CompiledRule {
                    pattern,
                    replacement: rule.replacement.clone(),
                })
            })
            .collect::<Result<Vec<_>, ConfigError>>()?;

        Ok(Self { rules })
    }

    /// Normalizer with the built-in rule table.
    pub fn builtin() -> Self {
        BUILTIN.clone()
    }

    /// Number of rules.
    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Normalize a raw label.
    pub fn normalize(&self, raw: &str) -> String {
        let text = raw.trim();

        for rule in &self.rules {
            if rule.pattern.is_match(text) {
                trace!("Label {:?} matched {:?}", text, rule.pattern.as_str());
                return rule.replacement.clone();
            }
        }

        text.to_string()
    }
}

impl Default for ItemNormalizer {
    fn default() -> Self {
        Self::builtin()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_compiles_every_rule() {
        assert_eq!(ItemNormalizer::builtin().len(), NormalizationRule::builtin().len());
        assert_eq!(ItemNormalizer::default().len(), ItemNormalizer::builtin().len());
    }

    #[test]
    fn test_consultation_fee() {
        let normalizer = ItemNormalizer::builtin();
        assert_eq!(normalizer.normalize("Consultation Fee"), "Emergent ER Consultation");
        assert_eq!(normalizer.normalize("  consultation fee - ER "), "Emergent ER Consultation");
    }

    #[test]
    fn test_billing_codes() {
        let normalizer = ItemNormalizer::builtin();
        assert_eq!(
            normalizer.normalize("1203-2050360-5 DABALOS, MARIA"),
            "Emergent ER Consultation"
        );
        assert_eq!(
            normalizer.normalize("1203-2050360-5- DABALOS"),
            "Emergent ER Consultation"
        );
    }

    #[test]
    fn test_unmatched_passes_through_trimmed() {
        let normalizer = ItemNormalizer::builtin();
        assert_eq!(normalizer.normalize("  Paracetamol 500mg "), "Paracetamol 500mg");
        assert_eq!(normalizer.normalize(""), "");
    }

    #[test]
    fn test_normalize_is_idempotent() {
        let normalizer = ItemNormalizer::builtin();
        for raw in [
            "Consultation Fee",
            "1203-2050360-5 DABALOS",
            " Room and Board ",
            "SYRINGE 5ML",
            "",
        ] {
            let once = normalizer.normalize(raw);
            assert_eq!(normalizer.normalize(&once), once);
        }
    }

    #[test]
    fn test_first_match_wins() {
        let rules = vec![
            NormalizationRule::new("room", "Room and Board"),
            NormalizationRule::new("room and board", "never used"),
        ];
        let normalizer = ItemNormalizer::from_rules(&rules).unwrap();
        assert_eq!(normalizer.normalize("ROOM AND BOARD - WARD"), "Room and Board");
    }

    #[test]
    fn test_invalid_pattern_is_config_error() {
        let rules = vec![NormalizationRule::new("(unclosed", "x")];
        let err = ItemNormalizer::from_rules(&rules).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidPattern { .. }));
    }
}
