//! Non-drug supply classification.

/// Keywords marking a raw label as a non-drug supply.
pub const NON_DRUG_KEYWORDS: [&str; 8] = [
    "PACK",
    "PC",
    "SOLUSET",
    "CANNULA",
    "SYRINGE",
    "SUPPLY",
    "DISPOSABLE",
    "BOTTLE",
];

/// Case-insensitive keyword set for non-drug classification.
#[derive(Debug, Clone)]
pub struct NonDrugKeywords {
    keywords: Vec<String>,
}

impl NonDrugKeywords {
    pub fn new<I, S>(keywords: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            keywords: keywords
                .into_iter()
                .map(|k| k.as_ref().trim().to_uppercase())
                .filter(|k| !k.is_empty())
                .collect(),
        }
    }

    /// Keywords as stored (uppercased).
    pub fn keywords(&self) -> &[String] {
        &self.keywords
    }

    /// Check whether a raw (pre-normalization) label names a non-drug item.
    pub fn is_non_drug(&self, raw_label: &str) -> bool {
        let upper = raw_label.to_uppercase();
        self.keywords.iter().any(|k| upper.contains(k.as_str()))
    }
}

impl Default for NonDrugKeywords {
    fn default() -> Self {
        Self::new(NON_DRUG_KEYWORDS)
    }
}
