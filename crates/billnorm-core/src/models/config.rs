//! Configuration structures for the statement pipeline.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::error::ConfigError;
use crate::models::statement::Category;
use crate::statement::patcher::DEFAULT_CONTACT_LINE;
use crate::statement::processors::ProcessorOptions;
use crate::statement::rules::{RuleBook, RulesConfig};

/// Main configuration for billnorm.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct BillnormConfig {
    /// Normalization and classification rules.
    pub rules: RulesConfig,

    /// External rule file, used instead of `rules` when set.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rules_file: Option<PathBuf>,

    /// Reference templates per category.
    pub templates: TemplateConfig,

    /// Upload and output directories.
    pub storage: StorageConfig,

    /// Template patching settings.
    pub patch: PatchConfig,
}

/// Reference template locations.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TemplateConfig {
    /// Directory containing template files.
    pub dir: PathBuf,

    /// Regular statement template file name.
    pub regular: String,

    /// Non-drug statement template file name.
    pub nondrugs: String,

    /// Senior citizen statement template file name.
    pub senior: String,
}

impl Default for TemplateConfig {
    fn default() -> Self {
        Self {
            dir: PathBuf::from("templates"),
            regular: "reference_regular.json".to_string(),
            nondrugs: "reference_nondrugs.json".to_string(),
            senior: "reference_senior.json".to_string(),
        }
    }
}

/// Storage directories.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// Where uploaded statements are saved.
    pub upload_dir: PathBuf,

    /// Where processed statements are written.
    pub output_dir: PathBuf,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            upload_dir: PathBuf::from("uploads"),
            output_dir: PathBuf::from("outputs"),
        }
    }
}

/// Template patching settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PatchConfig {
    /// Contact line ensured on regular and non-drug statements.
    pub contact_line: String,
}

impl Default for PatchConfig {
    fn default() -> Self {
        Self {
            contact_line: DEFAULT_CONTACT_LINE.to_string(),
        }
    }
}

impl BillnormConfig {
    /// Load configuration from a JSON file.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        serde_json::from_str(&content).map_err(|e| ConfigError::Parse(e.to_string()))
    }

    /// Save configuration to a JSON file.
    pub fn save(&self, path: &Path) -> Result<(), ConfigError> {
        let content =
            serde_json::to_string_pretty(self).map_err(|e| ConfigError::Parse(e.to_string()))?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Get full path to a category's reference template.
    pub fn template_path(&self, category: Category) -> PathBuf {
        let name = match category {
            Category::Regular => &self.templates.regular,
            Category::NonDrugs => &self.templates.nondrugs,
            Category::Senior => &self.templates.senior,
        };
        self.templates.dir.join(name)
    }

    /// Effective rules: the external rule file when configured, else inline rules.
    pub fn load_rules(&self) -> Result<RulesConfig, ConfigError> {
        match &self.rules_file {
            Some(path) => RulesConfig::from_file(path),
            None => Ok(self.rules.clone()),
        }
    }

    /// Build processor options from this configuration.
    pub fn processor_options(&self) -> Result<ProcessorOptions, ConfigError> {
        let rules = RuleBook::from_config(&self.load_rules()?)?;
        Ok(ProcessorOptions {
            rules: Arc::new(rules),
            contact_line: self.patch.contact_line.clone(),
        })
    }
}
