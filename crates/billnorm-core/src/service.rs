//! Request boundary: category resolution, storage and output naming.

use std::fs;
use std::path::{Component, Path, PathBuf};

use tracing::{debug, info};
use unicode_normalization::UnicodeNormalization;

use crate::document::{DocumentCodec, JsonCodec};
use crate::error::{RequestError, Result};
use crate::models::config::BillnormConfig;
use crate::models::statement::Category;
use crate::statement::processors::{processor_for, ProcessOutcome, ProcessorOptions};

/// Prefix of retrieval paths for processed statements.
pub const DOWNLOAD_PREFIX: &str = "/download/";

/// An uploaded statement.
#[derive(Debug, Clone)]
pub struct Upload {
    /// Client-supplied filename.
    pub filename: String,
    /// File contents.
    pub data: Vec<u8>,
}

impl Upload {
    pub fn new(filename: impl Into<String>, data: Vec<u8>) -> Self {
        Self {
            filename: filename.into(),
            data,
        }
    }
}

/// A processed request.
#[derive(Debug)]
pub struct ProcessedStatement {
    /// Where the output was written.
    pub output_path: PathBuf,
    /// Retrieval path for the output.
    pub download: String,
    /// Processing details.
    pub outcome: ProcessOutcome,
}

/// Processes uploads against the configured reference templates.
pub struct StatementService<C: DocumentCodec = JsonCodec> {
    config: BillnormConfig,
    options: ProcessorOptions,
    codec: C,
}

impl StatementService<JsonCodec> {
    /// Create a service using the JSON document codec.
    pub fn new(config: BillnormConfig) -> Result<Self> {
        Self::with_codec(config, JsonCodec::new().with_pretty(true))
    }
}

impl<C: DocumentCodec> StatementService<C> {
    /// Create a service with a specific document codec.
    pub fn with_codec(config: BillnormConfig, codec: C) -> Result<Self> {
        let options = config.processor_options()?;
        Ok(Self {
            config,
            options,
            codec,
        })
    }

    pub fn config(&self) -> &BillnormConfig {
        &self.config
    }

    /// Handle an upload for a category key.
    ///
    /// Unknown categories and missing files are rejected before any
    /// processing happens.
    pub fn process_upload(&self, category: &str, upload: Option<Upload>) -> Result<ProcessedStatement> {
        let category: Category = category.parse()?;
        let upload = upload.ok_or(RequestError::MissingFile)?;
        if upload.filename.is_empty() {
            return Err(RequestError::MissingFile.into());
        }

        let filename = secure_filename(&upload.filename);
        if filename.is_empty() {
            return Err(RequestError::InvalidFilename(upload.filename).into());
        }

        fs::create_dir_all(&self.config.storage.upload_dir)?;
        let upload_path = self.config.storage.upload_dir.join(&filename);
        fs::write(&upload_path, &upload.data)?;
        debug!("Saved upload to {}", upload_path.display());

        let template_path = self.config.template_path(category);
        self.process_files(category, &upload_path, &template_path, &filename)
    }

    /// Process a statement file against a template file.
    pub fn process_files(
        &self,
        category: Category,
        upload_path: &Path,
        template_path: &Path,
        filename: &str,
    ) -> Result<ProcessedStatement> {
        let uploaded = self.codec.load(upload_path)?;
        let template = self.codec.load(template_path)?;

        let processor = processor_for(category, self.options.clone());
        let outcome = processor.process(&uploaded, template, filename);

        fs::create_dir_all(&self.config.storage.output_dir)?;
        let output_path = self.config.storage.output_dir.join(&outcome.output_name);
        self.codec.save(&outcome.document, &output_path)?;

        info!("Wrote {}", output_path.display());

        Ok(ProcessedStatement {
            download: format!("{}{}", DOWNLOAD_PREFIX, outcome.output_name),
            output_path,
            outcome,
        })
    }

    /// Resolve a processed output by name, refusing paths outside the output directory.
    pub fn resolve_download(&self, name: &str) -> Result<PathBuf> {
        let relative = Path::new(name);
        let safe = !name.is_empty()
            && relative
                .components()
                .all(|c| matches!(c, Component::Normal(_)));
        if !safe {
            return Err(RequestError::NotFound(name.to_string()).into());
        }

        let path = self.config.storage.output_dir.join(relative);
        if !path.is_file() {
            return Err(RequestError::NotFound(name.to_string()).into());
        }
        Ok(path)
    }
}

/// Reduce a client filename to a safe ASCII name.
///
/// Accented letters are decomposed and keep their base letter. Path
/// separators become spaces, whitespace runs become underscores, and anything
/// outside `[A-Za-z0-9_.-]` is dropped along with leading and trailing dots
/// and underscores.
pub fn secure_filename(filename: &str) -> String {
    let ascii: String = filename
        .nfkd()
        .filter(|c| c.is_ascii())
        .map(|c| if c == '/' || c == '\\' { ' ' } else { c })
        .collect();

    let joined = ascii.split_whitespace().collect::<Vec<_>>().join("_");
    let cleaned: String = joined
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '.' | '-'))
        .collect();

    cleaned.trim_matches(|c| c == '.' || c == '_').to_string()
}
