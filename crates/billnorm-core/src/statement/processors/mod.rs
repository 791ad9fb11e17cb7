//! Category processors.
//!
//! Each processor extracts line items from an uploaded statement, computes its
//! category totals and patches those totals into the reference template. The
//! template is taken by value and handed back inside the [`ProcessOutcome`].

mod nondrugs;
mod regular;
mod senior;

pub use nondrugs::NonDrugsProcessor;
pub use regular::RegularProcessor;
pub use senior::SeniorProcessor;

use std::sync::Arc;

use serde::Serialize;
use tracing::info;

use super::anchors::{apply_plan, PatchReport, PatchRule};
use super::extractor::ItemExtractor;
use super::patcher::{ensure_contact_number, ContactPatch, DEFAULT_CONTACT_LINE};
use super::rules::RuleBook;
use crate::document::Document;
use crate::models::statement::{Category, CategoryTotals, LineItem};

/// Settings shared by all processors.
#[derive(Debug, Clone)]
pub struct ProcessorOptions {
    /// Compiled normalization and classification rules.
    pub rules: Arc<RuleBook>,
    /// Contact line ensured on regular and non-drug statements.
    pub contact_line: String,
}

impl Default for ProcessorOptions {
    fn default() -> Self {
        Self {
            rules: Arc::new(RuleBook::default()),
            contact_line: DEFAULT_CONTACT_LINE.to_string(),
        }
    }
}

/// Result of processing one statement.
#[derive(Debug, Clone, Serialize)]
pub struct ProcessOutcome {
    /// The patched template.
    #[serde(skip)]
    pub document: Document,
    /// Output filename.
    pub output_name: String,
    /// Extracted line items.
    pub items: Vec<LineItem>,
    /// Computed totals.
    pub totals: CategoryTotals,
    /// Which anchored values were written.
    pub report: PatchReport,
    /// Contact line handling, when the category ensures one.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub contact: Option<ContactPatch>,
}

/// Trait for category-specific statement processing.
pub trait StatementProcessor: Send + Sync {
    /// Category handled by this processor.
    fn category(&self) -> Category;

    /// Processor settings.
    fn options(&self) -> &ProcessorOptions;

    /// Compute totals from extracted items.
    fn totals(&self, items: &[LineItem]) -> CategoryTotals;

    /// Ordered patch rules writing `totals` into a template.
    fn patch_plan(&self, totals: &CategoryTotals) -> Vec<PatchRule>;

    /// Whether the contact line is ensured after patching.
    fn ensures_contact_line(&self) -> bool {
        true
    }

    /// Extract line items from an uploaded statement.
    fn extract(&self, uploaded: &Document) -> Vec<LineItem> {
        ItemExtractor::new(&self.options().rules, self.category()).extract_from_document(uploaded)
    }

    /// Process an uploaded statement into the given template.
    fn process(&self, uploaded: &Document, template: Document, filename: &str) -> ProcessOutcome {
        let mut document = template;

        let items = self.extract(uploaded);
        let totals = self.totals(&items);
        let report = apply_plan(&mut document, &self.patch_plan(&totals));

        let contact = if self.ensures_contact_line() {
            Some(ensure_contact_number(&mut document, &self.options().contact_line))
        } else {
            None
        };

        info!(
            "Processed {} statement {}: {} items, amount due {}, {} anchors missed",
            self.category(),
            filename,
            items.len(),
            totals.amount_due(),
            report.missed().len()
        );

        ProcessOutcome {
            document,
            output_name: self.category().output_name(filename),
            items,
            totals,
            report,
            contact,
        }
    }
}

/// Create the processor for a category.
pub fn processor_for(category: Category, options: ProcessorOptions) -> Box<dyn StatementProcessor> {
    match category {
        Category::Regular => Box::new(RegularProcessor::new(options)),
        Category::NonDrugs => Box::new(NonDrugsProcessor::new(options)),
        Category::Senior => Box::new(SeniorProcessor::new(options)),
    }
}
