//! Hospital statement processing: item extraction, category totals and
//! template patching.

pub mod anchors;
pub mod extractor;
pub mod locator;
pub mod patcher;
pub mod processors;
pub mod rules;

pub use anchors::{PatchReport, PatchRule, PatchStatus};
pub use extractor::ItemExtractor;
pub use locator::find_detailed_table;
pub use patcher::{ensure_contact_number, ContactPatch, DEFAULT_CONTACT_LINE};
pub use processors::{
    processor_for, NonDrugsProcessor, ProcessOutcome, ProcessorOptions, RegularProcessor,
    SeniorProcessor, StatementProcessor,
};
pub use rules::{format_money, parse_money, ItemNormalizer, NonDrugKeywords, RuleBook, RulesConfig};
