//! Line-item extraction from the detailed charges table.

use tracing::debug;

use super::locator::find_detailed_table;
use super::rules::money::zero;
use super::rules::{parse_money, RuleBook};
use crate::document::{Document, Table};
use crate::models::statement::{Category, LineItem};

/// Column holding the item label.
pub const PARTICULAR_COLUMN: usize = 3;
/// Column holding the unit price.
pub const UNIT_PRICE_COLUMN: usize = 4;
/// Column holding the debit amount.
pub const DEBIT_COLUMN: usize = 5;

/// Extracts line items for one category.
pub struct ItemExtractor<'a> {
    rules: &'a RuleBook,
    category: Category,
}

impl<'a> ItemExtractor<'a> {
    pub fn new(rules: &'a RuleBook, category: Category) -> Self {
        Self { rules, category }
    }

    /// Locate the detailed table and extract its items.
    pub fn extract_from_document(&self, document: &Document) -> Vec<LineItem> {
        match find_detailed_table(document) {
            Some(table) => self.extract(table),
            None => {
                debug!("Uploaded document has no tables, no items extracted");
                Vec::new()
            }
        }
    }

    /// Extract items from a table's data rows. Short rows are skipped.
    pub fn extract(&self, table: &Table) -> Vec<LineItem> {
        let min_cells = self.category.min_row_cells();
        let mut items = Vec::new();

        for (index, row) in table.data_rows().enumerate() {
            let cells = row.texts();
            if cells.len() < min_cells {
                debug!(
                    "Skipping row {}: {} cells, need {}",
                    index + 1,
                    cells.len(),
                    min_cells
                );
                continue;
            }

            let raw_particular = cells[PARTICULAR_COLUMN];
            let particular = self.rules.normalizer.normalize(raw_particular);
            let debit = cells
                .get(DEBIT_COLUMN)
                .map(|text| parse_money(text))
                .unwrap_or_else(zero);

            let mut item = LineItem::new(particular, debit);

            match self.category {
                Category::Regular => {
                    if let Some(text) = cells.get(UNIT_PRICE_COLUMN) {
                        item = item.with_unit_price(parse_money(text));
                    }
                }
                Category::NonDrugs => {
                    let non_drug = self.rules.non_drug_keywords.is_non_drug(raw_particular);
                    item = item.with_non_drug(non_drug);
                }
                Category::Senior => {}
            }

            items.push(item);
        }

        debug!("Extracted {} {} items", items.len(), self.category);
        items
    }
}
