//! Regular statements: a single total of all debits.

use super::{ProcessorOptions, StatementProcessor};
use crate::models::statement::{Category, CategoryTotals, LineItem};
use crate::statement::anchors::{Anchor, Mutation, PatchRule, Scope, TextMatch};
use crate::statement::rules::{format_money, money};

/// Anchor text of the paragraph receiving the total.
pub const TOTAL_AMOUNT_DUE: &str = "TOTAL AMOUNT DUE";

pub struct RegularProcessor {
    options: ProcessorOptions,
}

impl RegularProcessor {
    pub fn new(options: ProcessorOptions) -> Self {
        Self { options }
    }
}

impl Default for RegularProcessor {
    fn default() -> Self {
        Self::new(ProcessorOptions::default())
    }
}

impl StatementProcessor for RegularProcessor {
    fn category(&self) -> Category {
        Category::Regular
    }

    fn options(&self) -> &ProcessorOptions {
        &self.options
    }

    fn totals(&self, items: &[LineItem]) -> CategoryTotals {
        CategoryTotals::Regular {
            total: money::sum(items.iter().map(|i| &i.debit)),
        }
    }

    fn patch_plan(&self, totals: &CategoryTotals) -> Vec<PatchRule> {
        vec![
            PatchRule::new(
                "total_amount_due",
                Anchor::Paragraph(TextMatch::exact(TOTAL_AMOUNT_DUE)),
                Scope::First,
            )
            .with_mutation(Mutation::AppendLine(format_money(totals.amount_due()))),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::{Block, Document, Paragraph, Table};
    use crate::statement::anchors::PatchStatus;
    use crate::statement::patcher::ContactPatch;
    use pretty_assertions::assert_eq;
    use rust_decimal::Decimal;
    use std::str::FromStr;

    fn uploaded() -> Document {
        Document {
            body: vec![
                Block::Paragraph(Paragraph::new("DETAILED HOSPITAL CHARGES")),
                Block::Table(Table::from_rows([
                    ["DATE", "REF. NO.", "QTY", "PARTICULARS", "UNIT PRICE", "DEBIT/CHARGES"],
                    ["01/02", "A1", "1", "Consultation Fee", "500.00", "500.00"],
                    ["01/02", "A2", "1", "Room and Board", "1,250.50", "1,250.50"],
                    ["01/02", "A3", "3", "Paracetamol 500mg", "4.25", "12.75"],
                ])),
            ],
        }
    }

    fn template() -> Document {
        Document {
            body: vec![
                Block::Paragraph(Paragraph::new("CITY GENERAL HOSPITAL")),
                Block::Paragraph(Paragraph::new("Accreditation No.: 12345")),
                Block::Table(Table::from_rows([["Summary", "Amount"]])),
                Block::Paragraph(Paragraph::new("TOTAL AMOUNT DUE")),
                Block::Paragraph(Paragraph::new("TOTAL AMOUNT DUE (copy)")),
            ],
        }
    }

    #[test]
    fn test_regular_end_to_end() {
        let processor = RegularProcessor::default();
        let outcome = processor.process(&uploaded(), template(), "soa.json");

        assert_eq!(outcome.output_name, "edited_regular_soa.json");
        assert_eq!(outcome.items[0].particular, "Emergent ER Consultation");
        assert_eq!(
            outcome.totals,
            CategoryTotals::Regular {
                total: Decimal::from_str("1763.25").unwrap()
            }
        );

        let paragraphs: Vec<String> = outcome.document.paragraphs().map(|p| p.text()).collect();
        assert_eq!(
            paragraphs,
            vec![
                "CITY GENERAL HOSPITAL",
                "Accreditation No.: 12345",
                "Contact No.: 8941-8518",
                "TOTAL AMOUNT DUE\n1,763.25",
                "TOTAL AMOUNT DUE (copy)",
            ]
        );
        assert_eq!(outcome.contact, Some(ContactPatch::InsertedAfter { paragraph: 1 }));
        assert!(outcome.report.is_complete());
    }

    #[test]
    fn test_missing_total_anchor_is_reported() {
        let mut template = Document::new();
        template.add_paragraph("Grand total");

        let outcome = RegularProcessor::default().process(&uploaded(), template, "x.json");
        assert_eq!(outcome.report.status("total_amount_due"), Some(PatchStatus::Missed));
        assert_eq!(outcome.report.missed(), vec!["total_amount_due"]);
        assert_eq!(outcome.document.paragraphs().next().unwrap().text(), "Grand total");
        assert_eq!(outcome.contact, Some(ContactPatch::Appended));
    }

    #[test]
    fn test_empty_upload_totals_zero() {
        let mut template = Document::new();
        template.add_paragraph("TOTAL AMOUNT DUE");

        let outcome = RegularProcessor::default().process(&Document::new(), template, "x.json");
        assert!(outcome.items.is_empty());
        assert_eq!(
            outcome.document.paragraphs().next().unwrap().text(),
            "TOTAL AMOUNT DUE\n0.00"
        );
    }

    #[test]
    fn test_out_of_range_debits_count_as_zero() {
        let huge = "50000000000000000000000000000";
        let uploaded = Document {
            body: vec![Block::Table(Table::from_rows([
                ["DATE", "REF. NO.", "QTY", "PARTICULARS", "UNIT PRICE", "DEBIT/CHARGES"],
                ["01/02", "A1", "1", "Room and Board", huge, huge],
                ["01/02", "A2", "1", "Room and Board", huge, huge],
                ["01/02", "A3", "1", "Oxygen", "10.00", "10.00"],
            ]))],
        };

        let outcome = RegularProcessor::default().process(&uploaded, template(), "x.json");
        assert_eq!(outcome.items.len(), 3);
        assert_eq!(
            outcome.totals,
            CategoryTotals::Regular {
                total: Decimal::from_str("10.00").unwrap()
            }
        );
    }
}
