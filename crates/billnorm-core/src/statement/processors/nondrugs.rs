//! Non-drug statements: supplies are totalled apart from drugs.

use super::{ProcessorOptions, StatementProcessor};
use crate::models::statement::{Category, CategoryTotals, LineItem};
use crate::statement::anchors::{Anchor, Mutation, PatchRule, Scope, TextMatch};
use crate::statement::rules::{format_money, money};

/// First-cell labels of summary rows receiving the non-drug total.
pub const NON_DRUG_ROW_LABELS: [&str; 2] = ["NonDrugs", "NonDrugs / Supplies"];

pub struct NonDrugsProcessor {
    options: ProcessorOptions,
}

impl NonDrugsProcessor {
    pub fn new(options: ProcessorOptions) -> Self {
        Self { options }
    }
}

impl Default for NonDrugsProcessor {
    fn default() -> Self {
        Self::new(ProcessorOptions::default())
    }
}

impl StatementProcessor for NonDrugsProcessor {
    fn category(&self) -> Category {
        Category::NonDrugs
    }

    fn options(&self) -> &ProcessorOptions {
        &self.options
    }

    fn totals(&self, items: &[LineItem]) -> CategoryTotals {
        let (non_drugs, drugs): (Vec<&LineItem>, Vec<&LineItem>) =
            items.iter().partition(|i| i.non_drug());

        let non_drug_total = money::sum(non_drugs.iter().map(|i| &i.debit));
        let drug_total = money::sum(drugs.iter().map(|i| &i.debit));

        CategoryTotals::NonDrugs {
            non_drug_total,
            drug_total,
            grand_total: money::sum([&non_drug_total, &drug_total]),
        }
    }

    fn patch_plan(&self, totals: &CategoryTotals) -> Vec<PatchRule> {
        let CategoryTotals::NonDrugs {
            non_drug_total,
            grand_total,
            ..
        } = totals
        else {
            return Vec::new();
        };

        vec![
            PatchRule::new(
                "non_drug_total",
                Anchor::FirstCell(TextMatch::any(NON_DRUG_ROW_LABELS)),
                Scope::Every,
            )
            .with_mutation(Mutation::set_cell(1, format_money(*non_drug_total))),
            PatchRule::new(
                "grand_total",
                Anchor::AnyCell(TextMatch::ignore_case("TOTAL")),
                Scope::Every,
            )
            .with_mutation(Mutation::set_last_cell(format_money(*grand_total))),
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

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    fn uploaded() -> Document {
        Document {
            body: vec![Block::Table(Table::from_rows([
                ["DATE", "REF", "QTY", "PARTICULARS", "UNIT PRICE", "DEBIT"],
                ["01/02", "B1", "2", "Disposable Syringe 3cc", "12.50", "25.00"],
                ["01/02", "B2", "1", "D5LR 1L Bottle", "110.00", "110.00"],
                ["01/02", "B3", "10", "Paracetamol 500mg", "4.00", "40.00"],
                ["01/02", "B4", "1", "Consultation Fee", "800.00", "800.00"],
            ]))],
        }
    }

    fn template() -> Document {
        Document {
            body: vec![
                Block::Paragraph(Paragraph::new("Accreditation No.: 777")),
                Block::Table(Table::from_rows([
                    vec!["Drugs and Medicines", "0.00"],
                    vec!["NonDrugs / Supplies", "0.00"],
                    vec!["TOTAL", "", "0.00"],
                ])),
                Block::Table(Table::from_rows([vec!["NonDrugs", "0.00"], vec!["Sub-total", "0.00"]])),
            ],
        }
    }

    #[test]
    fn test_totals_split_by_classification() {
        let processor = NonDrugsProcessor::default();
        let items = processor.extract(&uploaded());
        let totals = processor.totals(&items);

        assert_eq!(
            totals,
            CategoryTotals::NonDrugs {
                non_drug_total: dec("135.00"),
                drug_total: dec("840.00"),
                grand_total: dec("975.00"),
            }
        );
    }

    #[test]
    fn test_empty_items_are_all_zero() {
        let totals = NonDrugsProcessor::default().totals(&[]);
        assert_eq!(
            totals,
            CategoryTotals::NonDrugs {
                non_drug_total: dec("0.00"),
                drug_total: dec("0.00"),
                grand_total: dec("0.00"),
            }
        );
    }

    #[test]
    fn test_grand_total_is_sum_of_parts() {
        let processor = NonDrugsProcessor::default();
        let items = vec![
            LineItem::new("a", dec("0.10")).with_non_drug(true),
            LineItem::new("b", dec("0.20")).with_non_drug(false),
            LineItem::new("c", dec("1234567.89")).with_non_drug(true),
        ];
        if let CategoryTotals::NonDrugs {
            non_drug_total,
            drug_total,
            grand_total,
        } = processor.totals(&items)
        {
            assert_eq!(grand_total, non_drug_total + drug_total);
            assert_eq!(grand_total, dec("1234568.19"));
        } else {
            panic!("expected non-drug totals");
        }
    }

    #[test]
    fn test_nondrugs_end_to_end() {
        let outcome = NonDrugsProcessor::default().process(&uploaded(), template(), "bill.json");
        assert_eq!(outcome.output_name, "edited_nondrugs_bill.json");

        let tables: Vec<&Table> = outcome.document.tables().collect();
        // Every NonDrugs row in every table gets the supplies total
        assert_eq!(tables[0].rows[1].cells[1].text, "135.00");
        assert_eq!(tables[1].rows[0].cells[1].text, "135.00");
        // Unrelated row untouched
        assert_eq!(tables[0].rows[0].cells[1].text, "0.00");
        // TOTAL rows (any case) get the grand total in the last cell
        assert_eq!(tables[0].rows[2].cells[2].text, "975.00");
        assert_eq!(tables[1].rows[1].cells[1].text, "975.00");

        assert_eq!(outcome.report.status("non_drug_total"), Some(PatchStatus::Written { hits: 2 }));
        assert_eq!(outcome.report.status("grand_total"), Some(PatchStatus::Written { hits: 2 }));
        assert_eq!(outcome.contact, Some(ContactPatch::InsertedAfter { paragraph: 0 }));
    }

    #[test]
    fn test_total_pass_runs_after_non_drug_pass() {
        let template = Document {
            body: vec![Block::Table(Table::from_rows([["NonDrugs TOTAL", "0.00"]]))],
        };
        let outcome = NonDrugsProcessor::default().process(&uploaded(), template, "b.json");

        // Same cell written by both rules; the grand total wins
        let row = &outcome.document.tables().next().unwrap().rows[0];
        assert_eq!(row.cells[1].text, "975.00");
    }
}
