//! Senior citizen statements: 20% discount on the subtotal.

use rust_decimal::Decimal;
use tracing::warn;

use super::{ProcessorOptions, StatementProcessor};
use crate::models::statement::{Category, CategoryTotals, LineItem};
use crate::statement::anchors::{Anchor, Fallback, Mutation, PatchRule, Scope, TextMatch};
use crate::statement::rules::{format_money, money, round_half_up};

/// Senior citizen discount rate (20%).
pub fn discount_rate() -> Decimal {
    Decimal::new(20, 2)
}

/// Anchor text of the discount row.
pub const DISCOUNT_ANCHOR: &str = "Senior Citizen Discount";

/// Label written into the discount row.
pub const DISCOUNT_LABEL: &str = "Senior Citizen Discount (20%)";

pub struct SeniorProcessor {
    options: ProcessorOptions,
}

impl SeniorProcessor {
    pub fn new(options: ProcessorOptions) -> Self {
        Self { options }
    }
}

impl Default for SeniorProcessor {
    fn default() -> Self {
        Self::new(ProcessorOptions::default())
    }
}

impl StatementProcessor for SeniorProcessor {
    fn category(&self) -> Category {
        Category::Senior
    }

    fn options(&self) -> &ProcessorOptions {
        &self.options
    }

    fn totals(&self, items: &[LineItem]) -> CategoryTotals {
        let subtotal = money::sum(items.iter().map(|i| &i.debit));
        let discount = match subtotal.checked_mul(discount_rate()) {
            Some(discount) => round_half_up(discount),
            None => {
                warn!("Discount on subtotal {} overflows, applying none", subtotal);
                money::zero()
            }
        };

        CategoryTotals::Senior {
            subtotal,
            discount,
            discounted_total: subtotal - discount,
        }
    }

    fn patch_plan(&self, totals: &CategoryTotals) -> Vec<PatchRule> {
        let CategoryTotals::Senior {
            discount,
            discounted_total,
            ..
        } = totals
        else {
            return Vec::new();
        };

        let amount = format!("({})", format_money(*discount));

        vec![
            PatchRule::new(
                "senior_discount",
                Anchor::FirstCell(TextMatch::exact(DISCOUNT_ANCHOR)),
                Scope::First,
            )
            .with_mutation(Mutation::set_cell(0, DISCOUNT_LABEL))
            .with_mutation(Mutation::set_cell(1, amount.clone()))
            .with_fallback(Fallback::AppendParagraph(format!("{}: {}", DISCOUNT_LABEL, amount))),
            PatchRule::new(
                "discounted_total",
                Anchor::Paragraph(TextMatch::ignore_case("TOTAL")),
                Scope::First,
            )
            .with_mutation(Mutation::AppendLine(format_money(*discounted_total))),
        ]
    }

    fn ensures_contact_line(&self) -> bool {
        false
    }
}
