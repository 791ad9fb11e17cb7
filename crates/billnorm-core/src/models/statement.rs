//! Statement data models: billing categories, line items and totals.

use std::fmt;
use std::str::FromStr;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::RequestError;

/// Billing category governing aggregation rules and template choice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    /// Plain statement, single total.
    Regular,
    /// Non-drug supplies split from drugs.
    NonDrugs,
    /// Senior citizen 20% discount.
    Senior,
}

impl Category {
    /// All categories in display order.
    pub const ALL: [Category; 3] = [Category::Regular, Category::NonDrugs, Category::Senior];

    /// Category key as used in requests and output names.
    pub fn key(&self) -> &'static str {
        match self {
            Category::Regular => "regular",
            Category::NonDrugs => "nondrugs",
            Category::Senior => "senior",
        }
    }

    /// Minimum number of cells a charge row needs to be extracted.
    pub fn min_row_cells(&self) -> usize {
        match self {
            Category::Regular => 4,
            Category::NonDrugs | Category::Senior => 6,
        }
    }

    /// Output filename for a processed upload.
    pub fn output_name(&self, filename: &str) -> String {
        format!("edited_{}_{}", self.key(), filename)
    }
}

impl FromStr for Category {
    type Err = RequestError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "regular" => Ok(Category::Regular),
            "nondrugs" => Ok(Category::NonDrugs),
            "senior" => Ok(Category::Senior),
            other => Err(RequestError::InvalidCategory(other.to_string())),
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

/// One row of the itemized charges table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LineItem {
    /// Normalized display label.
    pub particular: String,

    /// Unit price (regular statements only).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub unit_price: Option<Decimal>,

    /// Charged amount.
    pub debit: Decimal,

    /// Non-drug classification (non-drug statements only).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_non_drug: Option<bool>,
}

impl LineItem {
    pub fn new(particular: impl Into<String>, debit: Decimal) -> Self {
        Self {
            particular: particular.into(),
            unit_price: None,
            debit,
            is_non_drug: None,
        }
    }

    pub fn with_unit_price(mut self, unit_price: Decimal) -> Self {
        self.unit_price = Some(unit_price);
        self
    }

    pub fn with_non_drug(mut self, is_non_drug: bool) -> Self {
        self.is_non_drug = Some(is_non_drug);
        self
    }

    /// Whether the item is classified as a non-drug supply.
    pub fn non_drug(&self) -> bool {
        self.is_non_drug.unwrap_or(false)
    }
}

/// Aggregates computed for a statement.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "category", rename_all = "lowercase")]
pub enum CategoryTotals {
    Regular {
        total: Decimal,
    },
    #[serde(rename = "nondrugs")]
    NonDrugs {
        non_drug_total: Decimal,
        drug_total: Decimal,
        grand_total: Decimal,
    },
    Senior {
        subtotal: Decimal,
        discount: Decimal,
        discounted_total: Decimal,
    },
}

impl CategoryTotals {
    /// The amount finally due on the statement.
    pub fn amount_due(&self) -> Decimal {
        match self {
            CategoryTotals::Regular { total } => *total,
            CategoryTotals::NonDrugs { grand_total, .. } => *grand_total,
            CategoryTotals::Senior { discounted_total, .. } => *discounted_total,
        }
    }

    /// Named amounts for display, in a stable order.
    pub fn entries(&self) -> Vec<(&'static str, Decimal)> {
        match self {
            CategoryTotals::Regular { total } => vec![("total", *total)],
            CategoryTotals::NonDrugs {
                non_drug_total,
                drug_total,
                grand_total,
            } => vec![
                ("non_drug_total", *non_drug_total),
                ("drug_total", *drug_total),
                ("grand_total", *grand_total),
            ],
            CategoryTotals::Senior {
                subtotal,
                discount,
                discounted_total,
            } => vec![
                ("subtotal", *subtotal),
                ("discount", *discount),
                ("discounted_total", *discounted_total),
            ],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_category_parsing() {
        assert_eq!("regular".parse::<Category>().unwrap(), Category::Regular);
        assert_eq!("nondrugs".parse::<Category>().unwrap(), Category::NonDrugs);
        assert_eq!("senior".parse::<Category>().unwrap(), Category::Senior);
        assert!(matches!(
            "Senior".parse::<Category>(),
            Err(RequestError::InvalidCategory(_))
        ));
    }

    #[test]
    fn test_output_name() {
        assert_eq!(
            Category::NonDrugs.output_name("soa.docx"),
            "edited_nondrugs_soa.docx"
        );
        assert_eq!(Category::Regular.output_name("a.json"), "edited_regular_a.json");
    }

    #[test]
    fn test_min_row_cells() {
        assert_eq!(Category::Regular.min_row_cells(), 4);
        assert_eq!(Category::NonDrugs.min_row_cells(), 6);
        assert_eq!(Category::Senior.min_row_cells(), 6);
    }

    #[test]
    fn test_totals_serialize_with_category_tag() {
        let totals = CategoryTotals::Regular {
            total: Decimal::new(150050, 2),
        };
        let json = serde_json::to_value(&totals).unwrap();
        assert_eq!(json["category"], "regular");
        assert_eq!(json["total"], "1500.50");
    }
}
