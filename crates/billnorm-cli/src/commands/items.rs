//! Items command - show the normalized line items of a statement.

use std::path::PathBuf;

use clap::Args;
use serde::Serialize;
use tracing::info;

use billnorm_core::statement::format_money;
use billnorm_core::{
    processor_for, Category, CategoryTotals, DocumentCodec, JsonCodec, LineItem, StatementProcessor,
};

use super::load_config;
use super::process::CategoryArg;

/// Arguments for the items command.
#[derive(Args)]
pub struct ItemsArgs {
    /// Statement file
    #[arg(required = true)]
    input: PathBuf,

    /// Billing category used for extraction
    #[arg(short = 'C', long, value_enum)]
    category: CategoryArg,

    /// Output format
    #[arg(short, long, value_enum, default_value = "text")]
    format: ItemsFormat,

    /// Write output to a file instead of stdout
    #[arg(short, long)]
    output: Option<PathBuf>,
}

#[derive(Clone, Copy, Debug, clap::ValueEnum)]
pub enum ItemsFormat {
    /// JSON with items and totals
    Json,
    /// CSV, one row per item
    Csv,
    /// Human-readable table
    Text,
}

#[derive(Serialize)]
struct ItemsReport<'a> {
    category: Category,
    items: &'a [LineItem],
    totals: &'a CategoryTotals,
}

pub fn run(args: ItemsArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let config = load_config(config_path)?;

    if !args.input.exists() {
        anyhow::bail!("Input file not found: {}", args.input.display());
    }

    let category = Category::from(args.category);
    let document = JsonCodec::new().load(&args.input)?;
    let processor = processor_for(category, config.processor_options()?);

    let items = processor.extract(&document);
    let totals = processor.totals(&items);
    info!("Extracted {} items from {}", items.len(), args.input.display());

    let content = match args.format {
        ItemsFormat::Json => serde_json::to_string_pretty(&ItemsReport {
            category,
            items: &items,
            totals: &totals,
        })?,
        ItemsFormat::Csv => format_items_csv(&items)?,
        ItemsFormat::Text => format_items_text(&items, &totals),
    };

    match args.output {
        Some(path) => std::fs::write(&path, content)?,
        None => println!("{}", content),
    }

    Ok(())
}

fn format_items_csv(items: &[LineItem]) -> anyhow::Result<String> {
    let mut wtr = csv::Writer::from_writer(vec![]);

    wtr.write_record(["particular", "unit_price", "debit", "non_drug"])?;
    for item in items {
        wtr.write_record([
            item.particular.clone(),
            item.unit_price.map(|p| p.to_string()).unwrap_or_default(),
            item.debit.to_string(),
            item.is_non_drug.map(|n| n.to_string()).unwrap_or_default(),
        ])?;
    }

    let data = String::from_utf8(wtr.into_inner()?)?;
    Ok(data)
}

fn format_items_text(items: &[LineItem], totals: &CategoryTotals) -> String {
    let mut output = String::new();

    for item in items {
        let marker = if item.non_drug() { " *" } else { "" };
        output.push_str(&format!(
            "{:<40} {:>14}{}\n",
            item.particular,
            format_money(item.debit),
            marker
        ));
    }
    if items.iter().any(|i| i.non_drug()) {
        output.push_str("(* non-drug supply)\n");
    }

    output.push('\n');
    for (name, amount) in totals.entries() {
        output.push_str(&format!("{:<40} {:>14}\n", name, format_money(amount)));
    }

    output
}
