//! Process command - rebuild a single statement on its reference template.

use std::path::{Path, PathBuf};
use std::time::Instant;

use clap::Args;
use console::style;
use serde::Serialize;
use tracing::{debug, info};

use billnorm_core::service::{secure_filename, ProcessedStatement};
use billnorm_core::statement::format_money;
use billnorm_core::{Category, StatementService};

use super::load_config;

/// Arguments for the process command.
#[derive(Args)]
pub struct ProcessArgs {
    /// Uploaded statement file
    #[arg(required = true)]
    input: PathBuf,

    /// Billing category
    #[arg(short = 'C', long, value_enum)]
    category: CategoryArg,

    /// Reference template (default: configured template for the category)
    #[arg(short, long)]
    template: Option<PathBuf>,

    /// Output directory (default: configured output directory)
    #[arg(short, long)]
    output_dir: Option<PathBuf>,

    /// Report format
    #[arg(short, long, value_enum, default_value = "text")]
    format: ReportFormat,

    /// Fail when a computed value could not be placed in the template
    #[arg(long)]
    strict: bool,
}

#[derive(Clone, Copy, Debug, clap::ValueEnum)]
pub enum CategoryArg {
    /// Single total of all charges
    Regular,
    /// Non-drug supplies totalled apart from drugs
    #[value(name = "nondrugs")]
    NonDrugs,
    /// Senior citizen 20% discount
    Senior,
}

impl From<CategoryArg> for Category {
    fn from(arg: CategoryArg) -> Self {
        match arg {
            CategoryArg::Regular => Category::Regular,
            CategoryArg::NonDrugs => Category::NonDrugs,
            CategoryArg::Senior => Category::Senior,
        }
    }
}

#[derive(Clone, Copy, Debug, clap::ValueEnum)]
pub enum ReportFormat {
    /// JSON report
    Json,
    /// Plain text summary
    Text,
}

#[derive(Serialize)]
struct Report<'a> {
    output: &'a Path,
    download: &'a str,
    #[serde(flatten)]
    outcome: &'a billnorm_core::ProcessOutcome,
}

pub fn run(args: ProcessArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let start = Instant::now();

    let mut config = load_config(config_path)?;
    if let Some(output_dir) = &args.output_dir {
        config.storage.output_dir = output_dir.clone();
    }

    if !args.input.exists() {
        anyhow::bail!("Input file not found: {}", args.input.display());
    }

    let category = Category::from(args.category);
    let template = args
        .template
        .clone()
        .unwrap_or_else(|| config.template_path(category));
    if !template.exists() {
        anyhow::bail!("Template not found: {}", template.display());
    }

    let filename = input_filename(&args.input)?;
    info!("Processing {} as {}", args.input.display(), category);

    let service = StatementService::new(config)?;
    let processed = service.process_files(category, &args.input, &template, &filename)?;

    match args.format {
        ReportFormat::Json => {
            let report = Report {
                output: &processed.output_path,
                download: &processed.download,
                outcome: &processed.outcome,
            };
            println!("{}", serde_json::to_string_pretty(&report)?);
        }
        ReportFormat::Text => print!("{}", format_text(&processed)),
    }

    debug!("Total processing time: {:?}", start.elapsed());

    let missed = processed.outcome.report.missed();
    if args.strict && !missed.is_empty() {
        anyhow::bail!("Values not written to template: {}", missed.join(", "));
    }

    Ok(())
}

/// Sanitized file name of an input path.
pub fn input_filename(input: &Path) -> anyhow::Result<String> {
    let raw = input
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or_default();
    let filename = secure_filename(raw);
    if filename.is_empty() {
        anyhow::bail!("Cannot derive an output name from {}", input.display());
    }
    Ok(filename)
}

pub fn format_text(processed: &ProcessedStatement) -> String {
    let outcome = &processed.outcome;
    let mut output = String::new();

    output.push_str(&format!(
        "{} Wrote {}\n",
        style("✓").green(),
        processed.output_path.display()
    ));
    output.push_str(&format!("Download: {}\n", processed.download));
    output.push_str(&format!("Items: {}\n", outcome.items.len()));
    output.push('\n');

    output.push_str("Totals:\n");
    for (name, amount) in outcome.totals.entries() {
        output.push_str(&format!("  {:<18} {:>14}\n", name, format_money(amount)));
    }

    let missed = outcome.report.missed();
    if !missed.is_empty() {
        output.push('\n');
        output.push_str(&format!(
            "{} Not written (anchor not found): {}\n",
            style("!").yellow(),
            missed.join(", ")
        ));
    }

    output
}
