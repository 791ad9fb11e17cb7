//! Batch processing command for multiple statement files.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Instant;

use clap::Args;
use console::style;
use glob::glob;
use indicatif::{ProgressBar, ProgressStyle};
use tracing::{error, warn};

use billnorm_core::service::ProcessedStatement;
use billnorm_core::{Category, StatementService};

use super::load_config;
use super::process::{input_filename, CategoryArg};

/// Arguments for the batch command.
#[derive(Args)]
pub struct BatchArgs {
    /// Glob pattern matching statement files
    #[arg(required = true)]
    input: String,

    /// Billing category applied to every file
    #[arg(short = 'C', long, value_enum)]
    category: CategoryArg,

    /// Reference template (default: configured template for the category)
    #[arg(short, long)]
    template: Option<PathBuf>,

    /// Output directory (default: configured output directory)
    #[arg(short, long)]
    output_dir: Option<PathBuf>,

    /// Also generate a summary CSV in the output directory
    #[arg(long)]
    summary: bool,

    /// Continue on error
    #[arg(long)]
    continue_on_error: bool,
}

/// Result of processing a single file.
struct BatchResult {
    path: PathBuf,
    processed: Option<ProcessedStatement>,
    error: Option<String>,
    processing_time_ms: u64,
}

pub fn run(args: BatchArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let start = Instant::now();

    let mut config = load_config(config_path)?;
    if let Some(output_dir) = &args.output_dir {
        config.storage.output_dir = output_dir.clone();
    }
    let output_dir = config.storage.output_dir.clone();

    let category = Category::from(args.category);
    let template = args
        .template
        .clone()
        .unwrap_or_else(|| config.template_path(category));
    if !template.exists() {
        anyhow::bail!("Template not found: {}", template.display());
    }

    let files: Vec<PathBuf> = glob(&args.input)?
        .filter_map(|r| r.ok())
        .filter(|p| p.is_file())
        .collect();

    if files.is_empty() {
        anyhow::bail!("No matching files found for pattern: {}", args.input);
    }

    eprintln!(
        "{} Found {} files to process",
        style("ℹ").blue(),
        files.len()
    );

    let pb = ProgressBar::new(files.len() as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} files")?
            .progress_chars("=>-"),
    );

    let service = StatementService::new(config)?;
    let mut results = Vec::with_capacity(files.len());

    for path in files {
        let file_start = Instant::now();
        let result = process_single_file(&service, category, &path, &template);
        let processing_time_ms = file_start.elapsed().as_millis() as u64;

        match result {
            Ok(processed) => results.push(BatchResult {
                path,
                processed: Some(processed),
                error: None,
                processing_time_ms,
            }),
            Err(e) => {
                let error_msg = e.to_string();
                if args.continue_on_error {
                    warn!("Failed to process {}: {}", path.display(), error_msg);
                    results.push(BatchResult {
                        path,
                        processed: None,
                        error: Some(error_msg),
                        processing_time_ms,
                    });
                } else {
                    pb.abandon();
                    error!("Failed to process {}: {}", path.display(), error_msg);
                    anyhow::bail!("Processing failed for {}: {}", path.display(), error_msg);
                }
            }
        }

        pb.inc(1);
    }

    pb.finish_and_clear();

    if args.summary {
        let summary_path = output_dir.join("summary.csv");
        write_summary(&summary_path, &results)?;
        println!(
            "{} Summary written to {}",
            style("✓").green(),
            summary_path.display()
        );
    }

    let failed: Vec<_> = results.iter().filter(|r| r.error.is_some()).collect();
    let incomplete = results
        .iter()
        .filter_map(|r| r.processed.as_ref())
        .filter(|p| !p.outcome.report.is_complete())
        .count();

    println!(
        "{} Processed {} files in {:?}",
        style("✓").green(),
        results.len(),
        start.elapsed()
    );
    println!(
        "   {} successful, {} failed, {} with missed anchors",
        style(results.len() - failed.len()).green(),
        style(failed.len()).red(),
        style(incomplete).yellow()
    );

    if !failed.is_empty() {
        println!();
        println!("{}", style("Failed files:").red());
        for result in &failed {
            println!(
                "  - {}: {}",
                result.path.display(),
                result.error.as_deref().unwrap_or("unknown error")
            );
        }
    }

    Ok(())
}

fn process_single_file(
    service: &StatementService,
    category: Category,
    path: &Path,
    template: &Path,
) -> anyhow::Result<ProcessedStatement> {
    let filename = input_filename(path)?;
    Ok(service.process_files(category, path, template, &filename)?)
}

fn write_summary(path: &Path, results: &[BatchResult]) -> anyhow::Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let mut wtr = csv::Writer::from_path(path)?;

    wtr.write_record([
        "filename",
        "status",
        "output",
        "items",
        "amount_due",
        "missed",
        "processing_time_ms",
        "error",
    ])?;

    for result in results {
        let filename = result
            .path
            .file_name()
            .and_then(|s| s.to_str())
            .unwrap_or("");

        match &result.processed {
            Some(processed) => {
                let outcome = &processed.outcome;
                wtr.write_record([
                    filename,
                    "success",
                    &outcome.output_name,
                    &outcome.items.len().to_string(),
                    &outcome.totals.amount_due().to_string(),
                    &outcome.report.missed().join(";"),
                    &result.processing_time_ms.to_string(),
                    "",
                ])?;
            }
            None => {
                wtr.write_record([
                    filename,
                    "error",
                    "",
                    "",
                    "",
                    "",
                    &result.processing_time_ms.to_string(),
                    result.error.as_deref().unwrap_or(""),
                ])?;
            }
        }
    }

    wtr.flush()?;
    Ok(())
}
