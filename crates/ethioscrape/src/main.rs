use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use comfy_table::presets::UTF8_FULL;
use comfy_table::Table;
use ethioscrape_core::collector::{latest_capture, DEFAULT_RAW_DIR};
use ethioscrape_core::config::DEFAULT_CONFIG_PATH;
use ethioscrape_core::table::{
    finalize_table, preprocess_table, DEFAULT_INTERIM_PATH, DEFAULT_PROCESSED_DIR,
    DEFAULT_PROCESSED_FILE, DEFAULT_TEXT_COLUMN,
};
use ethioscrape_core::{
    AppConfig, ChannelResult, CollectionReport, Collector, CollectorConfig, StageReport,
};
use ethioscrape_telegram::TelegramSource;
use ethioscrape_text::PIPELINE_STEPS;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(author, version, about = "Amharic Telegram channel scraper and text preprocessor", long_about = None)]
struct Cli {
    /// Emit logs as JSON lines
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Fetch recent messages from the configured channels into a raw capture
    Collect(CollectArgs),
    /// Clean, normalize and tokenize a raw capture into the interim table
    Preprocess(PreprocessArgs),
    /// Drop the raw text column from the interim table
    Finalize(FinalizeArgs),
    /// Preprocess then finalize
    Run(RunArgs),
    /// List the text pipeline steps in the order they are applied
    Steps,
}

#[derive(Args, Debug)]
struct CollectArgs {
    #[arg(long, default_value = DEFAULT_CONFIG_PATH)]
    config: PathBuf,
    #[arg(long, default_value = DEFAULT_RAW_DIR)]
    output_dir: PathBuf,
}

#[derive(Args, Debug)]
struct PreprocessArgs {
    /// Raw capture to read; defaults to the newest file in data/raw
    #[arg(long)]
    input: Option<PathBuf>,
    #[arg(long, default_value = DEFAULT_INTERIM_PATH)]
    interim: PathBuf,
    #[arg(long, default_value = DEFAULT_TEXT_COLUMN)]
    text_column: String,
}

#[derive(Args, Debug)]
struct FinalizeArgs {
    #[arg(long, default_value = DEFAULT_INTERIM_PATH)]
    interim: PathBuf,
    #[arg(long, default_value = DEFAULT_PROCESSED_DIR)]
    output_dir: PathBuf,
    #[arg(long, default_value = DEFAULT_PROCESSED_FILE)]
    file_name: String,
    #[arg(long, default_value = DEFAULT_TEXT_COLUMN)]
    text_column: String,
}

#[derive(Args, Debug)]
struct RunArgs {
    #[arg(long)]
    input: Option<PathBuf>,
    #[arg(long, default_value = DEFAULT_INTERIM_PATH)]
    interim: PathBuf,
    #[arg(long, default_value = DEFAULT_PROCESSED_DIR)]
    output_dir: PathBuf,
    #[arg(long, default_value = DEFAULT_PROCESSED_FILE)]
    file_name: String,
    #[arg(long, default_value = DEFAULT_TEXT_COLUMN)]
    text_column: String,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();
    init_tracing(cli.json);

    match cli.command {
        Command::Collect(args) => {
            let report = collect(&args).await?;
            print_collection(&report);
        }
        Command::Preprocess(args) => {
            let input = resolve_input(args.input)?;
            let report = preprocess_table(&input, &args.interim, &args.text_column)
                .with_context(|| format!("failed to preprocess {}", input.display()))?;
            print_stages(&[report]);
        }
        Command::Finalize(args) => {
            let report = finalize_table(
                &args.interim,
                &args.output_dir,
                &args.file_name,
                &args.text_column,
            )
            .with_context(|| format!("failed to finalize {}", args.interim.display()))?;
            print_stages(&[report]);
        }
        Command::Run(args) => {
            let input = resolve_input(args.input)?;
            let interim = preprocess_table(&input, &args.interim, &args.text_column)
                .with_context(|| format!("failed to preprocess {}", input.display()))?;
            let processed = finalize_table(
                &args.interim,
                &args.output_dir,
                &args.file_name,
                &args.text_column,
            )
            .with_context(|| format!("failed to finalize {}", args.interim.display()))?;
            print_stages(&[interim, processed]);
        }
        Command::Steps => print_steps(),
    }

    Ok(())
}

fn init_tracing(json: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let builder = tracing_subscriber::fmt().with_env_filter(filter);
    if json {
        builder.json().init();
    } else {
        builder.init();
    }
}

async fn collect(args: &CollectArgs) -> Result<CollectionReport> {
    let config = AppConfig::load(&args.config)
        .with_context(|| format!("failed to load config from {}", args.config.display()))?;

    let source = TelegramSource::connect(&config.telegram)
        .await
        .context("failed to open Telegram session")?;
    info!(channels = config.channels.len(), "Client ready");

    let collector = Collector::new(
        CollectorConfig::from_app(&config, &args.output_dir),
        Arc::new(source),
    );
    collector
        .run()
        .await
        .context("failed to write collected messages")
}

fn resolve_input(input: Option<PathBuf>) -> Result<PathBuf> {
    if let Some(path) = input {
        return Ok(path);
    }
    let raw_dir = Path::new(DEFAULT_RAW_DIR);
    let latest = latest_capture(raw_dir)
        .with_context(|| format!("failed to search {}", raw_dir.display()))?
        .with_context(|| {
            format!(
                "no capture found in {}; run `collect` or pass --input",
                raw_dir.display()
            )
        })?;
    info!(path = %latest.display(), "Using latest raw capture");
    Ok(latest)
}

fn print_collection(report: &CollectionReport) {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_header(vec!["Channel", "Status", "Messages"]);
    for outcome in &report.outcomes {
        let (status, count) = match &outcome.result {
            ChannelResult::Fetched(records) => ("ok".to_string(), records.len().to_string()),
            ChannelResult::Failed(reason) => (format!("failed: {reason}"), "-".to_string()),
        };
        table.add_row(vec![outcome.channel.clone(), status, count]);
    }
    println!("{table}");
    println!(
        "{} messages from {}/{} channels saved to {}",
        report.record_count,
        report.succeeded().count(),
        report.outcomes.len(),
        report.output_path.display()
    );
}

fn print_stages(reports: &[StageReport]) {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_header(vec!["Output", "Rows", "Columns"]);
    for report in reports {
        table.add_row(vec![
            report.path.display().to_string(),
            report.rows.to_string(),
            report.columns.join(", "),
        ]);
    }
    println!("{table}");
}

fn print_steps() {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_header(vec!["#", "Group", "Step"]);
    for (index, step) in PIPELINE_STEPS.iter().enumerate() {
        table.add_row(vec![
            (index + 1).to_string(),
            step.kind().to_string(),
            step.name().to_string(),
        ]);
    }
    println!("{table}");
}
