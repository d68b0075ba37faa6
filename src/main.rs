use anyhow::{bail, Context, Result};
use clap::Parser;
use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::{error, Level};
use tracing_subscriber::FmtSubscriber;

use chat_gallery::config::ConfigFile;
use chat_gallery::utils::osc8_file_link;
use chat_gallery::{Config, Pipeline, RunReport, RunStats};

/// Exit status when some input files had to be skipped
const EXIT_PARTIAL: u8 = 2;
/// Exit status when the input prompt is abandoned
const EXIT_INTERRUPTED: u8 = 130;

#[derive(Parser)]
#[command(name = "chat-gallery")]
#[command(about = "Extract images from HTML chat exports and build a gallery grouped by date")]
#[command(after_help = "Examples:\n  chat-gallery -i /path/to/html/files\n  chat-gallery --input-dir ./html_exports --encoding windows-1251")]
struct Cli {
    /// Path to directory containing HTML files
    #[arg(short, long)]
    input_dir: Option<PathBuf>,

    /// Preferred file encoding (default: utf-8)
    #[arg(short, long)]
    encoding: Option<String>,

    /// Output directory for the generated gallery (default: current directory)
    #[arg(short, long)]
    output_dir: Option<PathBuf>,

    /// CONL config file with encodings and extension lists
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    /// Print the run summary as JSON
    #[arg(long)]
    json: bool,
}

enum Prompt {
    Answered(PathBuf),
    Abandoned,
}

fn prompt_input_dir() -> Result<Prompt> {
    print!("Enter path to input directory: ");
    io::stdout().flush()?;

    let mut line = String::new();
    let read = io::stdin()
        .lock()
        .read_line(&mut line)
        .context("Failed to read input directory from stdin")?;
    if read == 0 {
        return Ok(Prompt::Abandoned);
    }

    let line = line.trim();
    if line.is_empty() {
        bail!("Input directory not specified");
    }
    Ok(Prompt::Answered(PathBuf::from(line)))
}

/// Defaults, then the config file, then command-line flags
fn resolve_config(cli: &Cli) -> Result<Option<Config>> {
    let file = match &cli.config {
        Some(path) => ConfigFile::load(path)?,
        None => ConfigFile::default(),
    };

    let input_dir = match cli.input_dir.clone().or_else(|| file.input_dir.clone()) {
        Some(dir) => dir,
        None => match prompt_input_dir()? {
            Prompt::Answered(dir) => dir,
            Prompt::Abandoned => return Ok(None),
        },
    };

    let mut config = Config::new(&input_dir).apply_file(file);
    config.input_dir = input_dir;
    if let Some(ref encoding) = cli.encoding {
        config.encoding = encoding.clone();
    }
    if let Some(ref dir) = cli.output_dir {
        config.output_dir = dir.clone();
    }
    Ok(Some(config))
}

fn print_counts(stats: &RunStats) {
    println!(
        "✓ Files processed: {} ({} skipped)",
        stats.files_processed, stats.files_skipped
    );
    println!(
        "✓ Total images processed: {} ({} unique)",
        stats.images_found, stats.unique_images
    );
    println!("✓ Date groups created: {}", stats.distinct_dates);
}

fn print_summary(report: &RunReport, json: bool) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(report)?);
        return Ok(());
    }

    println!(
        "\n✓ Gallery successfully created: {}",
        osc8_file_link(&report.output_file)
    );
    print_counts(&report.stats);
    Ok(())
}

/// Counts gathered before the gallery could not be written
fn print_failed_summary(stats: &RunStats, json: bool) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(stats)?);
        return Ok(());
    }

    println!("\n✗ Gallery was not written");
    print_counts(stats);
    Ok(())
}

fn run(cli: Cli) -> Result<ExitCode> {
    let Some(config) = resolve_config(&cli)? else {
        eprintln!("Operation cancelled by user");
        return Ok(ExitCode::from(EXIT_INTERRUPTED));
    };

    let report = match Pipeline::new(&config).run() {
        Ok(report) => report,
        Err(failure) => {
            if let Some(ref stats) = failure.stats {
                print_failed_summary(stats, cli.json)?;
            }
            return Err(failure.into());
        }
    };
    print_summary(&report, cli.json)?;

    if report.stats.is_partial() {
        Ok(ExitCode::from(EXIT_PARTIAL))
    } else {
        Ok(ExitCode::SUCCESS)
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let level = if cli.verbose { Level::DEBUG } else { Level::INFO };
    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_writer(io::stderr)
        .finish();
    if let Err(e) = tracing::subscriber::set_global_default(subscriber) {
        eprintln!("Failed to install logger: {}", e);
    }

    match run(cli) {
        Ok(code) => code,
        Err(e) => {
            error!("{:#}", e);
            ExitCode::FAILURE
        }
    }
}
