use clap::{Parser, ValueEnum};
use colored::Colorize;
use deadwood::cache::CacheStore;
use deadwood::config::Config;
use deadwood::report::{ReportFormat, Reporter};
use deadwood::scanner::Scanner;
use miette::{IntoDiagnostic, Result, WrapErr};
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::EnvFilter;

/// deadwood - find unreachable files in multi-language monorepos
#[derive(Parser, Debug)]
#[command(name = "deadwood")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Path to the project directory to analyze
    #[arg(default_value = ".")]
    path: PathBuf,

    /// Path to configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Additional exclusion patterns (can be specified multiple times)
    #[arg(short, long)]
    exclude: Vec<String>,

    /// Additional entry point files (can be specified multiple times)
    #[arg(long)]
    entry: Vec<PathBuf>,

    /// Output format
    #[arg(short, long, value_enum)]
    format: Option<OutputFormat>,

    /// Output file (for json/markdown formats)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Disable the parse cache for this run
    #[arg(long)]
    no_cache: bool,

    /// Delete the parse cache before scanning
    #[arg(long)]
    clear_cache: bool,

    /// Worker pool size (default: available parallelism - 1)
    #[arg(short, long)]
    jobs: Option<usize>,

    /// Hide the per-finding evidence details
    #[arg(long)]
    no_evidence: bool,

    /// Exit with a non-zero status when dead files are found (CI use)
    #[arg(long)]
    fail_on_dead: bool,

    /// Verbose logging (or set RUST_LOG)
    #[arg(short, long)]
    verbose: bool,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum OutputFormat {
    Terminal,
    Json,
    Markdown,
}

impl From<OutputFormat> for ReportFormat {
    fn from(format: OutputFormat) -> Self {
        match format {
            OutputFormat::Terminal => ReportFormat::Terminal,
            OutputFormat::Json => ReportFormat::Json,
            OutputFormat::Markdown => ReportFormat::Markdown,
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let default_filter = if cli.verbose {
        "deadwood=debug"
    } else {
        "deadwood=warn"
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter)),
        )
        .with_writer(std::io::stderr)
        .init();

    let root = cli
        .path
        .canonicalize()
        .into_diagnostic()
        .wrap_err_with(|| format!("Project root not found: {}", cli.path.display()))?;

    let mut config = match &cli.config {
        Some(path) => Config::from_file(path)?,
        None => Config::from_default_locations(&root)?,
    };

    config.exclude.extend(cli.exclude.iter().cloned());
    if cli.no_cache {
        config.cache.enabled = false;
    }
    if let Some(jobs) = cli.jobs {
        config.pool.workers = Some(jobs);
    }
    if cli.no_evidence {
        config.report.show_evidence = false;
    }

    if cli.clear_cache {
        let mut store = CacheStore::empty(&root);
        store.clear();
        info!("Cache cleared");
    }

    let format: ReportFormat = match cli.format {
        Some(format) => format.into(),
        None => match config.report.format.as_str() {
            "terminal" => ReportFormat::Terminal,
            "json" => ReportFormat::Json,
            "markdown" => ReportFormat::Markdown,
            other => {
                return Err(miette::miette!("Unknown report format in config: '{}'", other));
            }
        },
    };

    let show_progress = matches!(format, ReportFormat::Terminal);
    let show_evidence = config.report.show_evidence;

    let scanner = Scanner::new(root, config).with_progress(show_progress);
    let result = scanner.scan(&cli.entry)?;

    Reporter::new(format, cli.output.clone(), show_evidence).report(&result)?;

    if cli.fail_on_dead && !result.dead_files.is_empty() {
        eprintln!(
            "{}",
            format!("deadwood: {} dead file(s) found", result.dead_files.len()).red()
        );
        std::process::exit(1);
    }

    Ok(())
}
