//! RegimeLab CLI: download, run, and cache management commands.
//!
//! Commands:
//! - `download`: fetch index prices from Yahoo Finance and cache as Parquet
//! - `run`: run the presidency study from a TOML config (or defaults)
//! - `cache status`: report cache size, symbol count, date ranges

use anyhow::{bail, Context, Result};
use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use regimelab_core::data::{
    download_symbols, CircuitBreaker, CsvProvider, DataProvider, ParquetCache, StdoutProgress,
    YahooProvider,
};
use regimelab_runner::{
    export_study, load_study_presidents, run_study, LoadOptions, StudyConfig, StudyResult,
    TextReportGenerator,
};

const DEFAULT_CACHE_DIR: &str = "data/cache";

#[derive(Parser)]
#[command(
    name = "regimelab",
    about = "RegimeLab CLI: index returns under Republican and Democratic presidencies"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Download index prices from Yahoo Finance and cache as Parquet.
    Download {
        /// Symbols to download (e.g., ^DJI ^GSPC).
        #[arg(required = true)]
        symbols: Vec<String>,

        /// Start date (YYYY-MM-DD). Defaults to 1920-01-01.
        #[arg(long)]
        start: Option<String>,

        /// End date (YYYY-MM-DD). Defaults to today.
        #[arg(long)]
        end: Option<String>,

        /// Force re-download even if cached.
        #[arg(long, default_value_t = false)]
        force: bool,

        /// Cache directory.
        #[arg(long, default_value = DEFAULT_CACHE_DIR)]
        cache_dir: PathBuf,
    },
    /// Run the presidency study.
    Run {
        /// Path to a TOML study config. Defaults are used without one.
        #[arg(long)]
        config: Option<PathBuf>,

        /// Presidency table CSV (overrides the config).
        #[arg(long)]
        presidents: Option<PathBuf>,

        /// Start date (YYYY-MM-DD, overrides the config).
        #[arg(long)]
        start: Option<String>,

        /// End date (YYYY-MM-DD, overrides the config).
        #[arg(long)]
        end: Option<String>,

        /// Offline mode: no network access.
        #[arg(long, default_value_t = false)]
        offline: bool,

        /// Use synthetic data as fallback.
        #[arg(long, default_value_t = false)]
        synthetic: bool,

        /// Read prices from CSV exports in this directory instead of Yahoo Finance.
        #[arg(long)]
        csv_dir: Option<PathBuf>,

        /// Cache directory.
        #[arg(long, default_value = DEFAULT_CACHE_DIR)]
        cache_dir: PathBuf,

        /// Output directory for study artifacts (overrides the config).
        #[arg(long)]
        output_dir: Option<PathBuf>,

        /// Skip SVG charts.
        #[arg(long, default_value_t = false)]
        no_chart: bool,
    },
    /// Cache management commands.
    Cache {
        #[command(subcommand)]
        action: CacheAction,
    },
}

#[derive(Subcommand)]
enum CacheAction {
    /// Report cache size, symbol count, and date ranges.
    Status {
        /// Cache directory.
        #[arg(long, default_value = DEFAULT_CACHE_DIR)]
        cache_dir: PathBuf,
    },
}

/// Arguments of the `run` command.
struct RunArgs {
    config: Option<PathBuf>,
    presidents: Option<PathBuf>,
    start: Option<String>,
    end: Option<String>,
    offline: bool,
    synthetic: bool,
    csv_dir: Option<PathBuf>,
    cache_dir: PathBuf,
    output_dir: Option<PathBuf>,
    no_chart: bool,
}

fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "regimelab=info".into()),
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Download {
            symbols,
            start,
            end,
            force,
            cache_dir,
        } => run_download(symbols, start, end, force, cache_dir),
        Commands::Run {
            config,
            presidents,
            start,
            end,
            offline,
            synthetic,
            csv_dir,
            cache_dir,
            output_dir,
            no_chart,
        } => run_study_cmd(RunArgs {
            config,
            presidents,
            start,
            end,
            offline,
            synthetic,
            csv_dir,
            cache_dir,
            output_dir,
            no_chart,
        }),
        Commands::Cache { action } => match action {
            CacheAction::Status { cache_dir } => run_cache_status(&cache_dir),
        },
    }
}

fn parse_date(raw: Option<&str>) -> Result<Option<NaiveDate>> {
    raw.map(|s| {
        NaiveDate::parse_from_str(s, "%Y-%m-%d")
            .with_context(|| format!("invalid date '{s}', expected YYYY-MM-DD"))
    })
    .transpose()
}

fn today() -> NaiveDate {
    chrono::Local::now().date_naive()
}

fn run_download(
    symbols: Vec<String>,
    start: Option<String>,
    end: Option<String>,
    force: bool,
    cache_dir: PathBuf,
) -> Result<()> {
    let start_date = parse_date(start.as_deref())?.unwrap_or(StudyConfig::default().study.start);
    let end_date = parse_date(end.as_deref())?.unwrap_or_else(today);
    if end_date < start_date {
        bail!("end date {end_date} is before start date {start_date}");
    }

    let circuit_breaker = Arc::new(CircuitBreaker::default_provider());
    let provider = YahooProvider::new(circuit_breaker)?;
    let cache = ParquetCache::new(cache_dir);
    let progress = StdoutProgress;

    let sym_refs: Vec<&str> = symbols.iter().map(|s| s.as_str()).collect();

    let summary = download_symbols(
        &provider, &cache, &sym_refs, start_date, end_date, force, &progress,
    );

    if !summary.all_succeeded() {
        for (sym, err) in &summary.errors {
            eprintln!("Error for {sym}: {err}");
        }
        std::process::exit(1);
    }

    Ok(())
}

fn run_study_cmd(args: RunArgs) -> Result<()> {
    if args.offline && args.csv_dir.is_some() {
        bail!("--offline and --csv-dir are mutually exclusive");
    }

    let mut config = match &args.config {
        Some(path) => StudyConfig::from_file(path)?,
        None => StudyConfig::default(),
    };

    // CLI flags override the config file.
    if let Some(presidents) = args.presidents {
        config.study.presidents = presidents;
    }
    if let Some(start) = parse_date(args.start.as_deref())? {
        config.study.start = start;
    }
    if let Some(end) = parse_date(args.end.as_deref())? {
        config.study.end = Some(end);
    }
    if let Some(output_dir) = args.output_dir {
        config.output.dir = output_dir;
    }
    if args.no_chart {
        config.output.charts = false;
    }
    config.validate()?;

    let records = load_study_presidents(&config)?;

    let provider: Option<Box<dyn DataProvider>> = match (&args.csv_dir, args.offline) {
        (Some(dir), _) => Some(Box::new(CsvProvider::new(dir))),
        (None, false) => Some(Box::new(YahooProvider::new(Arc::new(
            CircuitBreaker::default_provider(),
        ))?)),
        (None, true) => None,
    };

    let opts = LoadOptions {
        start: config.study.start,
        end: config.end_date(today()),
        offline: args.offline,
        synthetic: args.synthetic,
        force: false,
    };
    let cache = ParquetCache::new(&args.cache_dir);

    tracing::info!(
        start = %opts.start,
        end = %opts.end,
        indices = config.indices.len(),
        "running study"
    );
    let result = run_study(&config, &records, &cache, provider.as_deref(), &opts)?;

    print!("{}", TextReportGenerator.generate(&result));

    let paths = export_study(&config.output.dir, &result, config.output.charts)?;
    print_summary(&result, &paths.run_dir);

    Ok(())
}

fn run_cache_status(cache_dir: &Path) -> Result<()> {
    if !cache_dir.exists() {
        println!("Cache directory does not exist: {}", cache_dir.display());
        return Ok(());
    }

    let cache = ParquetCache::new(cache_dir);
    let metas = cache.list()?;

    if metas.is_empty() {
        println!("Cache is empty: {}", cache_dir.display());
        return Ok(());
    }

    let mut total_size: u64 = 0;
    let mut rows: Vec<(String, String, String, String, u64)> = Vec::new();
    for meta in &metas {
        let size = dir_size(&cache_dir.join(format!("symbol={}", meta.symbol)));
        total_size += size;
        rows.push((
            meta.symbol.clone(),
            format!("{} to {}", meta.start_date, meta.end_date),
            format!("{} days", meta.point_count),
            format!("{:?}", meta.source),
            size,
        ));
    }

    println!("Cache: {}", cache_dir.display());
    println!("Symbols: {}", metas.len());
    println!("Total size: {}", format_size(total_size));
    println!();
    println!(
        "{:<8} {:<25} {:<12} {:<13} {:>10}",
        "Symbol", "Date Range", "Points", "Source", "Size"
    );
    println!("{}", "-".repeat(72));
    for (sym, range, points, source, size) in &rows {
        println!(
            "{:<8} {:<25} {:<12} {:<13} {:>10}",
            sym,
            range,
            points,
            source,
            format_size(*size)
        );
    }

    Ok(())
}

fn dir_size(path: &Path) -> u64 {
    let mut size = 0u64;
    if let Ok(entries) = std::fs::read_dir(path) {
        for entry in entries.flatten() {
            if let Ok(meta) = entry.metadata() {
                size += meta.len();
            }
        }
    }
    size
}

fn format_size(bytes: u64) -> String {
    if bytes < 1024 {
        format!("{bytes} B")
    } else if bytes < 1024 * 1024 {
        format!("{:.1} KB", bytes as f64 / 1024.0)
    } else {
        format!("{:.1} MB", bytes as f64 / (1024.0 * 1024.0))
    }
}

fn print_summary(result: &StudyResult, run_dir: &Path) {
    println!();
    println!("=== Study ===");
    println!("Study ID:       {}", result.study_id);
    for index in &result.indices {
        println!(
            "{:<15} {} ({:?}, {} trading days, {} years)",
            format!("{}:", index.label),
            index.symbol,
            index.source,
            index.trading_days,
            index.yearly.len()
        );
    }
    println!("Terms:          {}", result.terms.len());
    println!("Artifacts:      {}", run_dir.display());
    if result.has_synthetic {
        println!();
        println!("WARNING: Results based on SYNTHETIC data");
    }
    println!();
}
