//! paper-momentum: Binary Entrypoint
//! Parses the CLI, wires the live adapters and runs one batch job
//! (`score`, `summarize` or `filings`).

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::{NaiveDate, Utc};
use clap::{Args, Parser, Subcommand};
use tracing::{info, warn};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use paper_momentum::config::{self, HttpSettings, DEFAULT_DAYS, DEFAULT_TOP_N};
use paper_momentum::filings::{build_filings, write_filings, AgencyMatcher, DEFAULT_AGENCY_PATTERN};
use paper_momentum::ingest::collect_events;
use paper_momentum::ingest::http::HttpFetcher;
use paper_momentum::ingest::providers::{
    FederalRegisterProvider, OiraProvider, UnifiedAgendaProvider, WhiteHouseProvider,
};
use paper_momentum::ingest::types::{FetchWindow, SourceAdapter};
use paper_momentum::lexicon::load_lexicon_default;
use paper_momentum::pipeline::{self, PipelineOptions};
use paper_momentum::summary::{summarize, write_summary_json};
use paper_momentum::table::{self, read_feature_table, write_file};
use paper_momentum::telemetry::Metrics;

#[derive(Debug, Parser)]
#[command(name = "paper-momentum", version, about = "Regulatory topic-momentum scoring")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Fetch, label, build daily features and score them.
    Score(ScoreArgs),
    /// Summarize a previously written feature table.
    Summarize(SummarizeArgs),
    /// Export a flat, agency-filtered list of filings.
    Filings(FilingsArgs),
}

#[derive(Debug, Args)]
struct WindowArgs {
    /// Trailing window length in days.
    #[arg(long, default_value_t = DEFAULT_DAYS)]
    days: u32,
    /// Lexicon file (TOML, YAML or JSON).
    #[arg(long)]
    lexicon: Option<PathBuf>,
    /// Anchor date, YYYY-MM-DD. Defaults to today (UTC).
    #[arg(long)]
    as_of: Option<NaiveDate>,
}

#[derive(Debug, Args)]
struct ScoreArgs {
    #[command(flatten)]
    window: WindowArgs,
    #[arg(long, default_value = "topic_day.csv")]
    out: PathBuf,
    /// Also write the topic summary JSON here.
    #[arg(long)]
    summary_out: Option<PathBuf>,
    #[arg(long, default_value_t = DEFAULT_TOP_N)]
    top_n: usize,
    /// Write raw_events.csv, events_labeled.csv and features_pre_score.csv here.
    #[arg(long)]
    dump_dir: Option<PathBuf>,
    /// Prometheus text exposition written after the run.
    #[arg(long)]
    metrics_out: Option<PathBuf>,
}

#[derive(Debug, Args)]
struct SummarizeArgs {
    #[arg(long)]
    input: PathBuf,
    #[arg(long)]
    out: PathBuf,
    #[arg(long, default_value_t = DEFAULT_TOP_N)]
    top_n: usize,
}

#[derive(Debug, Args)]
struct FilingsArgs {
    #[command(flatten)]
    window: WindowArgs,
    #[arg(long, default_value = "filings_flat.csv")]
    out: PathBuf,
    /// Pipe-separated agency terms; empty matches every agency.
    #[arg(long, default_value = DEFAULT_AGENCY_PATTERN)]
    agency: String,
    /// Log a sample of agency strings that did not match.
    #[arg(long)]
    debug: bool,
}

fn init_tracing() {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("paper_momentum=info,warn"));

    let registry = tracing_subscriber::registry().with(filter);
    if config::json_logs_enabled() {
        registry
            .with(fmt::layer().json().with_writer(std::io::stderr))
            .init();
    } else {
        registry
            .with(fmt::layer().compact().with_writer(std::io::stderr))
            .init();
    }
}

fn live_adapters(settings: &HttpSettings) -> Result<Vec<Box<dyn SourceAdapter>>> {
    let fetcher = HttpFetcher::new(settings).context("building HTTP client")?;
    let adapters: Vec<Box<dyn SourceAdapter>> = vec![
        Box::new(FederalRegisterProvider::from_http(fetcher.clone())),
        Box::new(OiraProvider::from_http(fetcher.clone())),
        Box::new(UnifiedAgendaProvider::from_http(fetcher.clone(), settings.ua_max_documents)),
        Box::new(WhiteHouseProvider::from_http(fetcher)),
    ];
    Ok(adapters)
}

fn as_of_or_today(as_of: Option<NaiveDate>) -> NaiveDate {
    as_of.unwrap_or_else(|| Utc::now().date_naive())
}

async fn cmd_score(args: ScoreArgs) -> Result<()> {
    let metrics = match &args.metrics_out {
        Some(_) => Some(Metrics::install()?),
        None => None,
    };

    let lexicon = load_lexicon_default(args.window.lexicon.as_deref())?;
    let adapters = live_adapters(&HttpSettings::from_env())?;
    let opts = PipelineOptions {
        as_of: as_of_or_today(args.window.as_of),
        days: args.window.days,
    };

    let run = pipeline::run(&lexicon, &adapters, opts).await;

    write_file(&args.out, |w| table::write_feature_table(w, &run.features))?;
    info!(path = %args.out.display(), rows = run.features.len(), "feature table written");

    if let Some(dir) = &args.dump_dir {
        write_dumps(dir, &run)?;
    }
    if let Some(path) = &args.summary_out {
        write_summary_json(path, &summarize(&run.features, args.top_n))?;
        info!(path = %path.display(), "summary written");
    }
    if let (Some(m), Some(path)) = (&metrics, &args.metrics_out) {
        m.write_textfile(path)?;
    }
    Ok(())
}

fn write_dumps(dir: &Path, run: &pipeline::PipelineRun) -> Result<()> {
    write_file(&dir.join("raw_events.csv"), |w| table::write_raw_events(w, &run.raw))?;
    write_file(&dir.join("events_labeled.csv"), |w| {
        table::write_labeled_events(w, &run.labeled)
    })?;
    write_file(&dir.join("features_pre_score.csv"), |w| {
        table::write_pre_score_table(w, &run.features)
    })?;
    info!(dir = %dir.display(), "dumps written");
    Ok(())
}

fn cmd_summarize(args: SummarizeArgs) -> Result<()> {
    let rows = read_feature_table(&args.input)?;
    if rows.is_empty() {
        warn!(path = %args.input.display(), "feature table has no usable rows");
    }
    write_summary_json(&args.out, &summarize(&rows, args.top_n))?;
    info!(path = %args.out.display(), "summary written");
    Ok(())
}

async fn cmd_filings(args: FilingsArgs) -> Result<()> {
    let lexicon = load_lexicon_default(args.window.lexicon.as_deref())?;
    let keywords = lexicon.all_keywords();
    let adapters = live_adapters(&HttpSettings::from_env())?;
    let window = FetchWindow::new(as_of_or_today(args.window.as_of), args.window.days);

    let events = collect_events(&adapters, &keywords, window).await;
    let export = build_filings(&events, &keywords, &AgencyMatcher::parse(&args.agency));

    write_file(&args.out, |w| write_filings(w, &export.rows))?;
    info!(path = %args.out.display(), rows = export.rows.len(), "filings written");

    if args.debug {
        for agency in &export.unmatched {
            info!(agency = %agency, "unmatched agency");
        }
    }
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    // .env is optional
    let _ = dotenvy::dotenv();
    init_tracing();

    match Cli::parse().command {
        Command::Score(args) => cmd_score(args).await,
        Command::Summarize(args) => cmd_summarize(args),
        Command::Filings(args) => cmd_filings(args).await,
    }
}
