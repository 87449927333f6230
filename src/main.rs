use anyhow::Context;
use clap::{Args, Parser, Subcommand, ValueEnum};
use serde::Serialize;
use std::path::PathBuf;
use std::time::{Duration, Instant};
use tracing::{debug, warn};
use tracing_subscriber::EnvFilter;

use dongjeop::config::Config;
use dongjeop::images::{image_url, ImageNamespace};
use dongjeop::output::{self, ScoredJson, ScoredRecord};
use dongjeop::query::{paginate, run_query, MinScore, Page, PageRequest, RecordFilter};
use dongjeop::records::{
    AccessibilityRecord, ChairType, RecordKind, ReviewStatus, SourceRecord, WidthClass,
};
use dongjeop::review::{self, ReviewedFilter};
use dongjeop::scoring::{calculate_score, recommend, Recommendation, ScoreResult, ScoringConfig};
use dongjeop::source::{self, CacheConfig, DataSource};

const EXIT_SUCCESS: i32 = 0;
const EXIT_DATA: i32 = 2;
const EXIT_NOT_FOUND: i32 = 3;
const EXIT_CONFIG: i32 = 4;

#[derive(ValueEnum, Clone, Copy, Debug, Default, PartialEq, Eq)]
enum OutputFormat {
    #[default]
    Table,
    Tsv,
    Json,
}

/// Record criteria shared by `list` and `queue`
#[derive(Args, Debug, Default)]
struct FilterArgs {
    /// Only records with (true) or without (false) an entrance step
    #[arg(long)]
    has_step: Option<bool>,

    /// Passage width category: wide, normal, narrow, not_passable
    #[arg(long)]
    width: Option<WidthClass>,

    /// Chair type that must be present: movable, high_movable, fixed, floor
    #[arg(long)]
    chair: Option<ChairType>,

    /// Score bucket: 90, 75, 50 (at least) or 25 (below)
    #[arg(long)]
    min_score: Option<MinScore>,

    /// Case-insensitive file path substring
    #[arg(long)]
    search: Option<String>,

    /// Only records that do (true) or do not (false) look mislabeled
    #[arg(long)]
    needs_relabeling: Option<bool>,
}

impl FilterArgs {
    fn into_filter(self) -> RecordFilter {
        RecordFilter {
            has_step: self.has_step,
            width_class: self.width,
            chair_type: self.chair,
            min_score: self.min_score,
            search: self.search,
            needs_relabeling: self.needs_relabeling,
        }
    }
}

#[derive(Args, Debug, Default)]
struct PageArgs {
    /// Rows to skip
    #[arg(long, default_value_t = 0)]
    skip: usize,

    /// Rows per page, 1 to 100 (defaults to page_size from config, else 20)
    #[arg(long, value_parser = clap::value_parser!(u16).range(1..=100))]
    limit: Option<u16>,

    /// Output format
    #[arg(long, value_enum, default_value_t = OutputFormat::Table)]
    format: OutputFormat,
}

impl PageArgs {
    fn request(&self, config: &Config) -> PageRequest {
        PageRequest {
            skip: self.skip,
            limit: self
                .limit
                .map(usize::from)
                .unwrap_or_else(|| config.page_size()),
        }
    }
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Headline numbers for the dataset
    Summary {
        #[arg(long)]
        json: bool,
    },
    /// Full counts per label and grade
    Stats {
        #[arg(long)]
        json: bool,
    },
    /// List scored records (default if no subcommand)
    List {
        #[command(flatten)]
        filter: FilterArgs,
        #[command(flatten)]
        page: PageArgs,
    },
    /// Show one record with its score breakdown and recommendations
    Show {
        file_path: String,
        #[arg(long)]
        json: bool,
    },
    /// Open a record's image in the browser
    Open { file_path: String },
    /// List photo-collection batches
    Batches {
        #[arg(long)]
        json: bool,
    },
    /// List the images of one batch
    Batch {
        name: String,
        #[arg(long)]
        json: bool,
        /// Print image URLs instead of paths
        #[arg(long)]
        urls: bool,
    },
    /// Records waiting for review
    Queue {
        #[command(flatten)]
        filter: FilterArgs,
        #[command(flatten)]
        page: PageArgs,
    },
    /// Records already reviewed, newest first
    Reviewed {
        /// Only reviews newer than this (e.g. 7d, 12h)
        #[arg(long, value_parser = humantime::parse_duration)]
        since: Option<Duration>,
        #[arg(long)]
        reviewer: Option<String>,
        /// approved, on_hold or discarded
        #[arg(long)]
        status: Option<ReviewStatus>,
        #[arg(long)]
        search: Option<String>,
        #[command(flatten)]
        page: PageArgs,
    },
    /// Mark records as reviewed
    Complete {
        #[arg(required = true)]
        paths: Vec<String>,
        #[arg(long)]
        reviewer: Option<String>,
        #[arg(long, default_value = "approved")]
        status: ReviewStatus,
        #[arg(long)]
        note: Option<String>,
    },
    /// Send records to the review queue
    Flag {
        #[arg(required = true)]
        paths: Vec<String>,
        #[arg(long)]
        reason: Option<String>,
    },
}

#[derive(Parser, Debug)]
#[command(name = "dongjeop")]
#[command(about = "Store accessibility survey scoring and review CLI", long_about = None)]
#[command(version)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Path to config file (defaults to ~/.config/dongjeop/config.yaml)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Dataset path or URL, overriding sources.dataset
    #[arg(long, global = true)]
    data: Option<String>,

    /// Bypass the download cache for this run
    #[arg(long, global = true)]
    no_cache: bool,

    /// Remove all cached downloads before running
    #[arg(long, global = true)]
    clear_cache: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

/// Why a command did not succeed
enum Failure {
    NotFound(String),
    Data(anyhow::Error),
}

impl From<anyhow::Error> for Failure {
    fn from(err: anyhow::Error) -> Self {
        Failure::Data(err)
    }
}

struct App {
    config: Config,
    scoring: ScoringConfig,
    cache: CacheConfig,
    dataset: DataSource,
    use_colors: bool,
}

impl App {
    fn review_state_path(&self) -> PathBuf {
        self.config
            .review_state
            .clone()
            .unwrap_or_else(dongjeop::config::get_review_state_path)
    }
}

/// Records of each source a command needs
#[derive(Default)]
struct Loaded {
    dataset: Vec<SourceRecord>,
    reviewed: Vec<SourceRecord>,
    queue: Vec<SourceRecord>,
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "warn,dongjeop=debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

#[tokio::main]
async fn main() {
    // Install rustls crypto provider (required for rustls 0.23+)
    let _ = rustls::crypto::ring::default_provider().install_default();

    let cli = Cli::parse();
    init_tracing(cli.verbose);
    let start_time = Instant::now();

    let command = cli.command.unwrap_or(Commands::List {
        filter: FilterArgs::default(),
        page: PageArgs::default(),
    });

    let config = match dongjeop::config::load_config(cli.config) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Config error: {:#}", e);
            std::process::exit(EXIT_CONFIG);
        }
    };

    // Validate scoring config at startup
    let scoring = config.scoring.clone().unwrap_or_default();
    if let Err(errors) = dongjeop::scoring::validate_scoring(&scoring) {
        eprintln!("Scoring config errors:");
        for error in errors {
            eprintln!("  - {}", error);
        }
        std::process::exit(EXIT_CONFIG);
    }

    let cache = CacheConfig {
        enabled: !cli.no_cache,
        path: source::get_cache_path(),
    };
    if cli.clear_cache {
        match source::clear_cache(&cache) {
            Ok(()) => debug!(path = %cache.path.display(), "cache cleared"),
            Err(e) => eprintln!("Failed to clear cache: {:#}", e),
        }
    }

    let dataset = DataSource::parse(cli.data.as_deref().unwrap_or(config.sources.dataset()));
    debug!(dataset = %dataset, cache = cache.enabled, "starting");

    let app = App {
        config,
        scoring,
        cache,
        dataset,
        use_colors: output::should_use_colors(),
    };

    let code = match run(command, &app).await {
        Ok(()) => EXIT_SUCCESS,
        Err(Failure::NotFound(what)) => {
            eprintln!("Not found: {}", what);
            EXIT_NOT_FOUND
        }
        Err(Failure::Data(e)) => {
            eprintln!("Error: {:#}", e);
            EXIT_DATA
        }
    };

    debug!(elapsed = ?start_time.elapsed(), "done");
    std::process::exit(code);
}

async fn run(command: Commands, app: &App) -> Result<(), Failure> {
    match command {
        Commands::Summary { json } => {
            let loaded = load_sources(app, false, false).await?;
            let summary = dongjeop::stats::summarize(&loaded.dataset, &app.scoring);
            if json {
                print_json(&summary)?;
            } else {
                println!("{}", output::format_summary(&summary, app.use_colors));
            }
        }

        Commands::Stats { json } => {
            let loaded = load_sources(app, false, false).await?;
            let stats = dongjeop::stats::compute_statistics(&loaded.dataset, &app.scoring);
            if json {
                print_json(&stats)?;
            } else {
                println!("{}", output::format_statistics(&stats));
            }
        }

        Commands::List { filter, page } => {
            let loaded = load_sources(app, false, false).await?;
            let result = run_query(
                &loaded.dataset,
                &filter.into_filter(),
                page.request(&app.config),
                &app.scoring,
            );
            render_page(app, result, page.format, |_| None)?;
        }

        Commands::Show { file_path, json } => {
            let loaded = load_sources(app, true, true).await?;
            let item = find_record(&loaded, &file_path)
                .ok_or_else(|| Failure::NotFound(file_path.clone()))?;
            let result = calculate_score(item.record(), &app.scoring);
            let recommendations = recommend(item.record());
            let url = image_url(&app.config.images, item.namespace(), item.file_path());

            if json {
                print_json(&DetailJson {
                    item,
                    result: &result,
                    recommendations: &recommendations,
                    image_url: url,
                })?;
            } else {
                println!(
                    "{}",
                    output::format_detail(item, &result, &recommendations, &url, app.use_colors)
                );
            }
        }

        Commands::Open { file_path } => {
            let loaded = load_sources(app, true, true).await?;
            let item = find_record(&loaded, &file_path)
                .ok_or_else(|| Failure::NotFound(file_path.clone()))?;
            let url = image_url(&app.config.images, item.namespace(), item.file_path());
            dongjeop::browser::open_url(&url)?;
            println!("Opened {}", url);
        }

        Commands::Batches { json } => {
            let dir = app.config.sources.collections_dir();
            let batches = dongjeop::collections::list_batches(&dir)?;
            if json {
                print_json(&batches)?;
            } else {
                println!("{}", output::format_batches(&batches));
            }
        }

        Commands::Batch { name, json, urls } => {
            let dir = app.config.sources.collections_dir();
            let batch = dongjeop::collections::batch_images(&dir, &name)?
                .ok_or_else(|| Failure::NotFound(format!("batch {}", name)))?;
            let image_urls: Vec<String> = batch
                .images
                .iter()
                .map(|path| image_url(&app.config.images, ImageNamespace::Batch, path))
                .collect();

            if json {
                print_json(&BatchJson {
                    batch: &batch,
                    image_urls,
                })?;
            } else {
                let shown = urls.then_some(image_urls.as_slice());
                println!("{}", output::format_batch(&batch, shown));
            }
        }

        Commands::Queue { filter, page } => {
            let loaded = load_sources(app, false, true).await?;
            let state = review::load_review_state(&app.review_state_path())?;
            let pending = review::review_queue(loaded.queue, &loaded.dataset, &state);
            let result = run_query(
                &pending,
                &filter.into_filter(),
                page.request(&app.config),
                &app.scoring,
            );
            render_page(app, result, page.format, output::format_queue_tag)?;
        }

        Commands::Reviewed {
            since,
            reviewer,
            status,
            search,
            page,
        } => {
            let loaded = load_sources(app, true, false).await?;
            let state = review::load_review_state(&app.review_state_path())?;
            let now = chrono::Utc::now();
            let filter = ReviewedFilter {
                since,
                reviewer,
                status,
                search,
            };
            let list = filter.apply(
                review::reviewed_list(loaded.reviewed, &loaded.dataset, &state),
                now,
            );
            let result = paginate(list.iter().collect(), page.request(&app.config));
            render_page(app, result, page.format, |item| {
                output::format_reviewed_tag(item, now)
            })?;
        }

        Commands::Complete {
            paths,
            reviewer,
            status,
            note,
        } => {
            let path = app.review_state_path();
            let mut state = review::load_review_state(&path)?;
            let count = paths.len();
            for file_path in paths {
                state.complete(file_path, reviewer.clone(), status, note.clone());
            }
            review::save_review_state(&path, &state)?;
            println!("Completed {} record(s) as {}", count, status);
        }

        Commands::Flag { paths, reason } => {
            let loaded = load_sources(app, false, false).await?;
            for unknown in review::unknown_paths(&paths, &loaded.dataset) {
                warn!(path = unknown, "not in the dataset, it will not show up in the queue");
            }

            let path = app.review_state_path();
            let mut state = review::load_review_state(&path)?;
            let count = paths.len();
            for file_path in paths {
                state.flag(file_path, reason.clone());
            }
            review::save_review_state(&path, &state)?;
            println!("Flagged {} record(s) for review", count);
        }
    }

    Ok(())
}

/// Load the dataset plus the optional reviewed and queue sources, concurrently
async fn load_sources(app: &App, reviewed: bool, queue: bool) -> anyhow::Result<Loaded> {
    let sources = &app.config.sources;
    let mut requests = vec![(app.dataset.clone(), RecordKind::Raw)];
    if let (true, Some(location)) = (reviewed, sources.reviewed.as_deref()) {
        requests.push((DataSource::parse(location), RecordKind::Reviewed));
    }
    if let (true, Some(location)) = (queue, sources.queue.as_deref()) {
        requests.push((DataSource::parse(location), RecordKind::QueuePending));
    }

    let results = source::load_many(&requests, &app.cache).await?;
    let mut loaded = Loaded::default();
    for ((_, kind), records) in requests.iter().zip(results) {
        match kind {
            RecordKind::Raw => loaded.dataset = records,
            RecordKind::Reviewed => loaded.reviewed = records,
            RecordKind::QueuePending => loaded.queue = records,
        }
    }
    Ok(loaded)
}

/// First record with this path: dataset, then reviewed, then queue
fn find_record<'a>(loaded: &'a Loaded, file_path: &str) -> Option<&'a SourceRecord> {
    loaded
        .dataset
        .iter()
        .chain(&loaded.reviewed)
        .chain(&loaded.queue)
        .find(|item| item.file_path() == file_path)
}

#[derive(Serialize)]
struct DetailJson<'a> {
    #[serde(flatten)]
    item: &'a SourceRecord,
    #[serde(flatten)]
    result: &'a ScoreResult,
    recommendations: &'a [Recommendation],
    image_url: String,
}

#[derive(Serialize)]
struct BatchJson<'a> {
    #[serde(flatten)]
    batch: &'a dongjeop::collections::Batch,
    image_urls: Vec<String>,
}

fn print_json<T: Serialize + ?Sized>(value: &T) -> anyhow::Result<()> {
    let json = serde_json::to_string_pretty(value).context("Failed to serialize output")?;
    println!("{}", json);
    Ok(())
}

fn render_page<T>(
    app: &App,
    page: Page<&T>,
    format: OutputFormat,
    tag: impl Fn(&T) -> Option<String>,
) -> anyhow::Result<()>
where
    T: AsRef<AccessibilityRecord> + Serialize,
{
    if format == OutputFormat::Json {
        let scored = page.map(|item| {
            let result = calculate_score(item.as_ref(), &app.scoring);
            ScoredJson {
                item,
                score: result.score,
                grade: result.grade,
            }
        });
        return print_json(&scored);
    }

    let rows: Vec<ScoredRecord> = page
        .items
        .iter()
        .map(|item| ScoredRecord {
            record: (*item).as_ref(),
            result: calculate_score((*item).as_ref(), &app.scoring),
            tag: tag(*item),
        })
        .collect();

    if format == OutputFormat::Tsv {
        if !rows.is_empty() {
            println!("{}", output::format_tsv(&rows));
        }
        return Ok(());
    }

    println!(
        "{}",
        output::format_scored_table(&rows, page.skip.saturating_add(1), app.use_colors)
    );
    if page.total > 0 {
        println!();
        println!(
            "{}",
            output::format_page_footer(page.total, page.skip, rows.len())
        );
    }
    Ok(())
}
