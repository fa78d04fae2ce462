//! # edgar-qa CLI (`eqa`)
//!
//! The `eqa` binary is the process entry point for edgar-qa: database
//! initialization, corpus ingestion, question answering, and index
//! statistics. All pipeline logic lives in the library crates; the
//! binary parses arguments, loads configuration, wires the backends
//! together, and prints results.
//!
//! ## Usage
//!
//! ```bash
//! eqa --config ./config/eqa.toml <command>
//! ```
//!
//! | Command | Description |
//! |---------|-------------|
//! | `eqa init` | Create the SQLite index and run schema migrations |
//! | `eqa ingest` | Clean, chunk, embed, and index the raw corpus |
//! | `eqa query "<question>"` | Ask a question, optionally scoped to one ticker |
//! | `eqa stats` | Show index size and configured models |
//! | `eqa companies` | List the tracked entity catalog |

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use edgar_qa::api::{QueryRequest, QueryResponse};
use edgar_qa::catalog::TRACKED_TICKERS;
use edgar_qa::config::{load_config, Config};
use edgar_qa::embedding::create_embedder;
use edgar_qa::generate::OllamaGenerator;
use edgar_qa::ingest::run_ingest;
use edgar_qa::progress::ProgressMode;
use edgar_qa::sqlite_index::SqliteIndex;
use edgar_qa::{db, migrate};
use edgar_qa_core::engine::RagEngine;
use edgar_qa_core::index::VectorIndex;

/// edgar-qa CLI: ask questions over SEC filings, grounded in the
/// passages that answer them.
#[derive(Parser)]
#[command(
    name = "eqa",
    about = "edgar-qa — retrieval-grounded question answering over SEC filings",
    version
)]
struct Cli {
    /// Path to configuration file (TOML).
    #[arg(long, global = true, default_value = "./config/eqa.toml")]
    config: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Initialize the index database schema. Idempotent.
    Init,

    /// Ingest the raw filing corpus: clean, chunk, embed, index.
    Ingest {
        /// Show document and chunk counts without writing anything.
        #[arg(long)]
        dry_run: bool,

        /// Progress output: auto (TTY-detected), human, json, or off.
        #[arg(long, default_value = "auto")]
        progress: String,
    },

    /// Ask a question over the indexed corpus.
    Query {
        /// The question to answer.
        question: String,

        /// Restrict retrieval to one ticker, e.g. AAPL.
        #[arg(long)]
        ticker: Option<String>,

        /// Number of passages to retrieve (defaults to retrieval.top_k).
        #[arg(long)]
        k: Option<usize>,

        /// Emit the full response as JSON instead of text.
        #[arg(long)]
        json: bool,
    },

    /// Show index record count and configured models.
    Stats,

    /// List the tracked entity catalog.
    Companies,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config = load_config(&cli.config)?;

    match cli.command {
        Commands::Init => init(&config).await,
        Commands::Ingest { dry_run, progress } => ingest(&config, dry_run, &progress).await,
        Commands::Query {
            question,
            ticker,
            k,
            json,
        } => {
            let request = QueryRequest {
                question,
                ticker,
                n_results: k.unwrap_or(config.retrieval.top_k),
            };
            query(&config, request, json).await
        }
        Commands::Stats => stats(&config).await,
        Commands::Companies => {
            for ticker in TRACKED_TICKERS {
                println!("{ticker}");
            }
            Ok(())
        }
    }
}

async fn init(config: &Config) -> Result<()> {
    let pool = db::connect(&config.paths.db_path).await?;
    migrate::run_migrations(&pool).await?;
    pool.close().await;
    println!("initialized {}", config.paths.db_path.display());
    Ok(())
}

async fn ingest(config: &Config, dry_run: bool, progress: &str) -> Result<()> {
    let pool = db::connect(&config.paths.db_path).await?;
    migrate::run_migrations(&pool).await?;

    let embedder = create_embedder(&config.embedding)?;
    let index = SqliteIndex::new(pool);
    let mode = match progress {
        "auto" => ProgressMode::default_for_tty(),
        "human" => ProgressMode::Human,
        "json" => ProgressMode::Json,
        "off" => ProgressMode::Off,
        other => anyhow::bail!("Unknown progress mode: {}. Use auto, human, json, or off.", other),
    };
    let reporter = mode.reporter();

    let summary = run_ingest(config, embedder.as_ref(), &index, reporter.as_ref(), dry_run).await?;

    if dry_run {
        println!("ingest (dry-run)");
    } else {
        println!("ingest");
    }
    println!("  documents processed: {}", summary.documents);
    println!("  documents skipped: {}", summary.skipped);
    println!("  chunks written: {}", summary.chunks);
    if !dry_run {
        println!("  records in index: {}", summary.indexed);
    }
    println!("ok");

    index.pool().close().await;
    Ok(())
}

async fn query(config: &Config, request: QueryRequest, as_json: bool) -> Result<()> {
    let pool = db::connect(&config.paths.db_path).await?;
    let embedder = create_embedder(&config.embedding)?;
    let generator = Arc::new(OllamaGenerator::new(&config.generation)?);
    let index: Arc<dyn VectorIndex> = Arc::new(SqliteIndex::new(pool));

    let engine = RagEngine::new(embedder, index, generator);
    let record = engine
        .query(
            &request.question,
            request.ticker.as_deref(),
            request.n_results,
        )
        .await?;

    let response = QueryResponse::from_record(record);

    if as_json {
        println!("{}", serde_json::to_string_pretty(&response)?);
        return Ok(());
    }

    println!("{}", response.answer);
    if response.sources.is_empty() {
        println!("\nNo sources retrieved.");
    } else {
        println!("\nSources:");
        for (i, source) in response.sources.iter().enumerate() {
            println!(
                "  {}. {} {}: {}",
                i + 1,
                source.ticker,
                source.filing_type,
                source.text
            );
        }
    }
    Ok(())
}

async fn stats(config: &Config) -> Result<()> {
    let pool = db::connect(&config.paths.db_path).await?;
    let index = SqliteIndex::new(pool);
    let count = index.count().await?;

    println!("records indexed: {}", count);
    println!(
        "embedding model: {} ({} dims, {})",
        config.embedding.model, config.embedding.dims, config.embedding.provider
    );
    println!("generation model: {}", config.generation.model);
    println!("database: {}", config.paths.db_path.display());

    index.pool().close().await;
    Ok(())
}
