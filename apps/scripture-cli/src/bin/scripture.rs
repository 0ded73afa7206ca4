//! `scripture` command-line front end.
//!
//! ```bash
//! scripture shards
//! scripture query "what is my duty" --shard gita_arnold --json
//! scripture passage "BG 2.47"
//! ```

use std::sync::Arc;
use std::time::Duration;

use anyhow::{bail, Context};
use clap::{Parser, Subcommand};
use indicatif::{ProgressBar, ProgressStyle};
use tracing::{info, warn};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use scripture_core::config::{Config, Settings};
use scripture_core::tuning::RetrievalOptions;
use scripture_core::types::{ContextPassage, ShardId};
use scripture_embed::get_default_embedder;
use scripture_hybrid::{CorpusStore, Retrieval, Selection};
use scripture_vector::FsShardSource;

const SNIPPET_CHARS: usize = 150;

#[derive(Parser)]
#[command(name = "scripture", about = "Hybrid retrieval over scripture shards", version)]
struct Cli {
    /// Shard directory; overrides `data.root`
    #[arg(long, global = true)]
    root: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// List the shards found under the data root
    Shards,
    /// Retrieve the passages that best answer a question
    Query {
        query: String,
        /// Shards to search; defaults to `data.default_shards`
        #[arg(long = "shard")]
        shards: Vec<String>,
        /// Print context passages as JSON
        #[arg(long)]
        json: bool,
        #[arg(long)]
        k_vector: Option<usize>,
        #[arg(long)]
        k_lexical: Option<usize>,
        #[arg(long)]
        top_final: Option<usize>,
    },
    /// Print the full text of a passage by reference
    Passage {
        reference: String,
        #[arg(long = "shard")]
        shards: Vec<String>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(EnvFilter::from_default_env())
        .try_init()
        .ok();

    let cli = Cli::parse();
    let config = Config::load().context("loading configuration")?;
    let mut settings = config.settings()?;
    if let Some(root) = cli.root {
        settings.data.root = root;
    }
    let root = settings.data.root_dir(&std::env::current_dir()?);
    let source = FsShardSource::new(root);

    match cli.command {
        Command::Shards => {
            let found = source.discover();
            if found.is_empty() {
                println!("no shards under {}", source.root().display());
            }
            for name in found {
                let marker = if settings.data.default_shards.contains(&name) { " (default)" } else { "" };
                println!("{name}{marker}");
            }
        }
        Command::Query { query, shards, json, k_vector, k_lexical, top_final } => {
            let options = RetrievalOptions {
                k_vector: k_vector.unwrap_or(settings.retrieval.k_vector),
                k_lexical: k_lexical.unwrap_or(settings.retrieval.k_lexical),
                top_final: top_final.unwrap_or(settings.retrieval.top_final),
            };
            options.validate()?;

            let store = open_store(source, &settings, shards).await?;
            let embedder = get_default_embedder();
            let results = match store.retrieve(&query, embedder.as_ref(), &options).await? {
                Retrieval::NotReady => bail!("no shard could be loaded, nothing to search"),
                Retrieval::Ready(results) => results,
            };

            if json {
                let passages: Vec<ContextPassage> = results.iter().map(ContextPassage::from).collect();
                println!("{}", serde_json::to_string_pretty(&passages)?);
                return Ok(());
            }
            if results.is_empty() {
                println!("No passages found for \"{query}\"");
            }
            for (i, hit) in results.iter().enumerate() {
                println!(
                    "{:>2}. {}  {}  score={:.4} ({:?})",
                    i + 1,
                    hit.chunk.reference().unwrap_or("?"),
                    hit.chunk.work.as_deref().unwrap_or(""),
                    hit.score,
                    hit.source,
                );
                println!("    {}", hit.snippet(SNIPPET_CHARS));
            }
        }
        Command::Passage { reference, shards } => {
            let store = open_store(source, &settings, shards).await?;
            let Some(chunk) = store.find_passage(&reference) else {
                bail!("no passage with reference \"{reference}\"");
            };
            if let Some(work) = &chunk.work {
                println!("{work}");
            }
            println!("{}\n\n{}", chunk.reference().unwrap_or("?"), chunk.text);
        }
    }
    Ok(())
}

/// Load the requested shards (or the configured defaults) behind a spinner.
async fn open_store(source: FsShardSource, settings: &Settings, shards: Vec<String>) -> anyhow::Result<CorpusStore> {
    let selection: Vec<ShardId> = if shards.is_empty() { settings.data.default_shards.clone() } else { shards };
    let store = CorpusStore::new(Arc::new(source))
        .with_bm25_params(settings.bm25)
        .with_fusion_params(settings.fusion);

    let pb = ProgressBar::new_spinner();
    pb.set_style(ProgressStyle::default_spinner().template("{spinner:.green} {msg}")?);
    pb.set_message(format!("loading {}", selection.join(", ")));
    pb.enable_steady_tick(Duration::from_millis(100));
    let outcome = store.select(&selection).await;
    pb.finish_and_clear();

    match outcome? {
        Selection::Published { shards, records, failed } => {
            for (id, e) in failed {
                warn!(shard = %id, error = %e, "shard skipped");
            }
            info!(?shards, records, "corpus ready");
        }
        Selection::Cleared { failed } => {
            for (id, e) in failed {
                warn!(shard = %id, error = %e, "shard skipped");
            }
        }
        Selection::Superseded => {}
    }
    Ok(store)
}
