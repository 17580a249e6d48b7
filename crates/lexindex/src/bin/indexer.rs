//! Corpus indexing CLI.
//!
//! Run with: cargo run -p lexindex --features cli -- --data-dir data/processed

use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use lexindex::pipeline::DocOutcome;
use lexindex::providers::{MemoryVectorStore, OllamaEmbedder};
use lexindex::{EmbeddingProvider, IndexConfig, Indexer};

#[derive(Parser, Debug)]
#[command(name = "lexindex", about = "Index a legal-document corpus into a vector store")]
struct Cli {
    /// Optional TOML configuration file
    #[arg(long)]
    config: Option<PathBuf>,

    /// Corpus directory of plain-text documents (overrides config)
    #[arg(long)]
    data_dir: Option<PathBuf>,

    /// Manifest file path (overrides config)
    #[arg(long)]
    manifest: Option<PathBuf>,

    /// Cap the number of chunks indexed per document
    #[arg(long)]
    max_chunks: Option<usize>,

    /// Abort the run on the first failed document
    #[arg(long)]
    fail_fast: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "lexindex=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => IndexConfig::from_file(path)?,
        None => IndexConfig::default(),
    };
    if let Some(data_dir) = cli.data_dir {
        config.corpus.data_dir = data_dir;
    }
    if let Some(manifest) = cli.manifest {
        config.corpus.manifest_path = manifest;
    }
    if let Some(max_chunks) = cli.max_chunks {
        config.pipeline.max_chunks_per_doc = Some(max_chunks);
    }
    if cli.fail_fast {
        config.pipeline.fail_fast = true;
    }

    tracing::info!("Configuration loaded");
    tracing::info!("  - Corpus dir: {}", config.corpus.data_dir.display());
    tracing::info!("  - Manifest: {}", config.corpus.manifest_path.display());
    tracing::info!("  - Target tokens: {}", config.chunking.target_tokens);
    tracing::info!("  - Overlap tokens: {}", config.chunking.overlap_tokens);
    tracing::info!("  - Batch size: {}", config.pipeline.batch_size);
    tracing::info!("  - Embed concurrency: {}", config.embedding.concurrency);

    let embedder = Arc::new(OllamaEmbedder::new(&config.embedding)?);
    if !embedder.health_check().await.unwrap_or(false) {
        tracing::warn!(
            "embedding backend not reachable at {}; the run will fail on the first changed document",
            config.embedding.base_url
        );
    }
    let store = Arc::new(MemoryVectorStore::new(config.embedding.dimensions));

    let mut indexer = Indexer::new(config, embedder, store);
    let report = indexer.run().await?;

    println!("run {}", report.run_id);
    println!(
        "indexed {} | skipped {} | failed {} | chunks {}",
        report.indexed, report.skipped, report.failed, report.total_chunks
    );
    for doc in &report.documents {
        if let DocOutcome::Failed { error } = &doc.outcome {
            println!("  FAILED {}: {}", doc.doc_id, error);
        }
    }

    if report.failed > 0 {
        std::process::exit(1);
    }
    Ok(())
}
