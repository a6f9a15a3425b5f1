//! CLI for inspecting and querying an embedding index file

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use embedding_index::{IndexConfig, SimilarityIndex, Vector};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "embedding-index")]
#[command(about = "Inspect and query a persistent embedding index", long_about = None)]
struct Cli {
    /// JSON config file. Missing fields use defaults.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Index file to use. Overrides the config file.
    #[arg(long)]
    index: Option<PathBuf>,

    /// Log debug output to stderr
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show entry count and dimension, validating the file
    Info,
    /// List entry IDs in file order
    List,
    /// Rank entries by cosine similarity to a vector
    Query {
        /// Query vector as comma-separated values (e.g., "0.1,0.2,0.3")
        vector: String,
        /// Number of results to return
        #[arg(short, long)]
        k: Option<i64>,
        /// Print results as JSON
        #[arg(long)]
        json: bool,
    },
}

fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let mut config = match &cli.config {
        Some(path) => IndexConfig::from_json_file(path)?,
        None => IndexConfig::default(),
    };
    if let Some(index) = cli.index {
        config.index_path = index;
    }

    let index = SimilarityIndex::open(&config.index_path)
        .with_context(|| format!("failed to open index {}", config.index_path.display()))?;

    match cli.command {
        Commands::Info => {
            println!("Index: {}", index.path().display());
            println!("Entries: {}", index.count());
            match index.dimension() {
                Some(dim) => println!("Dimension: {}", dim),
                None => println!("Dimension: (empty index)"),
            }
        }
        Commands::List => {
            if index.count() == 0 {
                println!("No entries in index");
            } else {
                println!("Entry IDs ({} total):", index.count());
                for entry in index.table().iter() {
                    println!("  - {}", entry.id);
                }
            }
        }
        Commands::Query { vector, k, json } => {
            let q: Vector = vector.parse()?;
            let k = k.unwrap_or(config.default_top_k);
            let results = index.query(q.as_slice(), k)?;

            if json {
                println!("{}", serde_json::to_string_pretty(&results)?);
            } else if results.is_empty() {
                println!("No results found");
            } else {
                println!("Top {} results:", results.len());
                for (i, result) in results.iter().enumerate() {
                    println!("{}. {} (score: {:.4})", i + 1, result.id, result.score);
                }
            }
        }
    }
    Ok(())
}
