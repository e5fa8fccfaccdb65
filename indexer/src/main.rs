use anyhow::Result;
use clap::{Parser, Subcommand};
use seosearch_core::corpus::load_dir;
use seosearch_core::{build_from_corpus, AuthorityTable, BuildReport, IndexInfo, QueryEngine, RankedResult};
use serde::Serialize;
use std::sync::Arc;
use tracing_subscriber::{EnvFilter, fmt};

#[derive(Parser)]
#[command(name = "seosearch-indexer")]
#[command(about = "Build the in-memory index over a directory of HTML pages and inspect or query it", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Build the index and print its statistics as JSON
    Build {
        /// Directory of HTML pages
        #[arg(long, default_value = "./sample-pages")]
        input: String,
    },
    /// Build the index and print ranked results for one query as JSON
    Query {
        /// Directory of HTML pages
        #[arg(long, default_value = "./sample-pages")]
        input: String,
        /// Query text
        #[arg(long)]
        q: String,
        /// JSON file of document id -> authority weight (defaults to the built-in table)
        #[arg(long)]
        authority: Option<String>,
        /// Maximum number of results to print
        #[arg(long)]
        limit: Option<usize>,
    },
}

#[derive(Serialize)]
struct BuildOutput {
    report: BuildReport,
    info: IndexInfo,
}

#[derive(Serialize)]
struct QueryOutput {
    query: String,
    total_hits: usize,
    results: Vec<RankedResult>,
}

fn main() -> Result<()> {
    fmt().with_env_filter(EnvFilter::from_default_env()).with_writer(std::io::stderr).init();
    let cli = Cli::parse();

    match cli.command {
        Commands::Build { input } => build(&input),
        Commands::Query { input, q, authority, limit } => query(&input, q, authority.as_deref(), limit),
    }
}

fn build(input: &str) -> Result<()> {
    let corpus = load_dir(input)?;
    let (index, report) = build_from_corpus(&corpus);
    let out = BuildOutput { info: index.info(), report };
    println!("{}", serde_json::to_string_pretty(&out)?);
    Ok(())
}

fn query(input: &str, q: String, authority: Option<&str>, limit: Option<usize>) -> Result<()> {
    let authority = match authority {
        Some(path) => AuthorityTable::from_json_file(path)?,
        None => AuthorityTable::builtin(),
    };
    let corpus = load_dir(input)?;
    let (index, _report) = build_from_corpus(&corpus);
    let engine = QueryEngine::new(index, Arc::new(authority));

    let mut results = engine.search(&q);
    let total_hits = results.len();
    if let Some(k) = limit {
        results.truncate(k);
    }
    tracing::info!(query = %q, total_hits, "query complete");
    println!("{}", serde_json::to_string_pretty(&QueryOutput { query: q, total_hits, results })?);
    Ok(())
}
