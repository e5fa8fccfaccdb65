use anyhow::Result;
use axum::Router;
use clap::Parser;
use seosearch_core::{AuthorityTable, SearchService};
use seosearch_server::{build_app, rebuild, AppState};
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing_subscriber::{fmt, EnvFilter};

#[derive(Parser)]
struct Args {
    /// Directory of HTML pages to index
    #[arg(long, default_value = "./sample-pages")]
    pages: String,
    /// JSON file of document id -> authority weight (defaults to the built-in table)
    #[arg(long)]
    authority: Option<String>,
    /// Host to bind
    #[arg(long, default_value = "0.0.0.0")]
    host: String,
    /// Port to bind
    #[arg(long, default_value_t = 3000)]
    port: u16,
}

#[tokio::main]
async fn main() -> Result<()> {
    fmt().with_env_filter(EnvFilter::from_default_env()).init();
    let args = Args::parse();

    let authority = match &args.authority {
        Some(path) => AuthorityTable::from_json_file(path)?,
        None => AuthorityTable::builtin(),
    };
    let service = Arc::new(SearchService::new(authority));
    let state = AppState::new(service, &args.pages);

    // Serve right away; /search answers 503 until the first build is published.
    let build_state = state.clone();
    tokio::spawn(async move {
        match rebuild(&build_state).await {
            Ok(report) => tracing::info!(indexed = report.indexed, skipped = report.skipped.len(), "search engine ready"),
            Err(e) => tracing::error!(error = %e, "initial index build failed"),
        }
    });

    let app: Router = build_app(state);
    let addr: SocketAddr = format!("{}:{}", args.host, args.port).parse()?;
    let listener = TcpListener::bind(addr).await?;
    tracing::info!(%addr, "server listening");
    axum::serve(listener, app).await?;
    Ok(())
}
