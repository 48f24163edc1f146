//! Unova Dex Server
//!
//! Loads the catalog once at startup and serves it to a front end as a
//! JSON API. `list` prints the catalog to the terminal instead.

mod api;
mod logging;

use axum::Router;
use clap::{Parser, Subcommand};
use std::{net::SocketAddr, sync::Arc};
use tokio::net::TcpListener;

use unovadex_core::catalog::{CatalogLoader, HttpRecordSource, RecordSource};
use unovadex_core::config::{DexConfig, FetchWindow, DEFAULT_BASE_URL, DEFAULT_LIMIT, DEFAULT_OFFSET};
use unovadex_core::{Session, TypeFilter};

use api::{AppState, SharedState};

const DEFAULT_PORT: u16 = 8080;

#[derive(Parser, Clone)]
#[command(author, version, about = "Unova Dex - browse the fifth-generation PokéAPI catalog")]
struct Args {
    #[command(flatten)]
    source: SourceArgs,

    /// Debug-level logging for the dex crates
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Option<CliCommand>,
}

#[derive(clap::Args, Clone)]
struct SourceArgs {
    /// API root
    #[arg(long, env = "UNOVADEX_BASE_URL", default_value = DEFAULT_BASE_URL, global = true)]
    base_url: String,
    /// Index page size
    #[arg(long, env = "UNOVADEX_LIMIT", default_value_t = DEFAULT_LIMIT, global = true)]
    limit: u32,
    /// Index page offset
    #[arg(long, env = "UNOVADEX_OFFSET", default_value_t = DEFAULT_OFFSET, global = true)]
    offset: u32,
    /// Per-request timeout in seconds
    #[arg(long, env = "UNOVADEX_TIMEOUT_SECS", global = true)]
    timeout_secs: Option<u64>,
    /// Cap on concurrent record fetches
    #[arg(long, env = "UNOVADEX_MAX_CONCURRENT", global = true)]
    max_concurrent: Option<usize>,
}

impl SourceArgs {
    fn into_config(self) -> DexConfig {
        let mut config = DexConfig::default()
            .with_base_url(self.base_url)
            .with_window(FetchWindow::new(self.limit, self.offset));
        if let Some(secs) = self.timeout_secs {
            config = config.with_timeout_secs(secs);
        }
        if let Some(max) = self.max_concurrent {
            config = config.with_max_concurrent_fetches(max);
        }
        config
    }
}

#[derive(Subcommand, Clone)]
enum CliCommand {
    /// Serve the JSON API (default)
    Serve {
        /// Port to listen on
        #[arg(short, long, env = "UNOVADEX_PORT", default_value_t = DEFAULT_PORT)]
        port: u16,
    },
    /// Load once and print the catalog
    List {
        /// Only records of this type
        #[arg(long = "type", default_value = "")]
        type_tag: String,
        /// Print cards as JSON
        #[arg(long)]
        json: bool,
    },
}

async fn run_server(state: SharedState, port: u16) -> anyhow::Result<()> {
    let app = Router::new()
        .nest("/api/v1", api::catalog::catalog_routes())
        .with_state(state);

    let addr = SocketAddr::from(([127, 0, 0, 1], port));
    tracing::info!(%addr, "Unova Dex server listening");
    println!("Unova Dex Server running at http://{}", addr);
    println!("   Catalog:    /api/v1/catalog, /types, /reload");
    println!("   Filter:     /api/v1/filter (POST {{\"tag\": \"water\"}})");
    println!("   Navigation: /api/v1/select/{{id}}, /back, /screen");

    let listener = TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

fn list_header(filter: &TypeFilter) -> String {
    if filter.is_all() {
        "Unova Dex".to_string()
    } else {
        format!("Unova Dex ({})", filter.label())
    }
}

async fn run_list(
    config: &DexConfig,
    source: Arc<dyn RecordSource>,
    type_tag: &str,
    json: bool,
) -> anyhow::Result<()> {
    let catalog = CatalogLoader::with_config(source, config)
        .load(config.window)
        .await?;

    let mut session = Session::new(Arc::new(catalog));
    session.set_type_filter(TypeFilter::parse(type_tag));

    if json {
        let cards: Vec<api::catalog::RecordCard> = session
            .displayed()
            .iter()
            .map(|r| r.as_ref().into())
            .collect();
        println!("{}", serde_json::to_string_pretty(&cards)?);
        return Ok(());
    }

    println!("{}", list_header(session.active_filter()));
    if session.displayed().is_empty() {
        println!("No records found.");
    }
    for record in session.displayed() {
        println!(
            "#{:03}  {:<12}  {}",
            record.id,
            record.display_name(),
            record.types.join("/")
        );
    }

    let report = session.catalog().report();
    if report.is_partial() {
        eprintln!(
            "{} of {} entries could not be loaded",
            report.dropped.len(),
            report.requested
        );
    }

    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Loaded before parsing so clap sees the UNOVADEX_* variables
    let dotenv = dotenvy::dotenv();

    let args = Args::parse();
    logging::init_logging(args.verbose);

    match dotenv {
        Ok(path) => tracing::debug!(path = %path.display(), "Loaded .env"),
        Err(e) => tracing::debug!(error = %e, "No .env loaded"),
    }

    let config = args.source.into_config();
    let source: Arc<dyn RecordSource> = Arc::new(HttpRecordSource::new(&config)?);

    match args.command.unwrap_or(CliCommand::Serve { port: DEFAULT_PORT }) {
        CliCommand::Serve { port } => {
            let state = AppState::bootstrap(config, source).await;
            run_server(state, port).await
        }
        CliCommand::List { type_tag, json } => run_list(&config, source, &type_tag, json).await,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_list_header_names_only_a_narrowed_filter() {
        assert_eq!(list_header(&TypeFilter::All), "Unova Dex");
        assert_eq!(list_header(&TypeFilter::parse("water")), "Unova Dex (Water)");
    }
}
