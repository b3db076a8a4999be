mod app;
mod client;
mod color;
mod config;
mod filter;
mod models;
mod state;
mod statics;


use anyhow::Result;
use chrono::{Datelike, NaiveDate, Utc};
use clap::{Args, Parser, Subcommand};
use config::Config;
use std::sync::Arc;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;
use url::Url;

use app::{App, SearchOutcome};
use client::{LlmClient, SearchBackend, SpockApiClient};
use filter::FilterSpec;
use state::{
    link, memory::MemorySessionStore, sqlite::SqliteSessionStore, PartialSearchRequest,
    SearchStateStore, SessionStore,
};

#[derive(Parser)]
#[command(name = "spock", version, about = "Search Jira, Confluence and file shares")]
struct Cli {
    /// Search API base URL (overrides SPOCK_API_URL)
    #[arg(long, global = true)]
    api_url: Option<Url>,

    /// Session database (overrides SPOCK_SESSION_DB)
    #[arg(long, global = true)]
    session_db: Option<String>,

    /// Keep the search state in memory only
    #[arg(long, global = true)]
    ephemeral: bool,

    /// Debug logging unless RUST_LOG says otherwise
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Open a search link (or the stored session) and show the results
    Search(SearchArgs),
    /// Print the share link for the stored session
    Link {
        /// Page URL to build the link on
        base: Option<Url>,
    },
    /// Forget the stored session
    Reset,
    /// List the sources the API can search
    Sources,
    /// Check API health
    Health,
    /// List the models of the LLM endpoint
    Models,
    /// Print build information
    Version,
}

#[derive(Args)]
struct SearchArgs {
    /// Full link or query string, e.g. "?q=vpn&s=jira,wiki&t=Keyword"
    link: Option<String>,

    /// Only results created by this person (repeatable)
    #[arg(long = "creator")]
    creators: Vec<String>,

    /// Only results of this source label, e.g. Jira, Confluence, Datei (repeatable)
    #[arg(long = "source")]
    sources: Vec<String>,

    /// Created on or after this date (YYYY-MM-DD)
    #[arg(long)]
    from: Option<NaiveDate>,

    /// Created on or before this date (YYYY-MM-DD)
    #[arg(long)]
    to: Option<NaiveDate>,

    /// Search even if the link supplied nothing
    #[arg(long)]
    run: bool,

    /// Print the outcome as JSON
    #[arg(long)]
    json: bool,
}

impl SearchArgs {
    fn filter(&self) -> FilterSpec {
        FilterSpec::new()
            .with_names(self.creators.iter().cloned())
            .with_source_labels(self.sources.iter().cloned())
            .with_date_range(self.from, self.to)
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Logs go to stderr so results can be piped
    let default_level = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .init();

    let mut config = Config::from_env()?;
    if let Some(api_url) = cli.api_url.clone() {
        config.api_url = Some(api_url);
    }
    if let Some(session_db) = cli.session_db.clone() {
        config.session_db = session_db;
    }

    if let Err(e) = run(cli.command, cli.ephemeral, &config).await {
        error!("❌ {:#}", e);
        return Err(e);
    }
    Ok(())
}

async fn open_state(config: &Config, ephemeral: bool) -> Result<SearchStateStore> {
    let store: Arc<dyn SessionStore> = if ephemeral {
        info!("💾 Using in-memory session");
        Arc::new(MemorySessionStore::new())
    } else {
        Arc::new(SqliteSessionStore::new(&config.session_db).await?)
    };
    Ok(SearchStateStore::new(store))
}

fn api_client(config: &Config) -> Result<SpockApiClient> {
    SpockApiClient::new(config.require_api_url()?, config.api_timeout)
}

async fn run(command: Command, ephemeral: bool, config: &Config) -> Result<()> {
    match command {
        Command::Search(args) => {
            let state = open_state(config, ephemeral).await?;
            let backend: Arc<dyn SearchBackend> = Arc::new(api_client(config)?);
            let app = App::new(state, backend, config.page_url.clone());

            let params = args
                .link
                .as_deref()
                .map(PartialSearchRequest::from_link)
                .unwrap_or_default();

            let outcome = app.open(&params, &args.filter(), args.run).await?;
            if args.json {
                println!("{}", serde_json::to_string_pretty(&outcome)?);
            } else {
                print_outcome(&outcome);
            }
        }
        Command::Link { base } => {
            let state = open_state(config, ephemeral).await?;
            let request = state.current().await;
            let page = base.unwrap_or_else(|| config.page_url.clone());
            println!("{}", link::apply_to_url(&page, &request));
        }
        Command::Reset => {
            open_state(config, ephemeral).await?.reset().await?;
            println!("Session reset");
        }
        Command::Sources => {
            for source in api_client(config)?.list_sources().await? {
                let marker = if statics::is_suggested(&source.name) { "*" } else { " " };
                println!(
                    "{} {:<20} {:<12} available={} embeddings={}",
                    marker,
                    source.name,
                    source.kind.label(),
                    source.available,
                    source.embeddings
                );
            }
        }
        Command::Health => {
            let client = api_client(config)?;
            let (health, sources) = futures::join!(client.health(), client.list_sources());
            println!("API: {}", health?.status);
            match sources {
                Ok(sources) => {
                    let available = sources.iter().filter(|s| s.available).count();
                    println!("Sources: {}/{} available", available, sources.len());
                }
                Err(e) => println!("Sources: unavailable ({})", e),
            }
        }
        Command::Models => {
            let client = LlmClient::new(config.require_llm_url()?)?;
            for model in client.models().await?.data {
                println!("{} ({})", model.id, model.owned_by);
            }
        }
        Command::Version => {
            println!("spock {} {}", env!("CARGO_PKG_VERSION"), config.version_info());
        }
    }
    Ok(())
}

fn print_outcome(outcome: &SearchOutcome) {
    let request = &outcome.request;

    if !outcome.searched {
        if request.query.trim().is_empty() {
            let hint = statics::placeholder(Utc::now().ordinal() as usize);
            println!("Nothing to search yet. Try: spock search \"?q={}\"", hint);
        } else {
            println!("Stored search: {:?} (pass --run to search)", request.query);
        }
        println!("Share: {}", outcome.share_link);
        return;
    }

    if let Some(answer) = outcome.answer.as_deref() {
        println!("{}\n", answer);
    }

    println!(
        "{} of {} result(s) for {:?} ({}){}",
        outcome.rows.len(),
        outcome.total,
        request.query,
        request.search_type,
        if outcome.filtered { ", filtered" } else { "" }
    );
    for row in &outcome.rows {
        let title = row.title.as_deref().unwrap_or(&row.id);
        let score = row.rgb.paint(&format!("{:>6.2}", row.score));
        let created = row
            .created
            .map(|d| d.to_string())
            .unwrap_or_default();
        println!(
            "{} [{:<10}] {} {} {}",
            score,
            row.source,
            title,
            row.creator.as_deref().unwrap_or(""),
            created
        );
        if let Some(detail) = row.detail.as_deref() {
            println!("         {}", detail);
        }
        println!("         {}", row.url);
    }

    if !outcome.facets.names.is_empty() {
        let names: Vec<String> = outcome
            .facets
            .names
            .iter()
            .map(|item| format!("{} ({})", item.value, item.count))
            .collect();
        println!("\nContributors: {}", names.join(", "));
    }
    println!("Share: {}", outcome.share_link);
}
