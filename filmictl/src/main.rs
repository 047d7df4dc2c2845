//! `filmictl`: resolve TMDB ids into composite records from the command line.

use std::{path::PathBuf, sync::Arc};

use anyhow::{Context, bail};
use clap::{Parser, Subcommand, ValueEnum};
use filmi_config::{ConfigLoad, ConfigLoader, ConfigLoaderOptions, Config};
use filmi_core::{
    CompositeStore, GroqBlogGenerator, InMemoryCompositeStore,
    PostgresCompositeStore, ResolutionOrchestrator, TmdbClient, Upstreams,
    YoutubeClient, providers::tmdb::CatalogList,
};
use serde::Serialize;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser, Debug)]
#[command(name = "filmictl")]
#[command(about = "Resolve TMDB movie ids into enriched, cached composite records")]
struct Cli {
    /// Path to a filmi.toml configuration file
    #[arg(long, global = true, env = "FILMI_CONFIG")]
    config: Option<PathBuf>,

    /// Path to a .env file loaded before reading the environment
    #[arg(long, global = true)]
    env_file: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Resolve one movie id, serving from the store when fresh
    Resolve {
        /// TMDB movie id
        id: String,

        /// Backing store for composite records [default: postgres when a
        /// database URL is configured, memory otherwise]
        #[arg(long, value_enum)]
        store: Option<StoreKind>,

        /// Pretty-print the JSON output
        #[arg(long, default_value_t = false)]
        pretty: bool,
    },
    /// Search movies and series by title
    Search {
        query: String,
    },
    /// Print one of the TMDB home-page listings
    Catalog {
        #[arg(value_enum)]
        list: CatalogArg,
    },
    #[command(subcommand)]
    Db(DbCommand),
}

#[derive(Debug, Subcommand)]
enum DbCommand {
    /// Apply database migrations and exit
    Migrate,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum StoreKind {
    Memory,
    Postgres,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum CatalogArg {
    Trending,
    Upcoming,
    TopRated,
    Series,
}

impl From<CatalogArg> for CatalogList {
    fn from(value: CatalogArg) -> Self {
        match value {
            CatalogArg::Trending => CatalogList::Trending,
            CatalogArg::Upcoming => CatalogList::Upcoming,
            CatalogArg::TopRated => CatalogList::TopRated,
            CatalogArg::Series => CatalogList::PopularSeries,
        }
    }
}

#[derive(Debug, Serialize)]
struct ResolveOutput<'a> {
    cached: bool,
    record: &'a filmi_core::CompositeRecord,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,filmi_core=info,sqlx=warn".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let config = load_config(&cli)?;

    match cli.command {
        Command::Resolve { id, store, pretty } => {
            run_resolve(&config, &id, store, pretty).await
        }
        Command::Search { query } => run_search(&config, &query).await,
        Command::Catalog { list } => run_catalog(&config, list.into()).await,
        Command::Db(DbCommand::Migrate) => run_db_migrate(&config).await,
    }
}

fn load_config(cli: &Cli) -> anyhow::Result<Config> {
    let ConfigLoad { config, warnings } =
        ConfigLoader::with_options(ConfigLoaderOptions {
            config_path: cli.config.clone(),
            env_file: cli.env_file.clone(),
        })
        .load()
        .context("failed to load configuration")?;

    if config.metadata.env_file_loaded {
        info!("Loaded environment from .env");
    }
    for warning in &warnings.items {
        match &warning.hint {
            Some(hint) => warn!(hint = %hint, "{}", warning.message),
            None => warn!("{}", warning.message),
        }
    }

    Ok(config)
}

/// An explicit `--store` wins; otherwise records persist to PostgreSQL
/// whenever a database URL is configured.
fn effective_store(
    requested: Option<StoreKind>,
    database_url: Option<&str>,
) -> StoreKind {
    match (requested, database_url) {
        (Some(kind), _) => kind,
        (None, Some(_)) => StoreKind::Postgres,
        (None, None) => StoreKind::Memory,
    }
}

async fn open_store(
    config: &Config,
    requested: Option<StoreKind>,
) -> anyhow::Result<Arc<dyn CompositeStore>> {
    let kind = effective_store(requested, config.database.url.as_deref());
    info!(store = ?kind, "Opening composite store");
    match kind {
        StoreKind::Memory => Ok(Arc::new(InMemoryCompositeStore::new())),
        StoreKind::Postgres => Ok(Arc::new(connect_postgres(config).await?)),
    }
}

async fn connect_postgres(
    config: &Config,
) -> anyhow::Result<PostgresCompositeStore> {
    let Some(url) = config.database.url.as_deref() else {
        bail!("no database configured; set DATABASE_URL or [database].url");
    };
    PostgresCompositeStore::connect(url)
        .await
        .context("failed to connect to PostgreSQL")
}

fn tmdb_client(config: &Config) -> anyhow::Result<TmdbClient> {
    TmdbClient::new(config.tmdb_settings()).context("failed to build TMDB client")
}

async fn run_resolve(
    config: &Config,
    id: &str,
    store: Option<StoreKind>,
    pretty: bool,
) -> anyhow::Result<()> {
    let upstreams = Upstreams::from_clients(
        Arc::new(tmdb_client(config)?),
        Arc::new(
            YoutubeClient::new(config.youtube_settings())
                .context("failed to build YouTube client")?,
        ),
        Arc::new(
            GroqBlogGenerator::new(config.groq_settings())
                .context("failed to build Groq client")?,
        ),
    );
    let store = open_store(config, store).await?;
    let orchestrator =
        ResolutionOrchestrator::new(upstreams, store, config.resolver_settings());

    let resolved = orchestrator
        .resolve(id)
        .await
        .with_context(|| format!("failed to resolve movie {id}"))?;

    let output = ResolveOutput {
        cached: resolved.is_cached(),
        record: resolved.record(),
    };
    print_json(&output, pretty)
}

async fn run_search(config: &Config, query: &str) -> anyhow::Result<()> {
    let results = tmdb_client(config)?.search_multi(query).await;
    print_json(&results, true)
}

async fn run_catalog(config: &Config, list: CatalogList) -> anyhow::Result<()> {
    let results = tmdb_client(config)?
        .list(list)
        .await
        .with_context(|| format!("failed to fetch {list:?} listing"))?;
    print_json(&results, true)
}

async fn run_db_migrate(config: &Config) -> anyhow::Result<()> {
    let store = connect_postgres(config).await?;
    store.migrate().await.context("database migration failed")?;
    info!("Database migrations applied successfully");
    Ok(())
}

fn print_json<T: Serialize + ?Sized>(value: &T, pretty: bool) -> anyhow::Result<()> {
    let rendered = if pretty {
        serde_json::to_string_pretty(value)?
    } else {
        serde_json::to_string(value)?
    };
    println!("{rendered}");
    Ok(())
}
