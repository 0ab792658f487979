mod interactive;
mod render;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use smartdine_core::{
    fetch_health, ClientConfig, HttpClient, Phase, ReqwestClient, SearchSession,
};
use std::time::Duration;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

#[derive(Parser)]
#[command(name = "smartdine")]
#[command(about = "Food that matches your mood", long_about = None)]
struct Cli {
    /// Backend base URL (default: $SMARTDINE_API_BASE or http://localhost:8000)
    #[arg(long, global = true)]
    api_base: Option<String>,

    /// Recommendation timeout in milliseconds (default: $SMARTDINE_TIMEOUT_MS or 20000)
    #[arg(long, global = true)]
    timeout_ms: Option<u64>,

    /// Session id forwarded to the backend (default: $SMARTDINE_SESSION_ID)
    #[arg(long, global = true)]
    session_id: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Recommend dishes for a craving
    Recommend {
        /// What you feel like eating
        #[arg(required = true)]
        query: Vec<String>,
        /// City to search in (default: first city the server lists)
        #[arg(long)]
        city: Option<String>,
    },
    /// Let SmartDine pick something for you
    Surprise {
        /// City to search in (default: first city the server lists)
        #[arg(long)]
        city: Option<String>,
    },
    /// List supported cities
    Cities,
    /// Check that the backend is up
    Health,
    /// Interactive prompt
    Interactive,
}

fn init_tracing() {
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn"));
    let fmt_layer = tracing_subscriber::fmt::layer().with_writer(std::io::stderr);

    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt_layer)
        .init();
}

fn load_config(cli: &Cli) -> Result<ClientConfig> {
    let mut config = ClientConfig::from_env()?;
    if let Some(api_base) = &cli.api_base {
        config = config.with_api_base(api_base)?;
    }
    if let Some(ms) = cli.timeout_ms.filter(|ms| *ms > 0) {
        config = config.with_timeout(Duration::from_millis(ms));
    }
    if cli.session_id.is_some() {
        config = config.with_session_id(cli.session_id.clone());
    }
    Ok(config)
}

#[tokio::main]
async fn main() -> Result<()> {
    init_tracing();

    let cli = Cli::parse();
    let config = load_config(&cli)?;
    let client = ReqwestClient::new().context("Failed to build HTTP client")?;
    tracing::debug!(api_base = %config.api_base, timeout = ?config.timeout, "configured");

    let mut session = SearchSession::new().with_session_id(config.session_id.clone());

    match cli.command {
        Commands::Recommend { query, city } => {
            session.set_query(query.join(" "));
            search(&client, &config, session, city, false).await?;
        }
        Commands::Surprise { city } => {
            search(&client, &config, session, city, true).await?;
        }
        Commands::Cities => {
            session.init_cities(&client, &config).await;
            if !session.state().error_message.is_empty() {
                anyhow::bail!("{}", session.state().error_message);
            }
            for city in session.cities() {
                println!("{}", city);
            }
        }
        Commands::Health => {
            let status = fetch_health(&client, &config).await?;
            println!("{}", render::health(&status));
        }
        Commands::Interactive => {
            session.init_cities(&client, &config).await;
            interactive::run(&client, &config, session).await?;
        }
    }

    Ok(())
}

async fn search(
    client: &dyn HttpClient,
    config: &ClientConfig,
    mut session: SearchSession,
    city: Option<String>,
    surprise: bool,
) -> Result<()> {
    match city {
        Some(city) => session.select_city(city),
        None => session.init_cities(client, config).await,
    }

    eprintln!("{}", smartdine_core::view::LOADING_MESSAGE);
    session.run_search(client, config, surprise).await;

    if session.phase() == Phase::Error {
        anyhow::bail!("{}", session.state().error_message);
    }
    println!("{}", render::results(&session));
    Ok(())
}
