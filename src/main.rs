//! Integreat CLI binary entry point.

use clap::Parser;
use integreat::agent::{AgentSessionManager, AskMode};
use integreat::cli::{repl, AskArgs, ChatArgs, Cli, Commands};
use integreat::config::IntegreatConfig;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let result = match IntegreatConfig::load(cli.config.as_deref()) {
        Ok(config) => match cli.command {
            Commands::Chat(args) => handle_chat(config, args).await,
            Commands::Ask(args) => handle_ask(config, args).await,
            Commands::Countries => {
                let config_country = config.settings().default_country.clone();
                println!("{}", repl::render_catalog(config.countries(), &config_country));
                Ok(())
            }
        },
        Err(e) => Err(e.into()),
    };

    if let Err(e) = result {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}

fn with_country(config: IntegreatConfig, country: Option<String>) -> IntegreatConfig {
    match country {
        Some(country) => {
            let mut settings = config.settings().clone();
            settings.default_country = country;
            config.with_settings(settings)
        }
        None => config,
    }
}

async fn handle_chat(config: IntegreatConfig, args: ChatArgs) -> Result<(), Box<dyn std::error::Error>> {
    let config = with_country(config, args.country);
    if !config.has_credentials("serpapi") {
        eprintln!("Note: SERPAPI_API_KEY is not set; web search will be unavailable.");
    }

    let session = AgentSessionManager::from_config(&config).await?;
    repl::run(&session, config.countries()).await?;
    Ok(())
}

async fn handle_ask(config: IntegreatConfig, args: AskArgs) -> Result<(), Box<dyn std::error::Error>> {
    let config = with_country(config, args.country.clone());
    let session = AgentSessionManager::from_config(&config).await?;

    let mode = if args.gov {
        AskMode::GovernmentSearch
    } else {
        AskMode::Direct
    };
    let response = session.ask(&args.query_text(), mode).await?;
    println!("{response}");
    Ok(())
}
