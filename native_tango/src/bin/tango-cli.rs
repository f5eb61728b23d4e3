//! Terminal client for the Trash & Tango table.

mod cli;

use std::io::IsTerminal;
use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use cli::{Cli, Commands};
use native_tango::config::Config;
use native_tango::identity::IdentityClient;
use native_tango::pretty::format_identity;
use tango_shared::PlayerRecord;

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Our crates at info, everything else at warn; --debug shows everything.
    let log_filter = if cli.debug {
        "debug".to_string()
    } else {
        "native_tango=info,tango_shared=info,warn".to_string()
    };
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(log_filter));
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .with_target(cli.debug)
        .with_file(cli.debug)
        .with_line_number(cli.debug)
        .init();

    let config_path: PathBuf = cli.config.clone();
    let mut cfg = Config::load_or_create(&config_path)
        .with_context(|| format!("loading or creating config '{}'", config_path.display()))?;

    // Apply CLI overrides in-memory (non-persistent by default)
    if let Some(server) = cli.server.clone() {
        cfg.server_url = server;
    }
    if let Some(api) = cli.api.clone() {
        cfg.api_url = api;
    }
    if let Some(name) = cli.name.clone() {
        cfg.username = Some(name);
    }
    if cli.persist {
        cfg.save(&config_path)
            .with_context(|| format!("saving updated config '{}'", config_path.display()))?;
    }
    tracing::debug!(config = %config_path.display(), server = %cfg.server_url, "config loaded");

    match cli.command {
        Commands::Identity => {
            let record = cli::resolve_identity(&cfg, &config_path).await?;
            print_record(&record, cli.json);
        }
        Commands::SetUsername { name } => {
            let record = cli::resolve_identity(&cfg, &config_path).await?;
            let record = IdentityClient::new(cfg.api_url.clone())
                .set_username(&record.session_id, &name)
                .await?;
            print_record(&record, cli.json);
        }
        Commands::ClaimChips => {
            let record = cli::resolve_identity(&cfg, &config_path).await?;
            let record = IdentityClient::new(cfg.api_url.clone())
                .claim_chips(&record.session_id)
                .await?;
            print_record(&record, cli.json);
        }
        Commands::Watch => {
            let record = cli::resolve_identity(&cfg, &config_path).await?;
            cli::watch_table(&cfg, &record, cli.json).await?;
        }
        Commands::Play => {
            let record = cli::resolve_identity(&cfg, &config_path).await?;
            cli::play_table(&cfg, record, cli.json).await?;
        }
    }

    Ok(())
}

fn print_record(record: &PlayerRecord, json: bool) {
    if json {
        cli::print_json(record);
    } else {
        println!("{}", format_identity(record, std::io::stdout().is_terminal()));
    }
}
