use clap::{Parser, Subcommand};
use std::path::PathBuf;

use native_tango::config::DEFAULT_CONFIG_FILE;

#[derive(Parser, Debug, Clone)]
#[command(name = "tango-cli", version, about = "Terminal client for the Trash & Tango table", long_about = None)]
pub struct Cli {
    /// Path to config file
    #[arg(long, global = true, default_value = DEFAULT_CONFIG_FILE)]
    pub config: PathBuf,

    /// Websocket URL of the table server (overrides config.server_url)
    #[arg(long, global = true)]
    pub server: Option<String>,

    /// Base URL of the identity service (overrides config.api_url)
    #[arg(long, global = true)]
    pub api: Option<String>,

    /// Username to register with (overrides config.username)
    #[arg(short, long, global = true)]
    pub name: Option<String>,

    /// Output JSON instead of human-readable text
    #[arg(long, global = true, default_value_t = false)]
    pub json: bool,

    /// Verbose logging with targets and line numbers
    #[arg(long, global = true, default_value_t = false)]
    pub debug: bool,

    /// Persist CLI overrides back to the config file
    #[arg(long, global = true, default_value_t = false)]
    pub persist: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Create or fetch the player bound to the saved session and print it
    Identity,
    /// Change the username of the current player
    SetUsername { name: String },
    /// Claim the free chip top-up
    ClaimChips,
    /// Join a table and print every event as it arrives
    Watch,
    /// Join a table and play interactively from stdin
    Play,
}

/// A line typed during `play`. Amounts and slots stay raw text until the
/// chip balance is known.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PlayCommand {
    Ante(String),
    Trash(String),
    Tango(String),
    Check,
    Call,
    Raise(String),
    Fold,
    Say(String),
    Status,
    Leave,
    Quit,
    Help,
}

impl std::str::FromStr for PlayCommand {
    type Err = String;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let line = line.trim();
        let (word, rest) = match line.split_once(char::is_whitespace) {
            Some((w, r)) => (w, r.trim()),
            None => (line, ""),
        };
        let need = |what: &str| -> Result<String, String> {
            if rest.is_empty() {
                Err(format!("usage: {} <{}>", word, what))
            } else {
                Ok(rest.to_string())
            }
        };
        match word.to_ascii_lowercase().as_str() {
            "ante" | "bet" => need("amount").map(PlayCommand::Ante),
            "trash" | "kill" => need("0|1|2").map(PlayCommand::Trash),
            "tango" | "kick" => need("0|1|2").map(PlayCommand::Tango),
            "check" => Ok(PlayCommand::Check),
            "call" => Ok(PlayCommand::Call),
            "raise" => need("amount").map(PlayCommand::Raise),
            "fold" => Ok(PlayCommand::Fold),
            "say" => need("text").map(PlayCommand::Say),
            "status" | "" => Ok(PlayCommand::Status),
            "leave" => Ok(PlayCommand::Leave),
            "quit" | "exit" => Ok(PlayCommand::Quit),
            "help" | "?" => Ok(PlayCommand::Help),
            other => Err(format!("unknown command '{}', try 'help'", other)),
        }
    }
}

pub const PLAY_HELP: &str = "\
commands:
  ante N      put N chips in as ante
  trash I     trash card I (0, 1 or 2)
  tango I     tango card I (0, 1 or 2)
  check | call | fold
  raise N     raise to N chips
  say TEXT    send a chat message
  status      show the table
  leave       leave the table and exit
  quit        exit";
