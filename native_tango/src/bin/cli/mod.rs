pub mod args;
pub mod play;
pub mod watch;

pub use args::*;
pub use play::*;
pub use watch::*;

use std::path::Path;

use anyhow::Context;
use serde::Serialize;
use tango_shared::PlayerRecord;

use native_tango::config::Config;
use native_tango::identity::IdentityClient;
use native_tango::session_file::SessionInfo;

/// Create or fetch our player, reusing the saved session id.
pub async fn resolve_identity(cfg: &Config, config_path: &Path) -> anyhow::Result<PlayerRecord> {
    let session_path = cfg.session_path(config_path);
    let saved = SessionInfo::load(&session_path)?;
    let client = IdentityClient::new(cfg.api_url.clone());
    let record = client
        .create_or_fetch(saved.session_id.as_deref(), cfg.username.as_deref())
        .await
        .with_context(|| format!("contacting identity service at {}", client.base()))?;
    SessionInfo::remember(&session_path, &record.session_id, record.id.0)?;
    tracing::debug!(player = %record.id, "identity resolved");
    Ok(record)
}

pub fn print_json<T: Serialize>(value: &T) {
    match serde_json::to_string_pretty(value) {
        Ok(json_str) => println!("{}", json_str),
        Err(e) => eprintln!("Failed to serialize to JSON: {}", e),
    }
}

/// Status lines go to stderr in JSON mode so stdout stays machine-readable.
pub fn announce(json: bool, message: &str) {
    if json {
        eprintln!("{}", message);
    } else {
        println!("{}", message);
    }
}
