use std::io::IsTerminal;

use anyhow::Context;
use tango_shared::{ClientEvent, PlayerRecord};

use native_tango::config::Config;
use native_tango::engine::ActionSink;
use native_tango::pretty::format_event_human;
use native_tango::transport::{Connection, Inbound};

use super::{announce, print_json};

/// Join a table and print events as they arrive until the server closes.
pub async fn watch_table(cfg: &Config, record: &PlayerRecord, json: bool) -> anyhow::Result<()> {
    let mut conn = Connection::connect(&cfg.server_url)
        .await
        .with_context(|| format!("connecting to {}", cfg.server_url))?;
    conn.outbox().send(ClientEvent::JoinTable {
        session_id: record.session_id.clone(),
    })?;
    announce(json, &format!("Connected to WebSocket {}", conn.url()));

    let color = !json && std::io::stdout().is_terminal();
    while let Some(inbound) = conn.recv().await {
        match inbound {
            Inbound::Event(ev) => {
                if json {
                    print_json(&ev);
                } else {
                    println!("{}", format_event_human(&ev, color));
                }
            }
            Inbound::Malformed(e) => eprintln!("Ignoring frame: {}", e),
            Inbound::Closed(reason) => {
                announce(
                    json,
                    &format!("Connection closed{}", reason.map(|r| format!(": {}", r)).unwrap_or_default()),
                );
                break;
            }
        }
    }
    Ok(())
}
