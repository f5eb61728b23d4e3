use std::io::IsTerminal;

use anyhow::Context;
use tango_shared::PlayerRecord;
use tokio::io::{AsyncBufReadExt, BufReader};

use native_tango::config::Config;
use native_tango::engine::{parse_amount, parse_slot, Action, LocalIdentity};
use native_tango::pretty::{format_clock, format_snapshot_human};
use native_tango::transport::{Connection, Inbound, Outbox};
use native_tango::{SessionUpdate, TableSession};

use super::args::{PlayCommand, PLAY_HELP};
use super::{announce, print_json};

struct View {
    json: bool,
    color: bool,
}

impl View {
    fn table(&self, session: &TableSession<Outbox>) {
        if self.json {
            return;
        }
        match &session.state().snapshot {
            Some(snapshot) => print!(
                "{}",
                format_snapshot_human(
                    snapshot,
                    session.state().identity.player_id,
                    &session.eligibility(),
                    self.color,
                )
            ),
            None => println!("{}", session.status_text()),
        }
    }

    fn update(&self, session: &TableSession<Outbox>, update: SessionUpdate) {
        if self.json {
            return;
        }
        match update {
            SessionUpdate::Snapshot => self.table(session),
            SessionUpdate::Seated => {
                if let Some(seat) = session.state().seat {
                    println!("Seated at table {}", seat.table_id);
                }
            }
            SessionUpdate::Log => {
                if let Some(line) = session.log().chat.last() {
                    println!("{}", line);
                }
            }
            SessionUpdate::Error => {
                if let Some(e) = &session.log().last_error {
                    eprintln!("! {}", e);
                }
            }
            SessionUpdate::Clock => {}
        }
    }
}

/// Interactive play loop: server events, stdin and the countdown share one
/// thread.
pub async fn play_table(cfg: &Config, record: PlayerRecord, json: bool) -> anyhow::Result<()> {
    let mut conn = Connection::connect(&cfg.server_url)
        .await
        .with_context(|| format!("connecting to {}", cfg.server_url))?;
    let mut session = TableSession::new(
        LocalIdentity::from(record),
        conn.outbox(),
        cfg.clock_interval(),
    );
    session.join()?;
    announce(json, &format!("Connected to {}, type 'help' for commands", conn.url()));

    let view = View {
        json,
        color: !json && std::io::stdout().is_terminal(),
    };
    let mut clock_rx = session.clock().subscribe();
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut shown_second: Option<u64> = None;

    loop {
        tokio::select! {
            inbound = conn.recv() => match inbound {
                Some(Inbound::Event(ev)) => {
                    if json {
                        print_json(&ev);
                    }
                    let update = session.apply(ev);
                    view.update(&session, update);
                }
                Some(Inbound::Malformed(e)) => eprintln!("Ignoring frame: {}", e),
                Some(Inbound::Closed(reason)) => {
                    announce(json, &format!("Connection closed{}", reason.map(|r| format!(": {}", r)).unwrap_or_default()));
                    break;
                }
                None => break,
            },
            line = lines.next_line() => {
                let Some(line) = line.context("reading stdin")? else {
                    break;
                };
                if !handle_line(&mut session, &line, &view) {
                    break;
                }
            }
            changed = clock_rx.changed() => {
                if changed.is_err() {
                    break;
                }
                let remaining = *clock_rx.borrow_and_update();
                if let Some(remaining) = remaining {
                    let second = remaining.ceil() as u64;
                    if shown_second != Some(second) {
                        shown_second = Some(second);
                        if !json {
                            println!("{}", format_clock(remaining, view.color));
                        }
                    }
                }
            }
        }
    }
    Ok(())
}

/// Returns false when the loop should end.
fn handle_line(session: &mut TableSession<Outbox>, line: &str, view: &View) -> bool {
    let cmd = match line.parse::<PlayCommand>() {
        Ok(cmd) => cmd,
        Err(e) => {
            eprintln!("{}", e);
            return true;
        }
    };
    let chips = session.state().available_chips();
    let action = match cmd {
        PlayCommand::Ante(text) => parse_amount(&text, chips).map(Action::PlaceAnte),
        PlayCommand::Trash(text) => parse_slot(&text).map(Action::ChooseTrash),
        PlayCommand::Tango(text) => parse_slot(&text).map(Action::ChooseTango),
        PlayCommand::Check => Ok(Action::Check),
        PlayCommand::Call => Ok(Action::Call),
        PlayCommand::Raise(text) => parse_amount(&text, chips).map(Action::Raise),
        PlayCommand::Fold => Ok(Action::Fold),
        PlayCommand::Say(text) => {
            if let Err(e) = session.send_chat(&text) {
                eprintln!("! {}", e);
            }
            return true;
        }
        PlayCommand::Status => {
            view.table(session);
            return true;
        }
        PlayCommand::Leave => {
            if let Err(e) = session.leave() {
                eprintln!("! {}", e);
                return true;
            }
            announce(view.json, "Left the table");
            return false;
        }
        PlayCommand::Quit => return false,
        PlayCommand::Help => {
            println!("{}", PLAY_HELP);
            return true;
        }
    };

    match action {
        Ok(action) => match session.submit(action) {
            Ok(()) => announce(view.json, &format!("> {}", action)),
            Err(e) => eprintln!("! {}", e),
        },
        Err(e) => eprintln!("! {}", e),
    }
    true
}
