//! One seat at one table: routes server events through the engine and user
//! decisions out to the server.

use std::time::Duration;

use tango_shared::{ChatMessage, ClientEvent, ServerEvent};
use tracing::{debug, info, warn};

use crate::engine::{
    apply_snapshot, format_hand_result, phase_table, Action, ActionDispatcher, ActionSink,
    ClientState, ClockReconciler, EligibleActions, LocalIdentity, TableSeat,
};
use crate::error::DispatchError;

/// Messages meant for the user.
#[derive(Clone, Debug, Default)]
pub struct UiLog {
    pub last_error: Option<String>,
    pub last_info: Option<String>,
    pub chat: Vec<String>,
}

impl UiLog {
    fn system(&mut self, line: impl Into<String>) {
        self.chat.push(line.into());
    }
}

/// What changed after an inbound event.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SessionUpdate {
    Snapshot,
    Seated,
    Clock,
    Log,
    Error,
}

pub struct TableSession<S: ActionSink> {
    state: ClientState,
    clock: ClockReconciler,
    dispatcher: ActionDispatcher,
    log: UiLog,
    sink: S,
}

impl<S: ActionSink> TableSession<S> {
    pub fn new(identity: LocalIdentity, sink: S, clock_period: Duration) -> Self {
        TableSession {
            state: ClientState::new(identity),
            clock: ClockReconciler::new(clock_period),
            dispatcher: ActionDispatcher::new(),
            log: UiLog::default(),
            sink,
        }
    }

    pub fn state(&self) -> &ClientState {
        &self.state
    }

    pub fn clock(&self) -> &ClockReconciler {
        &self.clock
    }

    pub fn dispatcher(&self) -> &ActionDispatcher {
        &self.dispatcher
    }

    pub fn log(&self) -> &UiLog {
        &self.log
    }

    /// Current status line, or a placeholder before the first snapshot.
    pub fn status_text(&self) -> String {
        match &self.state.snapshot {
            Some(snapshot) => phase_table::status_text(snapshot),
            None => "Not at a table".to_string(),
        }
    }

    pub fn eligibility(&self) -> EligibleActions {
        self.dispatcher.visible_eligibility(&self.state)
    }

    pub fn join(&mut self) -> Result<(), DispatchError> {
        let event = ClientEvent::JoinTable {
            session_id: self.state.identity.session_id.clone(),
        };
        self.sink.send(event)?;
        Ok(())
    }

    /// Release the seat and forget everything about the table.
    pub fn leave(&mut self) -> Result<(), DispatchError> {
        let seat = self.state.seat.ok_or(DispatchError::NotSeated)?;
        self.sink.send(ClientEvent::LeaveTable {
            session_id: self.state.identity.session_id.clone(),
            table_id: seat.table_id,
        })?;
        info!(table = seat.table_id, "left table");
        self.state.seat = None;
        self.state.snapshot = None;
        self.dispatcher.reset();
        self.clock.clear();
        Ok(())
    }

    pub fn apply(&mut self, event: ServerEvent) -> SessionUpdate {
        match event {
            ServerEvent::GameStateUpdate(wire) => {
                let timer = wire.timer;
                match apply_snapshot(&mut self.state, wire) {
                    Ok(_) => {
                        self.dispatcher.on_snapshot(&self.state);
                        if let Some(seconds) = timer {
                            self.clock.on_server_tick(seconds);
                        }
                        SessionUpdate::Snapshot
                    }
                    Err(e) => {
                        self.log.last_error = Some(e.to_string());
                        SessionUpdate::Error
                    }
                }
            }
            ServerEvent::TableJoined {
                table_id,
                game_id,
                min_chips,
            } => {
                info!(table = table_id, "seated");
                self.state.seat = Some(TableSeat {
                    table_id,
                    game_id,
                    min_chips,
                });
                SessionUpdate::Seated
            }
            ServerEvent::PlayerJoined(p) => {
                self.log.system(format!("{} joined the table", p.display_name()));
                SessionUpdate::Log
            }
            ServerEvent::PlayerLeft(p) => {
                self.log.system(format!("{} left the table", p.display_name()));
                SessionUpdate::Log
            }
            ServerEvent::GameStarted {} => {
                self.log.system("Game started");
                SessionUpdate::Log
            }
            ServerEvent::TimerUpdate { timer } => {
                self.clock.on_server_tick(timer);
                SessionUpdate::Clock
            }
            ServerEvent::ChatMessage(msg) => {
                self.log.chat.push(chat_line(&msg));
                SessionUpdate::Log
            }
            ServerEvent::HandResult(result) => {
                let text = format_hand_result(&result);
                self.log.chat.push(text.clone());
                self.log.last_info = Some(text);
                SessionUpdate::Log
            }
            ServerEvent::Error { message } => {
                warn!(%message, "server error");
                self.log.last_error = Some(message);
                SessionUpdate::Error
            }
        }
    }

    /// Dispatch a decision. Failures are also kept as the last error.
    pub fn submit(&mut self, action: Action) -> Result<(), DispatchError> {
        match self.dispatcher.submit(&self.state, action, &self.sink) {
            Ok(()) => {
                self.log.last_error = None;
                Ok(())
            }
            Err(e) => {
                debug!(error = %e, "action refused");
                self.log.last_error = Some(e.to_string());
                Err(e)
            }
        }
    }

    /// Send a chat line. Returns `Ok(false)` for blank input, which is ignored.
    pub fn send_chat(&mut self, text: &str) -> Result<bool, DispatchError> {
        let text = text.trim();
        if text.is_empty() {
            return Ok(false);
        }
        let seat = self.state.seat.ok_or(DispatchError::NotSeated)?;
        if self.state.snapshot.as_ref().is_some_and(|s| !s.chat_enabled) {
            return Err(DispatchError::ChatDisabled);
        }
        self.sink.send(ClientEvent::ChatMessage {
            session_id: self.state.identity.session_id.clone(),
            table_id: seat.table_id,
            message: text.to_string(),
        })?;
        Ok(true)
    }
}

/// `[HH:MM:SS] name: text`, the time taken from an ISO-8601 timestamp.
fn chat_line(msg: &ChatMessage) -> String {
    let name = msg.username.as_deref().unwrap_or("Anonymous");
    match msg.timestamp.as_deref().and_then(short_time) {
        Some(time) => format!("[{}] {}: {}", time, name, msg.message),
        None => format!("{}: {}", name, msg.message),
    }
}

fn short_time(timestamp: &str) -> Option<&str> {
    let (_, time) = timestamp.split_once('T')?;
    time.get(..8)
}
