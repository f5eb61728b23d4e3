//! Error types of the client engine.
//!
//! Every variant is recoverable: callers keep their previous state and
//! surface the message to the user.

use tango_shared::{Phase, PlayerId};
use thiserror::Error;

/// A pushed update broke the protocol; the update is discarded.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ProtocolError {
    #[error("snapshot is missing its phase")]
    MissingPhase,
    #[error("snapshot is missing the player list")]
    MissingPlayers,
    #[error("player {player} has card decision {index} outside the hand")]
    DecisionOutOfRange { player: PlayerId, index: usize },
    #[error("malformed frame: {0}")]
    Malformed(String),
}

/// Rejected user input; nothing was sent.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum InputError {
    #[error("'{0}' is not a number")]
    NotANumber(String),
    #[error("amount must be greater than zero")]
    NotPositive,
    #[error("amount {amount} exceeds your {chips} chips")]
    ExceedsChips { amount: u32, chips: u32 },
    #[error("raise must be at least {minimum}")]
    BelowMinimum { minimum: u32 },
    #[error("card slot {0} does not exist (choose 0, 1 or 2)")]
    BadSlot(usize),
}

/// The socket or channel towards the server failed.
#[derive(Debug, Error)]
pub enum TransportError {
    #[error("not connected")]
    NotConnected,
    #[error("websocket error: {0}")]
    WebSocket(#[from] tokio_tungstenite::tungstenite::Error),
    #[error("encoding frame: {0}")]
    Encode(#[from] serde_json::Error),
    #[error("invalid server url: {0}")]
    Url(#[from] url::ParseError),
    #[error("unsupported url scheme '{0}'")]
    UnsupportedScheme(String),
}

/// Why an action was not dispatched.
#[derive(Debug, Error)]
pub enum DispatchError {
    #[error("{action} is not available during {phase}")]
    NotEligible { action: &'static str, phase: Phase },
    #[error("waiting for the server to confirm your previous action")]
    InFlight,
    #[error("that choice was already made this hand")]
    AlreadyDecided,
    #[error("not seated at a table")]
    NotSeated,
    #[error("player {0} is not at this table")]
    NotAtTable(PlayerId),
    #[error("chat is currently disabled")]
    ChatDisabled,
    #[error(transparent)]
    Input(#[from] InputError),
    #[error(transparent)]
    Transport(#[from] TransportError),
}

/// The identity service refused or could not be reached.
#[derive(Debug, Error)]
pub enum IdentityError {
    #[error("identity request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("{0}")]
    Rejected(String),
}
