//! Wire protocol shared by the Trash & Tango server and its clients.

pub mod cards;
pub mod game;
pub mod identity;
pub mod messages;
pub mod player;

pub use cards::{Card, Rank, Suit};
pub use game::{BettingRound, ChatMessage, HandResult, Phase, Winner};
pub use identity::{ApiError, ClaimChipsRequest, CreatePlayerRequest, PlayerRecord, SetUsernameRequest};
pub use messages::{
    ActionData, ActionRequest, ActionType, ClientEvent, PlayerPresence, ServerEvent, SnapshotWire,
    WinnerSummary,
};
pub use player::{Decisions, PlayerId, PlayerStatus, PlayerView};
