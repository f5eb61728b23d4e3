//! Client-server messaging protocol for the Trash & Tango table.
//!
//! Frames are JSON objects `{"type": <event>, "data": <payload>}`.

use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize};

use crate::cards::Card;
use crate::game::{ChatMessage, HandResult, Phase};
use crate::player::{PlayerId, PlayerView};

/// Table state exactly as pushed by the server.
///
/// Every field is optional here; the client validates the required ones
/// (`state`, `players`) once, when it reduces the snapshot.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct SnapshotWire {
    #[serde(default, rename = "state", alias = "phase")]
    pub phase: Option<Phase>,
    #[serde(default)]
    pub players: Option<Vec<PlayerView>>,
    #[serde(default)]
    pub pot: Option<u32>,
    #[serde(default)]
    pub community_cards: Option<Vec<Card>>,
    #[serde(default, deserialize_with = "lenient_number")]
    pub current_player_index: Option<usize>,
    #[serde(default, deserialize_with = "lenient_number")]
    pub current_bet: Option<u32>,
    #[serde(default)]
    pub timer: Option<f64>,
    #[serde(default)]
    pub chat_enabled: Option<bool>,
    #[serde(default, deserialize_with = "lenient_number")]
    pub current_hand: Option<u64>,
    #[serde(default)]
    pub winner: Option<WinnerSummary>,
}

/// Winner of the finished hand as embedded in the `end` snapshot.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct WinnerSummary {
    #[serde(default)]
    pub id: Option<PlayerId>,
    #[serde(default)]
    pub username: Option<String>,
}

/// Presence payload of `player_joined` / `player_left`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerPresence {
    #[serde(default)]
    pub id: Option<PlayerId>,
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub chips: Option<u32>,
}

impl PlayerPresence {
    pub fn display_name(&self) -> &str {
        self.username.as_deref().unwrap_or("Anonymous")
    }
}

/// Messages that the server pushes to clients
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(tag = "type", content = "data", rename_all = "snake_case")]
pub enum ServerEvent {
    GameStateUpdate(SnapshotWire),
    PlayerJoined(PlayerPresence),
    PlayerLeft(PlayerPresence),
    GameStarted {},
    TimerUpdate {
        timer: f64,
    },
    ChatMessage(ChatMessage),
    HandResult(HandResult),
    Error {
        message: String,
    },
    /// Acknowledgement of `join_table`.
    TableJoined {
        table_id: u64,
        #[serde(default)]
        game_id: Option<u64>,
        #[serde(default)]
        min_chips: Option<u32>,
    },
}

/// Messages that clients send to the server
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "data", rename_all = "snake_case")]
pub enum ClientEvent {
    JoinTable {
        session_id: String,
    },
    LeaveTable {
        session_id: String,
        table_id: u64,
    },
    PlayerAction(ActionRequest),
    ChatMessage {
        session_id: String,
        table_id: u64,
        message: String,
    },
}

/// Action type understood by the server.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ActionType {
    Bet,
    Check,
    Fold,
    /// Trash a card.
    Kill,
    /// Tango a card.
    Kick,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ActionData {
    Amount { amount: u32 },
    Card { card_index: usize },
    Empty {},
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActionRequest {
    pub session_id: String,
    pub table_id: u64,
    pub action_type: ActionType,
    pub action_data: ActionData,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawNumber {
    Int(u64),
    Float(f64),
    Text(String),
}

/// Accept an integer, an integral float, a numeric string, or `""`/`null` (absent).
fn lenient_number<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: TryFrom<u64>,
{
    let raw = match Option::<RawNumber>::deserialize(deserializer)? {
        None => return Ok(None),
        Some(raw) => raw,
    };
    let value = match raw {
        RawNumber::Int(n) => n,
        RawNumber::Float(f) if f >= 0.0 && f.fract() == 0.0 => f as u64,
        RawNumber::Float(f) => return Err(D::Error::custom(format!("not a count: {}", f))),
        RawNumber::Text(s) => {
            let trimmed = s.trim();
            if trimmed.is_empty() {
                return Ok(None);
            }
            trimmed
                .parse::<u64>()
                .map_err(|_| D::Error::custom(format!("not a count: '{}'", trimmed)))?
        }
    };
    T::try_from(value)
        .map(Some)
        .map_err(|_| D::Error::custom(format!("count out of range: {}", value)))
}
