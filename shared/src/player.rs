//! Player-related types and identifiers for the Trash & Tango table.

use serde::{Deserialize, Deserializer, Serialize};

use crate::cards::Card;

/// Stable identifier of a player, assigned by the identity service.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(transparent)]
pub struct PlayerId(pub u64);

impl From<u64> for PlayerId {
    fn from(v: u64) -> Self {
        PlayerId(v)
    }
}

impl std::fmt::Display for PlayerId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Seat status as reported by the server.
#[derive(Clone, Debug, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum PlayerStatus {
    #[default]
    Active,
    Folded,
    Checked,
    /// `betted:<round>`; carries the round marker verbatim.
    Betted(String),
}

impl TryFrom<String> for PlayerStatus {
    type Error = String;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        match s.as_str() {
            "active" => Ok(PlayerStatus::Active),
            "folded" => Ok(PlayerStatus::Folded),
            "checked" => Ok(PlayerStatus::Checked),
            other => match other.strip_prefix("betted:") {
                Some(round) => Ok(PlayerStatus::Betted(round.to_string())),
                None => Err(format!("unknown player status '{}'", other)),
            },
        }
    }
}

impl From<PlayerStatus> for String {
    fn from(status: PlayerStatus) -> Self {
        match status {
            PlayerStatus::Active => "active".into(),
            PlayerStatus::Folded => "folded".into(),
            PlayerStatus::Checked => "checked".into(),
            PlayerStatus::Betted(round) => format!("betted:{}", round),
        }
    }
}

/// One-shot card decisions of a hand, as card indices into the dealt hand.
///
/// Write-once per hand: once a slot is `Some` the server never clears it
/// before the next hand starts.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Decisions {
    #[serde(default)]
    pub kill: Option<usize>,
    #[serde(default)]
    pub kick: Option<usize>,
    #[serde(default)]
    pub keep: Option<usize>,
}

/// Public view of a seated player (what everyone at the table can see).
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PlayerView {
    pub id: PlayerId,
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub chips: u32,
    #[serde(default)]
    pub status: PlayerStatus,
    /// Outer `None`: the key is absent (player has not acted this hand).
    /// `Some(None)`: the key is present but null.
    #[serde(
        default,
        deserialize_with = "present_or_null",
        skip_serializing_if = "Option::is_none"
    )]
    pub last_action: Option<Option<String>>,
    /// Only set for the viewer; hidden for opponents.
    #[serde(default)]
    pub cards: Option<Vec<Card>>,
    #[serde(default)]
    pub decisions: Option<Decisions>,
    #[serde(default)]
    pub turn_card: Option<Card>,
    #[serde(default)]
    pub seat: Option<usize>,
}

impl PlayerView {
    pub fn new(id: impl Into<PlayerId>, username: impl Into<String>, chips: u32) -> Self {
        PlayerView {
            id: id.into(),
            username: Some(username.into()),
            chips,
            status: PlayerStatus::Active,
            last_action: None,
            cards: None,
            decisions: None,
            turn_card: None,
            seat: None,
        }
    }

    /// Name to display, falling back to the server's `Player <id>` convention.
    pub fn display_name(&self) -> String {
        self.username
            .clone()
            .unwrap_or_else(|| format!("Player {}", self.id))
    }

    /// True if the `last_action` key exists at all, even if null.
    pub fn has_last_action_field(&self) -> bool {
        self.last_action.is_some()
    }

    /// The last action text, if present and non-null.
    pub fn last_action_text(&self) -> Option<&str> {
        self.last_action.as_ref().and_then(|a| a.as_deref())
    }

    pub fn decisions(&self) -> Decisions {
        self.decisions.unwrap_or_default()
    }
}

/// Deserialize a key that is present into `Some`, keeping `null` as `Some(None)`.
/// Combined with `#[serde(default)]` an absent key stays `None`.
fn present_or_null<'de, D>(deserializer: D) -> Result<Option<Option<String>>, D::Error>
where
    D: Deserializer<'de>,
{
    Option::<String>::deserialize(deserializer).map(Some)
}
