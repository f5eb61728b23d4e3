//! Client-owned state: who we are, where we sit, and the latest table snapshot.

use tango_shared::{Card, Phase, PlayerId, PlayerRecord, PlayerView, WinnerSummary};

/// The local player, as provisioned by the identity service.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LocalIdentity {
    pub session_id: String,
    pub player_id: PlayerId,
    pub username: Option<String>,
    pub chips: u32,
    pub is_permanent: bool,
}

impl From<PlayerRecord> for LocalIdentity {
    fn from(record: PlayerRecord) -> Self {
        LocalIdentity {
            session_id: record.session_id,
            player_id: record.id,
            username: record.username,
            chips: record.chips,
            is_permanent: record.is_permanent,
        }
    }
}

/// Seat assignment returned when `join_table` is acknowledged.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TableSeat {
    pub table_id: u64,
    pub game_id: Option<u64>,
    pub min_chips: Option<u32>,
}

/// Local identifier of a hand, used to scope one-shot decisions.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct HandKey(pub u64);

impl HandKey {
    pub fn next(self) -> HandKey {
        HandKey(self.0 + 1)
    }
}

/// Validated table state. Required fields are guaranteed present.
#[derive(Clone, Debug, PartialEq)]
pub struct GameSnapshot {
    pub phase: Phase,
    pub players: Vec<PlayerView>,
    pub pot: u32,
    pub community_cards: Vec<Card>,
    /// Kept optional instead of defaulting to 0: an absent turn index must
    /// never grant anyone a betting turn.
    pub current_player_index: Option<usize>,
    pub current_bet: u32,
    pub timer_seconds: Option<f64>,
    pub chat_enabled: bool,
    pub current_hand: Option<u64>,
    pub winner: Option<WinnerSummary>,
}

impl GameSnapshot {
    pub fn player_index(&self, id: PlayerId) -> Option<usize> {
        self.players.iter().position(|p| p.id == id)
    }

    pub fn player(&self, id: PlayerId) -> Option<&PlayerView> {
        self.players.iter().find(|p| p.id == id)
    }

    /// Player whose turn it is, if the index is present and in range.
    pub fn current_player(&self) -> Option<&PlayerView> {
        self.current_player_index
            .and_then(|idx| self.players.get(idx))
    }

    /// Seat before `index`, wrapping from the first seat to the last.
    pub fn previous_index(&self, index: usize) -> Option<usize> {
        let count = self.players.len();
        if count == 0 {
            return None;
        }
        Some((index % count + count - 1) % count)
    }
}

/// Everything the client tracks about one table connection.
///
/// Fields are owned by disjoint writers: `snapshot` and `hand` by the
/// reducer, `seat` by the join acknowledgement, `identity` by the identity
/// service.
#[derive(Clone, Debug)]
pub struct ClientState {
    pub identity: LocalIdentity,
    pub seat: Option<TableSeat>,
    pub snapshot: Option<GameSnapshot>,
    pub hand: HandKey,
}

impl ClientState {
    pub fn new(identity: LocalIdentity) -> Self {
        ClientState {
            identity,
            seat: None,
            snapshot: None,
            hand: HandKey::default(),
        }
    }

    /// Our own record in the latest snapshot.
    pub fn me(&self) -> Option<&PlayerView> {
        self.snapshot
            .as_ref()
            .and_then(|s| s.player(self.identity.player_id))
    }

    /// Chips available for betting: the table's figure when seated,
    /// otherwise the identity balance.
    pub fn available_chips(&self) -> u32 {
        self.me()
            .map(|p| p.chips)
            .unwrap_or(self.identity.chips)
    }
}
