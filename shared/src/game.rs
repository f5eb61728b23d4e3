//! Phases, betting rounds and hand results for the Trash & Tango table.

use serde::{Deserialize, Serialize};

/// Server-declared stage of a hand.
///
/// The set is closed; anything else the server pushes ends up in `Unknown`
/// and is treated as display-only.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Phase {
    Waiting,
    Ante,
    CardDraw,
    ChooseTrash,
    ChooseTango,
    PreKickBetting,
    TurnDraw,
    PostTurnBetting,
    BoardReveal,
    FinalBetting,
    Showdown,
    End,
    Unknown(String),
}

impl Phase {
    /// Known phases in canonical transition order.
    pub const CANONICAL: [Phase; 12] = [
        Phase::Waiting,
        Phase::Ante,
        Phase::CardDraw,
        Phase::ChooseTrash,
        Phase::ChooseTango,
        Phase::PreKickBetting,
        Phase::TurnDraw,
        Phase::PostTurnBetting,
        Phase::BoardReveal,
        Phase::FinalBetting,
        Phase::Showdown,
        Phase::End,
    ];

    pub fn parse(s: &str) -> Phase {
        match s {
            "waiting" => Phase::Waiting,
            "ante" => Phase::Ante,
            "card_draw" => Phase::CardDraw,
            "choose_trash" => Phase::ChooseTrash,
            "choose_tango" => Phase::ChooseTango,
            "pre_kick_betting" => Phase::PreKickBetting,
            "turn_draw" => Phase::TurnDraw,
            "post_turn_betting" => Phase::PostTurnBetting,
            "board_reveal" => Phase::BoardReveal,
            "final_betting" => Phase::FinalBetting,
            "showdown" => Phase::Showdown,
            "end" => Phase::End,
            other => Phase::Unknown(other.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Phase::Waiting => "waiting",
            Phase::Ante => "ante",
            Phase::CardDraw => "card_draw",
            Phase::ChooseTrash => "choose_trash",
            Phase::ChooseTango => "choose_tango",
            Phase::PreKickBetting => "pre_kick_betting",
            Phase::TurnDraw => "turn_draw",
            Phase::PostTurnBetting => "post_turn_betting",
            Phase::BoardReveal => "board_reveal",
            Phase::FinalBetting => "final_betting",
            Phase::Showdown => "showdown",
            Phase::End => "end",
            Phase::Unknown(raw) => raw,
        }
    }

    /// Position in the canonical order; `None` for unknown phases.
    pub fn ordinal(&self) -> Option<usize> {
        Phase::CANONICAL.iter().position(|p| p == self)
    }

    /// The betting round this phase runs, if it is one of the three betting phases.
    pub fn betting_round(&self) -> Option<BettingRound> {
        match self {
            Phase::PreKickBetting => Some(BettingRound::PreKick),
            Phase::PostTurnBetting => Some(BettingRound::PostTurn),
            Phase::FinalBetting => Some(BettingRound::Final),
            _ => None,
        }
    }
}

impl From<String> for Phase {
    fn from(s: String) -> Self {
        Phase::parse(&s)
    }
}

impl From<Phase> for String {
    fn from(phase: Phase) -> Self {
        phase.as_str().to_string()
    }
}

impl std::fmt::Display for Phase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The three betting rounds of a hand.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum BettingRound {
    PreKick,
    PostTurn,
    Final,
}

impl BettingRound {
    /// Marker the server embeds in `last_action` once a player bet this round.
    pub fn bet_prefix(self) -> &'static str {
        match self {
            BettingRound::PreKick => "pre_kick_bet",
            BettingRound::PostTurn => "post_turn_bet",
            BettingRound::Final => "final_bet",
        }
    }

    /// True if `last_action` records a bet made in this round.
    pub fn marks(self, last_action: Option<&str>) -> bool {
        last_action.is_some_and(|a| a.contains(self.bet_prefix()))
    }
}

/// One pot award of a finished hand.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Winner {
    pub username: String,
    pub amount_won: u32,
    #[serde(default)]
    pub is_main_winner: bool,
}

/// Terminal result of a hand, winners in the order the server sent them.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "HandResultWire")]
pub struct HandResult {
    pub winners: Vec<Winner>,
}

#[derive(Deserialize)]
struct LegacyWinner {
    #[serde(default)]
    username: Option<String>,
}

/// Both result shapes the server has pushed: the winners sequence and the
/// older single `winner` + `pot_amount` payload.
#[derive(Deserialize)]
#[serde(untagged)]
enum HandResultWire {
    Winners {
        winners: Vec<Winner>,
    },
    Single {
        winner: LegacyWinner,
        #[serde(default)]
        pot_amount: u32,
    },
}

impl From<HandResultWire> for HandResult {
    fn from(wire: HandResultWire) -> Self {
        match wire {
            HandResultWire::Winners { winners } => HandResult { winners },
            HandResultWire::Single { winner, pot_amount } => HandResult {
                winners: vec![Winner {
                    username: winner.username.unwrap_or_else(|| "Anonymous".into()),
                    amount_won: pot_amount,
                    is_main_winner: true,
                }],
            },
        }
    }
}

/// A chat line broadcast by the server.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub timestamp: Option<String>,
    pub message: String,
}
