//! Static description of every phase: status text, side effects and which
//! control rule applies.

use tango_shared::{BettingRound, Phase};

use super::state::GameSnapshot;

/// Local side effects a phase asks for.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct PhaseEffects {
    pub reveal_board: bool,
    pub reveal_hands: bool,
    pub show_turn_card: bool,
    /// The server advances this phase on a timer.
    pub server_timed: bool,
}

/// Which eligibility rule governs the controls.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ControlRule {
    Ante,
    Trash,
    Tango,
    Betting(BettingRound),
    Observe,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PhaseEntry {
    pub effects: PhaseEffects,
    pub controls: ControlRule,
}

const fn effects(
    reveal_board: bool,
    reveal_hands: bool,
    show_turn_card: bool,
    server_timed: bool,
) -> PhaseEffects {
    PhaseEffects {
        reveal_board,
        reveal_hands,
        show_turn_card,
        server_timed,
    }
}

pub fn entry(phase: &Phase) -> PhaseEntry {
    let (effects, controls) = match phase {
        Phase::Waiting => (effects(false, false, false, false), ControlRule::Observe),
        Phase::Ante => (effects(false, false, false, false), ControlRule::Ante),
        Phase::CardDraw => (effects(false, false, false, true), ControlRule::Observe),
        Phase::ChooseTrash => (effects(false, false, false, true), ControlRule::Trash),
        Phase::ChooseTango => (effects(false, false, false, true), ControlRule::Tango),
        Phase::PreKickBetting => (
            effects(false, false, false, true),
            ControlRule::Betting(BettingRound::PreKick),
        ),
        Phase::TurnDraw => (effects(false, false, true, true), ControlRule::Observe),
        Phase::PostTurnBetting => (
            effects(false, false, true, true),
            ControlRule::Betting(BettingRound::PostTurn),
        ),
        Phase::BoardReveal => (effects(true, false, true, true), ControlRule::Observe),
        Phase::FinalBetting => (
            effects(true, false, true, true),
            ControlRule::Betting(BettingRound::Final),
        ),
        Phase::Showdown => (effects(true, true, true, false), ControlRule::Observe),
        Phase::End => (effects(true, true, true, true), ControlRule::Observe),
        Phase::Unknown(_) => (PhaseEffects::default(), ControlRule::Observe),
    };
    PhaseEntry { effects, controls }
}

/// Human status line for the snapshot's phase.
pub fn status_text(snapshot: &GameSnapshot) -> String {
    let base = match &snapshot.phase {
        Phase::Waiting => "Waiting for players...",
        Phase::Ante => "Before starting, please put an ante in the pot.",
        Phase::CardDraw => "Cards are drawn. Game starting soon...",
        Phase::ChooseTrash => "Choose Card to Trash!",
        Phase::ChooseTango => "Choose Card to Tango!",
        Phase::PreKickBetting => "Pre-Draw-Card Betting Round",
        Phase::TurnDraw => "Draw Card Round",
        Phase::PostTurnBetting => "Post-Draw-Card Betting Round",
        Phase::BoardReveal => "Community Cards Revealed",
        Phase::FinalBetting => "Final Betting Round",
        Phase::Showdown => "Showdown",
        Phase::End => {
            return match snapshot.winner.as_ref().and_then(|w| w.username.as_deref()) {
                Some(name) => format!("{} wins the pot!", name),
                None => "Hand complete".to_string(),
            };
        }
        Phase::Unknown(raw) => return raw.clone(),
    };

    if snapshot.phase.betting_round().is_some() {
        if let Some(player) = snapshot.current_player() {
            return format!("{}: {} to act", base, player.display_name());
        }
    }
    base.to_string()
}
