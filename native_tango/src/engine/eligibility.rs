//! Which actions the local player may take for a given snapshot.

use tango_shared::{BettingRound, PlayerId};

use super::action::Action;
use super::phase_table::{self, ControlRule};
use super::state::GameSnapshot;

/// Legal actions of the local player right now. The default is "nothing".
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct EligibleActions {
    pub place_ante: bool,
    pub choose_trash: bool,
    pub choose_tango: bool,
    pub may_check: bool,
    pub may_fold: bool,
    /// Amount to match when facing a bet.
    pub call_amount: Option<u32>,
    /// Smallest permitted raise, when raising is allowed.
    pub min_raise: Option<u32>,
}

impl EligibleActions {
    pub fn none() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        *self == Self::none()
    }

    /// True if the action kind is offered. Amount bounds are checked by
    /// the dispatcher, which knows the chip balance.
    pub fn permits(&self, action: &Action) -> bool {
        match action {
            Action::PlaceAnte(_) => self.place_ante,
            Action::ChooseTrash(_) => self.choose_trash,
            Action::ChooseTango(_) => self.choose_tango,
            Action::Check => self.may_check,
            Action::Call => self.call_amount.is_some(),
            Action::Raise(_) => self.min_raise.is_some(),
            Action::Fold => self.may_fold,
        }
    }

    /// Short labels for the offered controls, in a stable order.
    pub fn labels(&self) -> Vec<String> {
        let mut out = Vec::new();
        if self.place_ante {
            out.push("ante <amount>".to_string());
        }
        if self.choose_trash {
            out.push("trash <0|1|2>".to_string());
        }
        if self.choose_tango {
            out.push("tango <0|1|2>".to_string());
        }
        if self.may_check {
            out.push("check".to_string());
        }
        if let Some(amount) = self.call_amount {
            out.push(format!("call ({})", amount));
        }
        if let Some(min) = self.min_raise {
            out.push(format!("raise <amount >= {}>", min));
        }
        if self.may_fold {
            out.push("fold".to_string());
        }
        out
    }
}

pub fn compute_eligibility(snapshot: &GameSnapshot, local_id: PlayerId) -> EligibleActions {
    let Some(my_index) = snapshot.player_index(local_id) else {
        return EligibleActions::none();
    };
    let me = &snapshot.players[my_index];
    let decisions = me.decisions();

    match phase_table::entry(&snapshot.phase).controls {
        ControlRule::Ante => EligibleActions {
            place_ante: !me.has_last_action_field(),
            ..EligibleActions::none()
        },
        ControlRule::Trash => EligibleActions {
            choose_trash: decisions.kill.is_none(),
            ..EligibleActions::none()
        },
        ControlRule::Tango => EligibleActions {
            choose_tango: decisions.kick.is_none(),
            ..EligibleActions::none()
        },
        ControlRule::Betting(round) => betting_turn(snapshot, my_index, round),
        ControlRule::Observe => EligibleActions::none(),
    }
}

fn betting_turn(snapshot: &GameSnapshot, my_index: usize, round: BettingRound) -> EligibleActions {
    if snapshot.current_player_index != Some(my_index) {
        return EligibleActions::none();
    }
    if round.marks(snapshot.players[my_index].last_action_text()) {
        return EligibleActions::none();
    }
    let facing_bet = snapshot
        .previous_index(my_index)
        .and_then(|prev| snapshot.players.get(prev))
        .is_some_and(|prev| round.marks(prev.last_action_text()));

    if facing_bet {
        EligibleActions {
            may_fold: true,
            call_amount: Some(snapshot.current_bet),
            min_raise: Some(snapshot.current_bet.saturating_add(1)),
            ..EligibleActions::none()
        }
    } else {
        EligibleActions {
            may_check: true,
            min_raise: Some(1),
            ..EligibleActions::none()
        }
    }
}
