//! Sends each user decision to the server exactly once.
//!
//! A submitted decision leaves an [`InFlight`] token behind that blocks
//! further submissions until a snapshot confirms the decision (or the hand
//! or phase moves on). Trash and tango are additionally locked for the
//! rest of the hand the moment they are sent.

use std::collections::HashSet;

use tango_shared::{ActionRequest, BettingRound, ClientEvent, Phase};
use tracing::{debug, error};

use super::action::{check_affordable, Action};
use super::eligibility::{compute_eligibility, EligibleActions};
use super::state::{ClientState, HandKey};
use crate::error::{DispatchError, InputError, TransportError};

/// Non-blocking outbound channel towards the server.
pub trait ActionSink {
    fn send(&self, event: ClientEvent) -> Result<(), TransportError>;
}

/// The decision a submission belongs to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum DecisionKind {
    Ante,
    Trash,
    Tango,
    Bet(BettingRound),
}

impl DecisionKind {
    fn of(action: &Action, phase: &Phase) -> Option<DecisionKind> {
        match action {
            Action::PlaceAnte(_) => Some(DecisionKind::Ante),
            Action::ChooseTrash(_) => Some(DecisionKind::Trash),
            Action::ChooseTango(_) => Some(DecisionKind::Tango),
            Action::Check | Action::Call | Action::Raise(_) | Action::Fold => {
                phase.betting_round().map(DecisionKind::Bet)
            }
        }
    }

    fn one_shot(self) -> bool {
        matches!(self, DecisionKind::Trash | DecisionKind::Tango)
    }
}

/// A sent decision awaiting confirmation.
#[derive(Clone, Debug, PartialEq)]
pub struct InFlight {
    pub hand: HandKey,
    pub kind: DecisionKind,
    pub phase: Phase,
    /// Our `last_action` at the time of sending.
    pub baseline: Option<Option<String>>,
    pub turn: Option<usize>,
}

#[derive(Debug, Default)]
pub struct ActionDispatcher {
    in_flight: Option<InFlight>,
    spent: HashSet<(HandKey, DecisionKind)>,
}

impl ActionDispatcher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn in_flight(&self) -> Option<&InFlight> {
        self.in_flight.as_ref()
    }

    pub fn is_spent(&self, hand: HandKey, kind: DecisionKind) -> bool {
        self.spent.contains(&(hand, kind))
    }

    /// Validate `action` against the current state and send it.
    ///
    /// On a transport failure nothing is recorded, so the user may retry.
    pub fn submit<S: ActionSink + ?Sized>(
        &mut self,
        state: &ClientState,
        action: Action,
        sink: &S,
    ) -> Result<(), DispatchError> {
        let seat = state.seat.ok_or(DispatchError::NotSeated)?;
        let snapshot = state.snapshot.as_ref().ok_or(DispatchError::NotEligible {
            action: action.name(),
            phase: Phase::Waiting,
        })?;
        let me_id = state.identity.player_id;
        let my_index = snapshot
            .player_index(me_id)
            .ok_or(DispatchError::NotAtTable(me_id))?;
        let not_eligible = || DispatchError::NotEligible {
            action: action.name(),
            phase: snapshot.phase.clone(),
        };
        let kind = DecisionKind::of(&action, &snapshot.phase).ok_or_else(not_eligible)?;

        if self.in_flight.is_some() {
            return Err(DispatchError::InFlight);
        }
        if self.is_spent(state.hand, kind) {
            return Err(DispatchError::AlreadyDecided);
        }

        let eligible = compute_eligibility(snapshot, me_id);
        if !eligible.permits(&action) {
            return Err(not_eligible());
        }
        let call_amount = eligible.call_amount.unwrap_or(0);
        validate_amount(&action, &eligible, state.available_chips())?;

        let (action_type, action_data) = action.to_wire(call_amount);
        let event = ClientEvent::PlayerAction(ActionRequest {
            session_id: state.identity.session_id.clone(),
            table_id: seat.table_id,
            action_type,
            action_data,
        });

        self.in_flight = Some(InFlight {
            hand: state.hand,
            kind,
            phase: snapshot.phase.clone(),
            baseline: snapshot.players[my_index].last_action.clone(),
            turn: snapshot.current_player_index,
        });
        if kind.one_shot() {
            self.spent.insert((state.hand, kind));
        }

        if let Err(e) = sink.send(event) {
            error!(error = %e, action = %action, "failed to send action");
            self.in_flight = None;
            self.spent.remove(&(state.hand, kind));
            return Err(e.into());
        }
        debug!(action = %action, hand = state.hand.0, "action sent");
        Ok(())
    }

    /// Called after every applied snapshot; clears the token once the
    /// server has confirmed the decision or moved on.
    pub fn on_snapshot(&mut self, state: &ClientState) {
        let hand = state.hand;
        self.spent.retain(|(h, _)| *h == hand);

        let Some(token) = self.in_flight.as_ref() else {
            return;
        };
        let Some(snapshot) = state.snapshot.as_ref() else {
            return;
        };

        let settled = if token.hand != hand || token.phase != snapshot.phase {
            true
        } else {
            match snapshot.player_index(state.identity.player_id) {
                None => true,
                Some(idx) => {
                    let me = &snapshot.players[idx];
                    match token.kind {
                        DecisionKind::Ante => me.last_action != token.baseline,
                        DecisionKind::Trash => me.decisions().kill.is_some(),
                        DecisionKind::Tango => me.decisions().kick.is_some(),
                        DecisionKind::Bet(_) => {
                            me.last_action != token.baseline
                                || snapshot.current_player_index != Some(idx)
                        }
                    }
                }
            }
        };

        if settled {
            debug!(kind = ?token.kind, "in-flight action settled");
            self.in_flight = None;
        }
    }

    /// Eligibility as it should be shown: nothing while a decision is in
    /// flight, and no trash/tango controls once they were used this hand.
    pub fn visible_eligibility(&self, state: &ClientState) -> EligibleActions {
        let Some(snapshot) = state.snapshot.as_ref() else {
            return EligibleActions::none();
        };
        if self.in_flight.is_some() {
            return EligibleActions::none();
        }
        let mut eligible = compute_eligibility(snapshot, state.identity.player_id);
        if self.is_spent(state.hand, DecisionKind::Trash) {
            eligible.choose_trash = false;
        }
        if self.is_spent(state.hand, DecisionKind::Tango) {
            eligible.choose_tango = false;
        }
        eligible
    }

    pub fn reset(&mut self) {
        self.in_flight = None;
        self.spent.clear();
    }
}

fn validate_amount(
    action: &Action,
    eligible: &EligibleActions,
    chips: u32,
) -> Result<(), InputError> {
    match *action {
        Action::PlaceAnte(amount) => check_affordable(amount, chips),
        Action::Call => check_affordable(eligible.call_amount.unwrap_or(0), chips),
        Action::Raise(amount) => {
            let minimum = eligible.min_raise.unwrap_or(1);
            if amount < minimum {
                return Err(InputError::BelowMinimum { minimum });
            }
            check_affordable(amount, chips)
        }
        _ => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;

    use super::*;
    use crate::engine::action::CardSlot;
    use crate::engine::state::{GameSnapshot, LocalIdentity, TableSeat};
    use tango_shared::{ActionData, ActionType, Decisions, PlayerView};

    #[derive(Default)]
    struct Recorder {
        sent: RefCell<Vec<ClientEvent>>,
        fail: bool,
    }

    impl ActionSink for Recorder {
        fn send(&self, event: ClientEvent) -> Result<(), TransportError> {
            if self.fail {
                return Err(TransportError::NotConnected);
            }
            self.sent.borrow_mut().push(event);
            Ok(())
        }
    }

    fn seated(phase: Phase, players: Vec<PlayerView>) -> ClientState {
        let mut state = ClientState::new(LocalIdentity {
            session_id: "sess".into(),
            player_id: 1.into(),
            username: Some("me".into()),
            chips: 100,
            is_permanent: false,
        });
        state.seat = Some(TableSeat {
            table_id: 7,
            game_id: None,
            min_chips: None,
        });
        state.snapshot = Some(GameSnapshot {
            phase,
            players,
            pot: 0,
            community_cards: Vec::new(),
            current_player_index: None,
            current_bet: 0,
            timer_seconds: None,
            chat_enabled: true,
            current_hand: None,
            winner: None,
        });
        state
    }

    #[test]
    fn ante_is_sent_as_bet_and_blocks_until_confirmed() {
        let mut state = seated(Phase::Ante, vec![PlayerView::new(1, "me", 100)]);
        let sink = Recorder::default();
        let mut d = ActionDispatcher::new();

        d.submit(&state, Action::PlaceAnte(5), &sink).unwrap();
        assert!(matches!(
            d.submit(&state, Action::PlaceAnte(5), &sink),
            Err(DispatchError::InFlight)
        ));
        match &sink.sent.borrow()[0] {
            ClientEvent::PlayerAction(req) => {
                assert_eq!(req.action_type, ActionType::Bet);
                assert_eq!(req.action_data, ActionData::Amount { amount: 5 });
                assert_eq!(req.table_id, 7);
            }
            other => panic!("unexpected {:?}", other),
        }

        // A repeated snapshot without our ante keeps the token.
        d.on_snapshot(&state);
        assert!(d.in_flight().is_some());

        if let Some(s) = state.snapshot.as_mut() {
            s.players[0].last_action = Some(None);
        }
        d.on_snapshot(&state);
        assert!(d.in_flight().is_none());
        assert!(d.visible_eligibility(&state).is_empty());
    }

    #[test]
    fn transport_failure_rolls_back() {
        let state = seated(Phase::ChooseTrash, vec![PlayerView::new(1, "me", 100)]);
        let broken = Recorder {
            fail: true,
            ..Recorder::default()
        };
        let mut d = ActionDispatcher::new();
        let slot = CardSlot::try_from(0).unwrap();

        assert!(matches!(
            d.submit(&state, Action::ChooseTrash(slot), &broken),
            Err(DispatchError::Transport(_))
        ));
        assert!(d.in_flight().is_none());
        assert!(d.visible_eligibility(&state).choose_trash);

        let sink = Recorder::default();
        d.submit(&state, Action::ChooseTrash(slot), &sink).unwrap();
        assert_eq!(sink.sent.borrow().len(), 1);
    }

    #[test]
    fn trash_stays_locked_after_phase_moves_on() {
        let mut state = seated(Phase::ChooseTrash, vec![PlayerView::new(1, "me", 100)]);
        let sink = Recorder::default();
        let mut d = ActionDispatcher::new();
        d.submit(&state, Action::ChooseTrash(CardSlot::try_from(2).unwrap()), &sink)
            .unwrap();

        if let Some(s) = state.snapshot.as_mut() {
            s.players[0].decisions = Some(Decisions {
                kill: Some(2),
                ..Decisions::default()
            });
        }
        d.on_snapshot(&state);
        assert!(d.in_flight().is_none());
        assert!(matches!(
            d.submit(&state, Action::ChooseTrash(CardSlot::try_from(1).unwrap()), &sink),
            Err(DispatchError::AlreadyDecided)
        ));

        state.hand = state.hand.next();
        d.on_snapshot(&state);
        assert!(!d.is_spent(state.hand, DecisionKind::Trash));
    }

    #[test]
    fn raise_below_minimum_is_rejected_without_sending() {
        let mut prev = PlayerView::new(0, "them", 100);
        prev.last_action = Some(Some("final_bet_10".into()));
        let mut me = PlayerView::new(1, "me", 40);
        me.last_action = Some(None);
        let mut state = seated(Phase::FinalBetting, vec![prev, me]);
        if let Some(s) = state.snapshot.as_mut() {
            s.current_player_index = Some(1);
            s.current_bet = 10;
        }
        let sink = Recorder::default();
        let mut d = ActionDispatcher::new();

        assert!(matches!(
            d.submit(&state, Action::Raise(10), &sink),
            Err(DispatchError::Input(InputError::BelowMinimum { minimum: 11 }))
        ));
        assert!(matches!(
            d.submit(&state, Action::Raise(41), &sink),
            Err(DispatchError::Input(InputError::ExceedsChips { .. }))
        ));
        assert!(matches!(
            d.submit(&state, Action::Check, &sink),
            Err(DispatchError::NotEligible { .. })
        ));
        assert!(sink.sent.borrow().is_empty());

        d.submit(&state, Action::Call, &sink).unwrap();
        match &sink.sent.borrow()[0] {
            ClientEvent::PlayerAction(req) => {
                assert_eq!(req.action_data, ActionData::Amount { amount: 10 })
            }
            other => panic!("unexpected {:?}", other),
        }

        // Turn passes to the next player: the bet is settled.
        if let Some(s) = state.snapshot.as_mut() {
            s.current_player_index = Some(0);
        }
        d.on_snapshot(&state);
        assert!(d.in_flight().is_none());
    }

    #[test]
    fn unseated_or_absent_player_cannot_submit() {
        let mut state = seated(Phase::Ante, vec![PlayerView::new(2, "other", 100)]);
        let sink = Recorder::default();
        let mut d = ActionDispatcher::new();
        assert!(matches!(
            d.submit(&state, Action::PlaceAnte(1), &sink),
            Err(DispatchError::NotAtTable(_))
        ));
        state.seat = None;
        assert!(matches!(
            d.submit(&state, Action::PlaceAnte(1), &sink),
            Err(DispatchError::NotSeated)
        ));
    }
}
