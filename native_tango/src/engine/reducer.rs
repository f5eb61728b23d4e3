//! Snapshot reducer: folds a pushed `SnapshotWire` into the local state.

use tango_shared::{Phase, SnapshotWire};
use tracing::{debug, warn};

use super::action::CardSlot;
use super::state::{ClientState, GameSnapshot, HandKey};
use crate::error::ProtocolError;

/// Merge `incoming` over `previous`.
///
/// Phase, players and pot are taken from `incoming` as-is. Community cards
/// are only replaced when the push carries them. Chat stays enabled unless
/// the server explicitly disables it, and a missing bet reads as zero.
/// A missing turn index stays `None` rather than reading as seat 0, so it
/// never hands a betting turn to anyone. Card decisions must name a slot of
/// the dealt hand.
pub fn reduce(
    previous: Option<&GameSnapshot>,
    incoming: SnapshotWire,
) -> Result<GameSnapshot, ProtocolError> {
    let phase = incoming.phase.ok_or(ProtocolError::MissingPhase)?;
    let players = incoming.players.ok_or(ProtocolError::MissingPlayers)?;
    for player in &players {
        let d = player.decisions();
        if let Some(index) = [d.kill, d.kick, d.keep]
            .into_iter()
            .flatten()
            .find(|&i| i >= CardSlot::COUNT)
        {
            return Err(ProtocolError::DecisionOutOfRange {
                player: player.id,
                index,
            });
        }
    }

    let community_cards = match incoming.community_cards {
        Some(cards) => cards,
        None => previous
            .map(|p| p.community_cards.clone())
            .unwrap_or_default(),
    };

    Ok(GameSnapshot {
        phase,
        players,
        pot: incoming.pot.unwrap_or(0),
        community_cards,
        current_player_index: incoming.current_player_index,
        current_bet: incoming.current_bet.unwrap_or(0),
        timer_seconds: incoming.timer,
        chat_enabled: incoming.chat_enabled != Some(false),
        current_hand: incoming.current_hand,
        winner: incoming.winner,
    })
}

/// Hand key after moving from `previous` to `next`.
pub fn advance_hand(previous: Option<&GameSnapshot>, hand: HandKey, next: &GameSnapshot) -> HandKey {
    let Some(prev) = previous else {
        return hand;
    };
    let reentered_ante = next.phase == Phase::Ante && prev.phase != Phase::Ante;
    let renumbered = matches!(
        (prev.current_hand, next.current_hand),
        (Some(a), Some(b)) if a != b
    );
    if reentered_ante || renumbered {
        hand.next()
    } else {
        hand
    }
}

/// Reduce `incoming` into `state`. On a protocol violation the previous
/// snapshot is kept untouched and the error is returned.
pub fn apply_snapshot<'a>(
    state: &'a mut ClientState,
    incoming: SnapshotWire,
) -> Result<&'a GameSnapshot, ProtocolError> {
    let next = match reduce(state.snapshot.as_ref(), incoming) {
        Ok(next) => next,
        Err(e) => {
            warn!(error = %e, "discarding snapshot");
            return Err(e);
        }
    };

    let hand = advance_hand(state.snapshot.as_ref(), state.hand, &next);
    if let Some(prev) = state.snapshot.as_ref() {
        if hand == state.hand {
            report_anomalies(prev, &next);
        }
    }
    if hand != state.hand {
        debug!(hand = hand.0, "new hand");
    }
    debug!(phase = %next.phase, players = next.players.len(), pot = next.pot, "snapshot applied");

    state.hand = hand;
    Ok(state.snapshot.insert(next))
}

/// Snapshots are applied last-write-wins; these only get logged.
fn report_anomalies(prev: &GameSnapshot, next: &GameSnapshot) {
    if let (Some(a), Some(b)) = (prev.phase.ordinal(), next.phase.ordinal()) {
        if b < a {
            warn!(from = %prev.phase, to = %next.phase, "phase went backwards within a hand");
        }
    }
    for player in &next.players {
        let Some(before) = prev.player(player.id) else {
            continue;
        };
        let (old, new) = (before.decisions(), player.decisions());
        if (old.kill.is_some() && new.kill.is_none()) || (old.kick.is_some() && new.kick.is_none()) {
            warn!(player = %player.id, "card decision reverted to null within a hand");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tango_shared::{Card, Rank, Suit};

    fn wire(json: &str) -> SnapshotWire {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn missing_phase_or_players_is_rejected() {
        assert_eq!(
            reduce(None, wire(r#"{"players":[]}"#)).unwrap_err(),
            ProtocolError::MissingPhase
        );
        assert_eq!(
            reduce(None, wire(r#"{"state":"ante"}"#)).unwrap_err(),
            ProtocolError::MissingPlayers
        );
    }

    #[test]
    fn defaults_for_optional_fields() {
        let s = reduce(None, wire(r#"{"state":"waiting","players":[]}"#)).unwrap();
        assert_eq!(s.pot, 0);
        assert_eq!(s.current_bet, 0);
        assert!(s.chat_enabled);
        assert!(s.community_cards.is_empty());
        assert_eq!(s.current_player_index, None);

        let s = reduce(None, wire(r#"{"state":"card_draw","players":[],"chat_enabled":false}"#))
            .unwrap();
        assert!(!s.chat_enabled);
    }

    #[test]
    fn community_cards_survive_a_push_without_them() {
        let first = reduce(
            None,
            wire(r#"{"state":"board_reveal","players":[],"community_cards":[{"rank":"K","suit":"hearts"}]}"#),
        )
        .unwrap();
        let second = reduce(Some(&first), wire(r#"{"state":"final_betting","players":[]}"#)).unwrap();
        assert_eq!(second.community_cards, vec![Card::new(Rank::King, Suit::Hearts)]);

        let third = reduce(
            Some(&second),
            wire(r#"{"state":"final_betting","players":[],"community_cards":[]}"#),
        )
        .unwrap();
        assert!(third.community_cards.is_empty());
    }

    #[test]
    fn hand_key_advances_on_ante_reentry_and_renumbering() {
        let end = reduce(None, wire(r#"{"state":"end","players":[]}"#)).unwrap();
        let ante = reduce(Some(&end), wire(r#"{"state":"ante","players":[]}"#)).unwrap();
        assert_eq!(advance_hand(Some(&end), HandKey(3), &ante), HandKey(4));
        assert_eq!(advance_hand(Some(&ante), HandKey(4), &ante), HandKey(4));

        let h1 = reduce(None, wire(r#"{"state":"showdown","players":[],"current_hand":1}"#)).unwrap();
        let h2 = reduce(Some(&h1), wire(r#"{"state":"card_draw","players":[],"current_hand":2}"#))
            .unwrap();
        assert_eq!(advance_hand(Some(&h1), HandKey(0), &h2), HandKey(1));
        assert_eq!(advance_hand(None, HandKey(0), &h2), HandKey(0));
    }

    #[test]
    fn rejected_snapshot_leaves_state_untouched() {
        let identity = crate::engine::LocalIdentity {
            session_id: "s".into(),
            player_id: 1.into(),
            username: None,
            chips: 100,
            is_permanent: false,
        };
        let mut state = ClientState::new(identity);
        apply_snapshot(&mut state, wire(r#"{"state":"ante","players":[]}"#)).unwrap();
        assert!(apply_snapshot(&mut state, wire(r#"{"players":[]}"#)).is_err());
        assert_eq!(state.snapshot.as_ref().map(|s| s.phase.clone()), Some(Phase::Ante));
    }

    #[test]
    fn decision_outside_the_hand_is_rejected() {
        let err = reduce(
            None,
            wire(
                r#"{"state":"choose_tango","players":[{"id":1,"chips":100,
                    "decisions":{"kill":18446744073709551615,"kick":null}}]}"#,
            ),
        )
        .unwrap_err();
        assert_eq!(
            err,
            ProtocolError::DecisionOutOfRange {
                player: 1.into(),
                index: usize::MAX
            }
        );
        assert!(reduce(
            None,
            wire(r#"{"state":"end","players":[{"id":1,"decisions":{"kill":0,"kick":3}}]}"#)
        )
        .is_err());
        assert!(reduce(
            None,
            wire(r#"{"state":"end","players":[{"id":1,"decisions":{"kill":0,"kick":2}}]}"#)
        )
        .is_ok());
    }
}
