use native_tango::engine::{compute_eligibility, reduce, EligibleActions, GameSnapshot};
use tango_shared::{Phase, PlayerView, SnapshotWire};

fn snapshot(json: &str) -> GameSnapshot {
    let wire: SnapshotWire = serde_json::from_str(json).expect("valid snapshot json");
    reduce(None, wire).expect("snapshot has phase and players")
}

#[test]
fn scenario_a_ante_without_last_action() {
    let s = snapshot(r#"{"state":"ante","players":[{"id":1,"chips":100}]}"#);
    let e = compute_eligibility(&s, 1.into());
    assert_eq!(
        e,
        EligibleActions {
            place_ante: true,
            ..EligibleActions::none()
        }
    );
}

#[test]
fn scenario_b_first_to_act_may_check_or_raise() {
    let s = snapshot(
        r#"{"state":"pre_kick_betting","current_player_index":1,
            "players":[{"id":0,"last_action":"check"},{"id":1,"last_action":null}]}"#,
    );
    let e = compute_eligibility(&s, 1.into());
    assert_eq!(
        e,
        EligibleActions {
            may_check: true,
            min_raise: Some(1),
            ..EligibleActions::none()
        }
    );
}

#[test]
fn scenario_c_facing_a_bet_may_fold_call_or_raise() {
    let s = snapshot(
        r#"{"state":"pre_kick_betting","current_player_index":1,"current_bet":10,
            "players":[{"id":0,"last_action":"pre_kick_bet_10"},{"id":1,"last_action":null}]}"#,
    );
    let e = compute_eligibility(&s, 1.into());
    assert_eq!(
        e,
        EligibleActions {
            may_fold: true,
            call_amount: Some(10),
            min_raise: Some(11),
            ..EligibleActions::none()
        }
    );
}

#[test]
fn not_our_turn_grants_nothing() {
    let s = snapshot(
        r#"{"state":"pre_kick_betting","current_player_index":0,
            "players":[{"id":0,"last_action":null},{"id":1,"last_action":null}]}"#,
    );
    assert!(compute_eligibility(&s, 1.into()).is_empty());
}

#[test]
fn unknown_phase_grants_nothing() {
    let s = snapshot(r#"{"state":"intermission","players":[{"id":1}],"current_player_index":0}"#);
    assert_eq!(s.phase, Phase::Unknown("intermission".into()));
    assert!(compute_eligibility(&s, 1.into()).is_empty());
}

/// For every table size, every seat and every round: facing a bet iff the
/// seat before (wrapping at zero) carries the round marker.
#[test]
fn previous_player_rule_holds_for_every_seat() {
    let rounds = [
        (Phase::PreKickBetting, "pre_kick_bet"),
        (Phase::PostTurnBetting, "post_turn_bet"),
        (Phase::FinalBetting, "final_bet"),
    ];
    for (phase, marker) in rounds {
        for count in 2..=6usize {
            for cur in 0..count {
                let prev = (cur + count - 1) % count;
                for prev_bet in [false, true] {
                    let players: Vec<PlayerView> = (0..count)
                        .map(|i| {
                            let mut p = PlayerView::new(i as u64, format!("p{}", i), 500);
                            p.last_action = if i == prev && prev_bet {
                                Some(Some(format!("{}_25", marker)))
                            } else {
                                Some(Some("check".to_string()))
                            };
                            p
                        })
                        .collect();
                    let s = GameSnapshot {
                        phase: phase.clone(),
                        players,
                        pot: 0,
                        community_cards: Vec::new(),
                        current_player_index: Some(cur),
                        current_bet: 25,
                        timer_seconds: None,
                        chat_enabled: true,
                        current_hand: None,
                        winner: None,
                    };
                    let e = compute_eligibility(&s, (cur as u64).into());
                    if prev_bet {
                        assert!(e.may_fold && !e.may_check, "{} n={} cur={}", phase, count, cur);
                        assert_eq!(e.call_amount, Some(25));
                        assert_eq!(e.min_raise, Some(26));
                    } else {
                        assert!(e.may_check && !e.may_fold, "{} n={} cur={}", phase, count, cur);
                        assert_eq!(e.call_amount, None);
                        assert_eq!(e.min_raise, Some(1));
                    }
                }
            }
        }
    }
}

#[test]
fn empty_string_turn_index_fails_safe() {
    let s = snapshot(
        r#"{"state":"final_betting","current_player_index":"","current_bet":"",
            "players":[{"id":1,"last_action":null}]}"#,
    );
    assert_eq!(s.current_bet, 0);
    assert!(compute_eligibility(&s, 1.into()).is_empty());
}
