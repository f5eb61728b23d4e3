use native_tango::engine::{apply_snapshot, reduce, ClientState, HandKey, LocalIdentity};
use native_tango::error::ProtocolError;
use tango_shared::{Card, Phase, Rank, SnapshotWire, Suit};

fn wire(json: &str) -> SnapshotWire {
    serde_json::from_str(json).expect("valid snapshot json")
}

fn state() -> ClientState {
    ClientState::new(LocalIdentity {
        session_id: "s".into(),
        player_id: 1.into(),
        username: None,
        chips: 100,
        is_permanent: false,
    })
}

#[test]
fn board_is_kept_when_omitted_and_replaced_when_sent() {
    let first = reduce(
        None,
        wire(r#"{"state":"board_reveal","players":[],"community_cards":[{"rank":"A","suit":"clubs"},{"rank":"7","suit":"hearts","is_tango":true}]}"#),
    )
    .unwrap();

    let kept = reduce(Some(&first), wire(r#"{"state":"final_betting","players":[],"pot":40}"#)).unwrap();
    assert_eq!(kept.community_cards, first.community_cards);
    assert_eq!(kept.pot, 40);

    let replaced = reduce(
        Some(&kept),
        wire(r#"{"state":"final_betting","players":[],"community_cards":[{"rank":"2","suit":"spades"}]}"#),
    )
    .unwrap();
    assert_eq!(replaced.community_cards, vec![Card::new(Rank::Two, Suit::Spades)]);
}

#[test]
fn players_and_pot_are_replaced_wholesale() {
    let first = reduce(
        None,
        wire(r#"{"state":"ante","players":[{"id":1,"chips":100},{"id":2,"chips":100}],"pot":10}"#),
    )
    .unwrap();
    let next = reduce(Some(&first), wire(r#"{"state":"ante","players":[{"id":2,"chips":90}]}"#)).unwrap();
    assert_eq!(next.players.len(), 1);
    assert_eq!(next.pot, 0);
}

#[test]
fn protocol_violations_keep_the_last_good_state() {
    let mut st = state();
    apply_snapshot(&mut st, wire(r#"{"state":"choose_trash","players":[{"id":1}]}"#)).unwrap();
    let before = st.snapshot.clone();

    assert_eq!(
        apply_snapshot(&mut st, wire(r#"{"players":[{"id":1}]}"#)).unwrap_err(),
        ProtocolError::MissingPhase
    );
    assert_eq!(
        apply_snapshot(&mut st, wire(r#"{"state":"choose_tango"}"#)).unwrap_err(),
        ProtocolError::MissingPlayers
    );
    assert_eq!(st.snapshot, before);
}

#[test]
fn a_new_hand_starts_when_ante_comes_back() {
    let mut st = state();
    for phase in ["ante", "card_draw", "showdown", "end"] {
        let json = format!(r#"{{"state":"{}","players":[]}}"#, phase);
        apply_snapshot(&mut st, wire(&json)).unwrap();
    }
    assert_eq!(st.hand, HandKey(0));
    apply_snapshot(&mut st, wire(r#"{"state":"ante","players":[]}"#)).unwrap();
    assert_eq!(st.hand, HandKey(1));
    assert_eq!(st.snapshot.as_ref().map(|s| s.phase.clone()), Some(Phase::Ante));
}

#[test]
fn stale_snapshots_are_applied_last_write_wins() {
    let mut st = state();
    apply_snapshot(&mut st, wire(r#"{"state":"final_betting","players":[]}"#)).unwrap();
    apply_snapshot(&mut st, wire(r#"{"state":"turn_draw","players":[]}"#)).unwrap();
    assert_eq!(st.snapshot.as_ref().map(|s| s.phase.clone()), Some(Phase::TurnDraw));
}
