use native_tango::engine::format_hand_result;
use tango_shared::{HandResult, ServerEvent};

#[test]
fn scenario_d_main_then_side_pot() {
    let ev: ServerEvent = serde_json::from_str(
        r#"{"type":"hand_result","data":{"winners":[
            {"username":"A","amount_won":50,"is_main_winner":true},
            {"username":"B","amount_won":20,"is_main_winner":false}]}}"#,
    )
    .unwrap();
    let ServerEvent::HandResult(result) = ev else {
        panic!("expected a hand result");
    };
    let text = format_hand_result(&result);
    let lines: Vec<&str> = text.lines().collect();
    assert_eq!(lines.len(), 2);
    assert!(lines[0].contains('A') && lines[0].contains("50") && lines[0].contains("main pot"));
    assert!(lines[1].contains('B') && lines[1].contains("20") && lines[1].contains("side pot"));
    assert_ne!(lines[0].chars().next(), lines[1].chars().next());

    // Deterministic for the same input.
    assert_eq!(text, format_hand_result(&result));
}

#[test]
fn legacy_single_winner_payload() {
    let result: HandResult =
        serde_json::from_str(r#"{"winner":{"id":2},"pot_amount":35}"#).unwrap();
    assert_eq!(format_hand_result(&result), "🏆 Anonymous wins the main pot! (35)");
}
