//! Formats the result of a finished hand.

use tango_shared::{HandResult, Winner};

const MAIN_POT_MARKER: &str = "🏆";
const SIDE_POT_MARKER: &str = "💰";

/// One line per winner: main pot winners first, then side pots, each group
/// in the order the server sent them.
pub fn format_hand_result(result: &HandResult) -> String {
    if result.winners.is_empty() {
        return "Hand complete, no winners reported".to_string();
    }
    let (main, side): (Vec<&Winner>, Vec<&Winner>) =
        result.winners.iter().partition(|w| w.is_main_winner);

    main.iter()
        .map(|w| format!("{} {} wins the main pot! ({})", MAIN_POT_MARKER, w.username, w.amount_won))
        .chain(
            side.iter()
                .map(|w| format!("{} {} wins a side pot! ({})", SIDE_POT_MARKER, w.username, w.amount_won)),
        )
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn winner(name: &str, amount: u32, main: bool) -> Winner {
        Winner {
            username: name.into(),
            amount_won: amount,
            is_main_winner: main,
        }
    }

    #[test]
    fn main_pot_is_listed_before_side_pots() {
        let r = HandResult {
            winners: vec![winner("B", 20, false), winner("A", 50, true)],
        };
        assert_eq!(
            format_hand_result(&r),
            "🏆 A wins the main pot! (50)\n💰 B wins a side pot! (20)"
        );
    }

    #[test]
    fn split_main_pot_keeps_server_order() {
        let r = HandResult {
            winners: vec![winner("X", 25, true), winner("Y", 25, true)],
        };
        assert_eq!(
            format_hand_result(&r),
            "🏆 X wins the main pot! (25)\n🏆 Y wins the main pot! (25)"
        );
    }

    #[test]
    fn empty_result_still_renders() {
        let r = HandResult { winners: vec![] };
        assert!(!format_hand_result(&r).is_empty());
    }
}
