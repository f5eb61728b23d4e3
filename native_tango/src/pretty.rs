use owo_colors::OwoColorize;
use tango_shared::{Card, PlayerId, PlayerRecord, PlayerStatus, PlayerView, ServerEvent};

use crate::engine::{phase_table, EligibleActions, GameSnapshot};

pub fn format_card(card: &Card, color: bool) -> String {
    let text = card.to_string();
    if !color {
        return text;
    }
    match (card.is_tango, card.suit.is_red()) {
        (true, _) => text.magenta().bold().to_string(),
        (false, true) => text.red().to_string(),
        (false, false) => text,
    }
}

pub fn format_cards(cards: &[Card], color: bool) -> String {
    cards
        .iter()
        .map(|c| format_card(c, color))
        .collect::<Vec<_>>()
        .join(" ")
}

fn status_tag(status: &PlayerStatus, color: bool) -> String {
    match status {
        PlayerStatus::Active => String::new(),
        PlayerStatus::Folded if color => " [FOLDED]".red().to_string(),
        PlayerStatus::Folded => " [FOLDED]".to_string(),
        PlayerStatus::Checked => " [checked]".to_string(),
        PlayerStatus::Betted(round) => format!(" [bet {}]", round),
    }
}

fn player_line(
    p: &PlayerView,
    you: PlayerId,
    to_act: bool,
    show_cards: bool,
    show_turn_card: bool,
    color: bool,
) -> String {
    let mut name = p.display_name();
    if p.id == you {
        name = if color {
            format!("{}{}", name.bold(), " (You)".bold())
        } else {
            format!("{} (You)", name)
        };
    }
    let to_act_icon = match (to_act, color) {
        (true, true) => " ●".green().to_string(),
        (true, false) => " *".to_string(),
        _ => String::new(),
    };
    let last = p
        .last_action_text()
        .map(|a| format!("  last={}", a))
        .unwrap_or_default();
    let mut line = format!(
        "  #{} {}  chips={}{}{}{}",
        p.id,
        name,
        p.chips,
        status_tag(&p.status, color),
        to_act_icon,
        last
    );
    if show_cards {
        if let Some(cards) = p.cards.as_deref().filter(|c| !c.is_empty()) {
            line.push_str(&format!("  [{}]", format_cards(cards, color)));
        }
    }
    if show_turn_card {
        if let Some(card) = p.turn_card.as_ref() {
            line.push_str(&format!("  turn={}", format_card(card, color)));
        }
    }
    let d = p.decisions();
    if let Some(k) = d.kill {
        line.push_str(&format!("  trashed=#{}", k.saturating_add(1)));
    }
    if let Some(k) = d.kick {
        line.push_str(&format!("  tango=#{}", k.saturating_add(1)));
    }
    line
}

/// Full table view from the local player's seat.
pub fn format_snapshot_human(
    snapshot: &GameSnapshot,
    you: PlayerId,
    eligible: &EligibleActions,
    color: bool,
) -> String {
    let entry = phase_table::entry(&snapshot.phase);
    let mut out = String::new();

    let status = phase_table::status_text(snapshot);
    let status = if color {
        status.bold().blue().to_string()
    } else {
        status
    };
    let pot = if color {
        format!("{} {}", "Pot:".bold().yellow(), snapshot.pot)
    } else {
        format!("Pot: {}", snapshot.pot)
    };
    out.push_str(&format!("{}  |  {}", status, pot));
    if snapshot.current_bet > 0 {
        out.push_str(&format!("  |  Bet: {}", snapshot.current_bet));
    }
    out.push('\n');

    if !snapshot.community_cards.is_empty() {
        let board = if entry.effects.reveal_board {
            format_cards(&snapshot.community_cards, color)
        } else {
            vec!["??"; snapshot.community_cards.len()].join(" ")
        };
        out.push_str(&format!("Board: [{}]\n", board));
    }
    if let Some(cards) = snapshot.player(you).and_then(|p| p.cards.as_deref()) {
        if !cards.is_empty() {
            out.push_str(&format!("Your cards: [{}]\n", format_cards(cards, color)));
        }
    }

    out.push_str("Players:\n");
    let to_act = snapshot.current_player().map(|p| p.id);
    for p in &snapshot.players {
        let show_cards = p.id != you && entry.effects.reveal_hands;
        out.push_str(&player_line(
            p,
            you,
            to_act == Some(p.id),
            show_cards,
            entry.effects.show_turn_card,
            color,
        ));
        out.push('\n');
    }
    if !snapshot.chat_enabled {
        out.push_str("(chat disabled)\n");
    }

    let labels = eligible.labels();
    if !labels.is_empty() {
        let prompt = format!("Your move: {}", labels.join(" | "));
        if color {
            out.push_str(&prompt.green().to_string());
        } else {
            out.push_str(&prompt);
        }
        out.push('\n');
    }
    out
}

/// Countdown text; highlighted for the last three seconds.
pub fn format_clock(remaining: f64, color: bool) -> String {
    let text = format!("⏱ {:.2}s", remaining);
    if color && remaining <= 3.0 {
        text.bright_magenta().bold().to_string()
    } else {
        text
    }
}

pub fn format_identity(record: &PlayerRecord, color: bool) -> String {
    let name = record.username.as_deref().unwrap_or("(no name)");
    let name = if color {
        name.bold().to_string()
    } else {
        name.to_string()
    };
    let kind = if record.is_permanent {
        "permanent"
    } else {
        "guest"
    };
    format!(
        "#{} {}  chips={}  {}  session={}",
        record.id, name, record.chips, kind, record.session_id
    )
}

/// One-line summary of an inbound event, for watch mode.
pub fn format_event_human(event: &ServerEvent, color: bool) -> String {
    match event {
        ServerEvent::GameStateUpdate(wire) => {
            let phase = wire
                .phase
                .as_ref()
                .map(|p| p.to_string())
                .unwrap_or_else(|| "?".into());
            let players = wire.players.as_ref().map(|p| p.len()).unwrap_or(0);
            let header = format!("== {} ==", phase);
            let header = if color {
                header.bold().purple().to_string()
            } else {
                header
            };
            format!(
                "{} players={} pot={}",
                header,
                players,
                wire.pot.unwrap_or(0)
            )
        }
        ServerEvent::PlayerJoined(p) => format!("+ {} joined", p.display_name()),
        ServerEvent::PlayerLeft(p) => format!("- {} left", p.display_name()),
        ServerEvent::GameStarted {} => "Game started".to_string(),
        ServerEvent::TimerUpdate { timer } => format_clock(*timer, color),
        ServerEvent::ChatMessage(m) => format!(
            "{}: {}",
            m.username.as_deref().unwrap_or("Anonymous"),
            m.message
        ),
        ServerEvent::HandResult(r) => crate::engine::format_hand_result(r),
        ServerEvent::Error { message } => {
            let text = format!("error: {}", message);
            if color {
                text.red().to_string()
            } else {
                text
            }
        }
        ServerEvent::TableJoined { table_id, .. } => format!("seated at table {}", table_id),
    }
}
