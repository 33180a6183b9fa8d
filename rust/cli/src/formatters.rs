//! Text renderings of cards, hands and actions for the terminal.
//!
//! Suits are shown as symbols when the terminal can draw them and as a
//! single letter otherwise.
//!
//! ```rust
//! use sabacc_engine::cards::{Card, CardId, CardName, Suit};
//! use sabacc_cli::formatters::format_card;
//!
//! let commander = Card { id: CardId(11), name: CardName::Commander, suit: Some(Suit::Sabers), value: 12 };
//! let text = format_card(&commander);
//! assert!(text == "Commander⚔ 12" || text == "CommanderS 12");
//! ```

use sabacc_engine::cards::{Card, Suit};
use sabacc_engine::dealer::DealerAction;
use sabacc_engine::game::{GameState, Phase};
use sabacc_engine::hand::{Category, evaluate_hand};
use sabacc_engine::player::{Player, PlayerAction};

/// Unix terminals are assumed to render Unicode; on Windows only the modern
/// hosts that advertise themselves do.
pub fn supports_unicode() -> bool {
    if cfg!(windows) {
        std::env::var("WT_SESSION").is_ok()
            || std::env::var("TERM_PROGRAM").is_ok()
            || std::env::var("VSCODE_INJECTION").is_ok()
    } else {
        true
    }
}

pub fn format_suit(suit: Suit) -> &'static str {
    if supports_unicode() {
        match suit {
            Suit::Flasks => "⚗",
            Suit::Sabers => "⚔",
            Suit::Staves => "⚚",
            Suit::Coins => "◎",
        }
    } else {
        match suit {
            Suit::Flasks => "F",
            Suit::Sabers => "S",
            Suit::Staves => "T",
            Suit::Coins => "C",
        }
    }
}

/// Name, suit symbol (if any) and current value, e.g. `7⚗ 7` or `The Idiot 0`.
/// The value is shown separately because a shift can change it.
pub fn format_card(card: &Card) -> String {
    match card.suit {
        Some(suit) => format!("{}{} {}", card.name, format_suit(suit), card.value),
        None => format!("{} {}", card.name, card.value),
    }
}

/// Numbered listing of a hand; the locked card is marked with `*`.
pub fn format_hand(seat: &Player) -> String {
    let locked = seat.locked_index();
    let cards: Vec<String> = seat
        .hand()
        .iter()
        .enumerate()
        .map(|(i, c)| {
            let mark = if locked == Some(i) { "*" } else { "" };
            format!("[{}{}] {}", i + 1, mark, format_card(c))
        })
        .collect();
    cards.join("  ")
}

pub fn format_category(category: Category) -> &'static str {
    match category {
        Category::BombOut => "bombed out",
        Category::Normal => "normal",
        Category::PureSabacc => "pure sabacc",
        Category::IdiotsArray => "idiot's array",
    }
}

/// `total 21 (normal)`
pub fn format_total(hand: &[Card]) -> String {
    let eval = evaluate_hand(hand);
    format!("total {} ({})", eval.total, format_category(eval.category))
}

/// One line per seat plus the draw pile size.
pub fn format_table(state: &GameState) -> String {
    format!(
        "Player: {}  | {}\nDealer: {}  | {}\nDeck: {} cards",
        format_hand(&state.player),
        format_total(state.player.hand()),
        format_hand(&state.dealer),
        format_total(state.dealer.hand()),
        state.deck.len()
    )
}

/// Inverse of the interactive parser: positions are printed 1-based.
pub fn format_action(action: &PlayerAction) -> String {
    match action {
        PlayerAction::Draw => "draw".to_string(),
        PlayerAction::Exchange(i) => format!("exchange {}", i + 1),
        PlayerAction::Lock(i) => format!("lock {}", i + 1),
        PlayerAction::Stand => "stand".to_string(),
    }
}

/// Prompt listing the moves open to the player, with 1-based card numbers.
pub fn format_choices(actions: &[PlayerAction]) -> String {
    let numbers = |pick: fn(&PlayerAction) -> Option<usize>| {
        actions
            .iter()
            .filter_map(pick)
            .map(|i| (i + 1).to_string())
            .collect::<Vec<_>>()
            .join("|")
    };
    let exchange = numbers(|a| match a {
        PlayerAction::Exchange(i) => Some(*i),
        _ => None,
    });
    let lock = numbers(|a| match a {
        PlayerAction::Lock(i) => Some(*i),
        _ => None,
    });

    let mut parts = Vec::new();
    if actions.contains(&PlayerAction::Draw) {
        parts.push("draw".to_string());
    }
    if !exchange.is_empty() {
        parts.push(format!("exchange <{}>", exchange));
    }
    if !lock.is_empty() {
        parts.push(format!("lock <{}>", lock));
    }
    if actions.contains(&PlayerAction::Stand) {
        parts.push("stand".to_string());
    }
    parts.push("q".to_string());
    format!("Action ({}): ", parts.join(" / "))
}

pub fn format_dealer_action(action: &DealerAction) -> String {
    match action {
        DealerAction::Draw { count: 1 } => "draws a card".to_string(),
        DealerAction::Draw { count } => format!("draws {} cards", count),
        DealerAction::Exchange { index } => format!("exchanges card {}", index + 1),
        DealerAction::Lock { index } => format!("locks card {}", index + 1),
        DealerAction::Stand => "stands".to_string(),
    }
}

/// Final verdict line, or `None` while the game is still running.
pub fn format_result(state: &GameState) -> Option<String> {
    match state.phase {
        Phase::Finished { winner, resolution } => {
            Some(format!("Winner: {} ({})", winner, resolution))
        }
        _ => None,
    }
}
