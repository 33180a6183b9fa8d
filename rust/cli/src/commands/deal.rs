//! Deal command: deal one game and show both opening hands face up.
//!
//! The same seed always produces the same deal, which makes this handy for
//! checking a seed before replaying it with `play --seed`.

use crate::error::CliError;
use crate::formatters::{format_hand, format_total};
use sabacc_engine::engine::Engine;
use std::io::Write;

pub fn handle_deal_command(seed: Option<u64>, out: &mut dyn Write) -> Result<(), CliError> {
    let seed = seed.unwrap_or_else(rand::random);
    let engine = Engine::new(Some(seed))?;
    let state = engine.state();

    writeln!(out, "Seed: {}", seed)?;
    writeln!(
        out,
        "Player: {}  | {}",
        format_hand(&state.player),
        format_total(state.player.hand())
    )?;
    writeln!(
        out,
        "Dealer: {}  | {}",
        format_hand(&state.dealer),
        format_total(state.dealer.hand())
    )?;
    writeln!(out, "Deck: {} cards", state.deck.len())?;
    Ok(())
}
