//! Threshold-based autopilot for the player seat.

use sabacc_engine::cards::CardName;
use sabacc_engine::game::GameState;
use sabacc_engine::hand::{check_bomb_out, compute_total};
use sabacc_engine::player::PlayerAction;
use sabacc_engine::rules::legal_player_actions;

use crate::PlayerPolicy;

/// Default magnitude below which the autopilot keeps drawing.
pub const DEFAULT_THRESHOLD: i32 = 17;

/// Plays the player seat by a fixed threshold, like a cautious human would.
///
/// Locks The Idiot when it holds one, exchanges its worst card after
/// bombing out, draws while the total is below the threshold and stands
/// otherwise.
#[derive(Debug, Clone)]
pub struct ThresholdPlayer {
    threshold: i32,
}

impl ThresholdPlayer {
    pub fn new(threshold: i32) -> Self {
        Self { threshold }
    }

    pub fn threshold(&self) -> i32 {
        self.threshold
    }
}

impl Default for ThresholdPlayer {
    fn default() -> Self {
        Self::new(DEFAULT_THRESHOLD)
    }
}

impl ThresholdPlayer {
    fn preferred(&self, state: &GameState) -> PlayerAction {
        let seat = &state.player;
        let hand = seat.hand();
        let total = compute_total(hand);
        let locked = seat.locked_index();

        if let Some(idiot) = hand.iter().position(|c| c.name == CardName::TheIdiot) {
            if locked != Some(idiot) {
                return PlayerAction::Lock(idiot);
            }
        }

        if check_bomb_out(total) {
            // Swap out whichever unlocked card pushes furthest in the bombed direction.
            let worst = hand
                .iter()
                .enumerate()
                .filter(|(i, _)| locked != Some(*i))
                .max_by_key(|(_, c)| c.value * total.signum());
            return match worst {
                Some((i, _)) if !state.deck.is_empty() => PlayerAction::Exchange(i),
                _ => PlayerAction::Stand,
            };
        }

        if total.abs() < self.threshold && !seat.is_full() && !state.deck.is_empty() {
            return PlayerAction::Draw;
        }
        PlayerAction::Stand
    }
}

impl PlayerPolicy for ThresholdPlayer {
    /// Falls back to standing whenever the preferred move is not legal.
    fn next_action(&self, state: &GameState) -> PlayerAction {
        let action = self.preferred(state);
        if legal_player_actions(state).contains(&action) {
            action
        } else {
            PlayerAction::Stand
        }
    }

    fn name(&self) -> &str {
        "ThresholdPlayer"
    }
}
