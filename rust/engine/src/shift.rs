//! The Sabacc Shift: an end-of-round event that re-rolls every unlocked card.

use rand::seq::IndexedRandom;
use rand::Rng;

use crate::cards::{all_suits, Card, SHIFT_VALUE_POOL};

/// Chance that a shift happens at the end of a round.
pub const SHIFT_PROBABILITY: f64 = 0.25;

/// Rolls whether a shift happens this round.
pub fn roll_shift<R: Rng + ?Sized>(rng: &mut R, probability: f64) -> bool {
    rng.random_bool(probability.clamp(0.0, 1.0))
}

/// Re-rolls every card except the locked one.
///
/// Suitless cards only get a new value; suited cards get a new suit and a new
/// value, both drawn uniformly. Values come from the whole catalog, so a
/// suited card can end up negative.
pub fn perform_shift<R: Rng + ?Sized>(
    hand: &[Card],
    locked_card: Option<&Card>,
    rng: &mut R,
) -> Vec<Card> {
    let suits = all_suits();
    hand.iter()
        .map(|card| {
            if locked_card.is_some_and(|locked| locked.id == card.id) {
                return *card;
            }
            let value = *SHIFT_VALUE_POOL
                .choose(rng)
                .unwrap_or(&card.value);
            match card.suit {
                None => Card { value, ..*card },
                Some(_) => Card {
                    suit: suits.choose(rng).copied(),
                    value,
                    ..*card
                },
            }
        })
        .collect()
}
