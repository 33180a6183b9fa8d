//! The dealer's rule ladder.
//!
//! Rules are tried in order and the first one that applies decides the step.
//! Every random choice goes through the supplied random source, so a seeded
//! engine replays the dealer exactly.

use rand::{Rng, RngCore};
use sabacc_engine::cards::{Card, CardName};
use sabacc_engine::dealer::{DealerAction, DealerPolicy};
use sabacc_engine::hand::{
    check_bomb_out, check_idiots_array, check_pure_sabacc, compute_total, evaluate_hand,
    BOMB_OUT_THRESHOLD, SABACC_TARGET,
};
use sabacc_engine::outcome::{resolve_evaluations, Outcome};
use sabacc_engine::player::{Side, MAX_HAND_SIZE};
use std::cmp::Ordering;

/// Below this magnitude the dealer keeps drawing.
const DRAW_BELOW: i32 = 20;

/// Gap to 23 at which the dealer draws an extra card.
const WIDE_GAP: i32 = 12;

/// Relative weights of the fallback actions: draw, exchange, lock, stand.
const FALLBACK_WEIGHTS: [u32; 4] = [30, 30, 20, 20];

/// Rule-based dealer.
///
/// # Strategy
///
/// 1. Stand on five cards, an Idiot's Array or Pure Sabacc.
/// 2. Bombed out: exchange the card pushing the total furthest out.
/// 3. Far from 23 (|total| < 20): draw one to three cards depending on the
///    gap and the hand size.
/// 4. Close (20..=22): stand when the showdown would go the dealer's way,
///    otherwise gamble.
/// 5. Exactly 23 away from zero: stand.
///
/// # Example
///
/// ```rust
/// use rand::SeedableRng;
/// use rand_chacha::ChaCha20Rng;
/// use sabacc_ai::baseline::BaselineDealer;
/// use sabacc_engine::cards::build_deck;
/// use sabacc_engine::dealer::{DealerAction, DealerPolicy};
///
/// let deck = build_deck();
/// let dealer = BaselineDealer::new();
/// let mut rng = ChaCha20Rng::seed_from_u64(1);
///
/// // Two low cards: far from 23, so draw.
/// let action = dealer.decide(&[deck[0], deck[1]], &[], &mut rng);
/// assert!(matches!(action, DealerAction::Draw { .. }));
/// ```
#[derive(Debug, Clone, Default)]
pub struct BaselineDealer;

impl BaselineDealer {
    pub fn new() -> Self {
        Self
    }

    /// How many cards to draw for a hand `|total|` away from zero.
    fn draw_count(abs_total: i32, held: usize) -> usize {
        let gap = SABACC_TARGET - abs_total;
        let wanted = match held {
            0..=2 if gap >= WIDE_GAP => 3,
            0..=2 => 2,
            3 if gap >= WIDE_GAP => 2,
            3 => 1,
            _ => 1,
        };
        wanted.min(MAX_HAND_SIZE.saturating_sub(held))
    }

    /// Steps for a hand in the 20..=22 band, decided by how the showdown
    /// would go right now.
    fn contest(
        dealer_hand: &[Card],
        locked: Option<usize>,
        player_hand: &[Card],
        rng: &mut dyn RngCore,
    ) -> DealerAction {
        match standing(dealer_hand, player_hand) {
            Ordering::Less => DealerAction::Stand,
            Ordering::Greater => {
                if rng.random_bool(0.5) {
                    DealerAction::Draw { count: 1 }
                } else {
                    exchange_lowest(dealer_hand, locked)
                }
            }
            Ordering::Equal => {
                if rng.random_bool(0.5) {
                    DealerAction::Stand
                } else {
                    lock_best(dealer_hand, locked)
                }
            }
        }
    }
}

impl DealerPolicy for BaselineDealer {
    fn decide(
        &self,
        dealer_hand: &[Card],
        player_hand: &[Card],
        rng: &mut dyn RngCore,
    ) -> DealerAction {
        self.decide_with_lock(dealer_hand, None, player_hand, rng)
    }

    fn decide_with_lock(
        &self,
        dealer_hand: &[Card],
        locked: Option<usize>,
        player_hand: &[Card],
        rng: &mut dyn RngCore,
    ) -> DealerAction {
        let total = compute_total(dealer_hand);

        if dealer_hand.len() >= MAX_HAND_SIZE
            || check_idiots_array(dealer_hand)
            || check_pure_sabacc(total)
        {
            return DealerAction::Stand;
        }

        if check_bomb_out(total) {
            let index = if total >= BOMB_OUT_THRESHOLD {
                highest_index(dealer_hand, locked)
            } else {
                lowest_index(dealer_hand, locked)
            };
            return index.map_or(DealerAction::Stand, |index| DealerAction::Exchange { index });
        }

        match total.abs() {
            abs @ 0..DRAW_BELOW => DealerAction::Draw {
                count: Self::draw_count(abs, dealer_hand.len()),
            },
            DRAW_BELOW..SABACC_TARGET => Self::contest(dealer_hand, locked, player_hand, rng),
            SABACC_TARGET => DealerAction::Stand,
            _ => fallback_action(dealer_hand, locked, rng),
        }
    }

    fn name(&self) -> &str {
        "BaselineDealer"
    }
}

/// How the dealer's hand ranks against the player's under the showdown
/// ladder. `Less` means the dealer would win now.
fn standing(dealer_hand: &[Card], player_hand: &[Card]) -> Ordering {
    match resolve_evaluations(&evaluate_hand(player_hand), &evaluate_hand(dealer_hand)) {
        Outcome::Winner {
            side: Side::Dealer, ..
        } => Ordering::Less,
        Outcome::Winner {
            side: Side::Player, ..
        } => Ordering::Greater,
        Outcome::NeedsTieBreak(_) => Ordering::Equal,
    }
}

/// Index of the lowest-value card other than the locked one, first on ties.
pub(crate) fn lowest_index(hand: &[Card], locked: Option<usize>) -> Option<usize> {
    hand.iter()
        .enumerate()
        .filter(|(i, _)| Some(*i) != locked)
        .min_by_key(|(i, c)| (c.value, *i))
        .map(|(i, _)| i)
}

/// Index of the highest-value card other than the locked one, first on ties.
pub(crate) fn highest_index(hand: &[Card], locked: Option<usize>) -> Option<usize> {
    hand.iter()
        .enumerate()
        .filter(|(i, _)| Some(*i) != locked)
        .max_by_key(|(i, c)| (c.value, std::cmp::Reverse(*i)))
        .map(|(i, _)| i)
}

/// Card worth protecting from a shift: The Idiot, else the first suitless
/// card, else the highest value.
pub(crate) fn lock_target(hand: &[Card]) -> usize {
    hand.iter()
        .position(|c| c.name == CardName::TheIdiot)
        .or_else(|| hand.iter().position(|c| c.is_suitless()))
        .or_else(|| highest_index(hand, None))
        .unwrap_or(0)
}

fn exchange_lowest(hand: &[Card], locked: Option<usize>) -> DealerAction {
    lowest_index(hand, locked).map_or(DealerAction::Stand, |index| DealerAction::Exchange { index })
}

/// Locks the preferred card; stands when it is already locked.
fn lock_best(hand: &[Card], locked: Option<usize>) -> DealerAction {
    match lock_target(hand) {
        index if Some(index) == locked => DealerAction::Stand,
        index => DealerAction::Lock { index },
    }
}

/// Weighted pick used when no rule applies.
pub(crate) fn fallback_action(
    hand: &[Card],
    locked: Option<usize>,
    rng: &mut dyn RngCore,
) -> DealerAction {
    let total: u32 = FALLBACK_WEIGHTS.iter().sum();
    let mut roll = rng.random_range(0..total);
    let mut choice = FALLBACK_WEIGHTS.len() - 1;
    for (i, weight) in FALLBACK_WEIGHTS.iter().enumerate() {
        if roll < *weight {
            choice = i;
            break;
        }
        roll -= weight;
    }
    match choice {
        0 => DealerAction::Draw { count: 1 },
        1 => exchange_lowest(hand, locked),
        2 => lock_best(hand, locked),
        _ => DealerAction::Stand,
    }
}
