use rand::RngCore;
use serde::{Deserialize, Serialize};

use crate::cards::Card;

/// One step of the dealer's turn.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DealerAction {
    /// Draw `count` cards from the top of the deck
    Draw { count: usize },
    /// Swap the card at `index` for the top of the deck
    Exchange { index: usize },
    /// Lock the card at `index` against a shift
    Lock { index: usize },
    /// End the turn
    Stand,
}

/// Decision function driving the dealer seat.
///
/// Implementations must be deterministic for a given random source so that
/// seeded games replay identically.
pub trait DealerPolicy: Send + Sync {
    /// Choose the dealer's next step from both visible hands.
    fn decide(&self, dealer_hand: &[Card], player_hand: &[Card], rng: &mut dyn RngCore)
        -> DealerAction;

    /// Like [`decide`](Self::decide), but also told which of the dealer's
    /// cards is locked. Policies that can target cards should override this
    /// so they never pick the locked one.
    fn decide_with_lock(
        &self,
        dealer_hand: &[Card],
        locked: Option<usize>,
        player_hand: &[Card],
        rng: &mut dyn RngCore,
    ) -> DealerAction {
        let _ = locked;
        self.decide(dealer_hand, player_hand, rng)
    }

    fn name(&self) -> &str;
}

/// Dealer that stands immediately. Keeps the controller testable without the
/// full policy crate.
#[derive(Debug, Clone, Copy, Default)]
pub struct StandingDealer;

impl DealerPolicy for StandingDealer {
    fn decide(&self, _: &[Card], _: &[Card], _: &mut dyn RngCore) -> DealerAction {
        DealerAction::Stand
    }

    fn name(&self) -> &str {
        "StandingDealer"
    }
}
