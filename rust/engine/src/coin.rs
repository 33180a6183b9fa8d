//! Coin-toss collaborator consulted when two hands cannot be ranked.

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha20Rng;

use crate::player::Side;

pub trait CoinToss: Send {
    /// Returns the winning side with even odds.
    fn toss(&mut self) -> Side;
}

/// Fair coin backed by any random source.
#[derive(Debug, Clone)]
pub struct RandomCoin<R = ChaCha20Rng> {
    rng: R,
}

impl RandomCoin<ChaCha20Rng> {
    pub fn new_with_seed(seed: u64) -> Self {
        Self {
            rng: ChaCha20Rng::seed_from_u64(seed),
        }
    }
}

impl<R: Rng> RandomCoin<R> {
    pub fn from_rng(rng: R) -> Self {
        Self { rng }
    }
}

impl<R: Rng + Send> CoinToss for RandomCoin<R> {
    fn toss(&mut self) -> Side {
        if self.rng.random_bool(0.5) {
            Side::Player
        } else {
            Side::Dealer
        }
    }
}

/// Always lands on the same side. Useful for scripted front-ends and tests.
#[derive(Debug, Clone, Copy)]
pub struct FixedCoin(pub Side);

impl CoinToss for FixedCoin {
    fn toss(&mut self) -> Side {
        self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn random_coin_lands_on_both_sides() {
        let mut coin = RandomCoin::new_with_seed(11);
        let tosses: Vec<Side> = (0..64).map(|_| coin.toss()).collect();
        assert!(tosses.contains(&Side::Player));
        assert!(tosses.contains(&Side::Dealer));
    }

    #[test]
    fn seeded_coin_is_reproducible() {
        let mut a = RandomCoin::new_with_seed(5);
        let mut b = RandomCoin::new_with_seed(5);
        for _ in 0..16 {
            assert_eq!(a.toss(), b.toss());
        }
    }
}
