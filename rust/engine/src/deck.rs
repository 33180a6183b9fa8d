use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha20Rng;

use crate::cards::{build_deck, Card};
use crate::errors::GameError;

/// Returns a uniformly random permutation of `deck` (Fisher–Yates).
pub fn shuffle<R: Rng + ?Sized>(deck: &[Card], rng: &mut R) -> Vec<Card> {
    let mut cards = deck.to_vec();
    for i in (1..cards.len()).rev() {
        let j = rng.random_range(0..=i);
        cards.swap(i, j);
    }
    cards
}

/// Removes the top card, returning it together with the remaining deck.
pub fn draw(deck: &[Card]) -> Result<(Card, Vec<Card>), GameError> {
    match deck.split_first() {
        Some((top, rest)) => Ok((*top, rest.to_vec())),
        None => Err(GameError::EmptyDeck),
    }
}

/// Result of swapping one hand card for the top of the deck.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Exchange {
    pub hand: Vec<Card>,
    pub deck: Vec<Card>,
    /// The card that left the hand; it is now the top of `deck`
    pub discarded: Card,
}

/// Replaces `hand[index]` with the top card of `deck`.
///
/// The discarded card goes back on top of the remaining deck, so the next
/// draw returns it. Callers rely on that ordering.
pub fn exchange(hand: &[Card], index: usize, deck: &[Card]) -> Result<Exchange, GameError> {
    if index >= hand.len() {
        return Err(GameError::InvalidIndex {
            index,
            len: hand.len(),
        });
    }
    let (drawn, rest) = draw(deck)?;
    let mut hand = hand.to_vec();
    let discarded = std::mem::replace(&mut hand[index], drawn);
    let mut deck = Vec::with_capacity(rest.len() + 1);
    deck.push(discarded);
    deck.extend(rest);
    Ok(Exchange {
        hand,
        deck,
        discarded,
    })
}

/// A shuffled universe paired with the seed that produced it.
#[derive(Debug, Clone)]
pub struct Deck {
    cards: Vec<Card>,
    seed: u64,
}

impl Deck {
    pub fn shuffled_with_seed(seed: u64) -> Self {
        let mut rng = ChaCha20Rng::seed_from_u64(seed);
        Self {
            cards: shuffle(&build_deck(), &mut rng),
            seed,
        }
    }

    pub fn cards(&self) -> &[Card] {
        &self.cards
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    pub fn remaining(&self) -> usize {
        self.cards.len()
    }

    pub fn into_cards(self) -> Vec<Card> {
        self.cards
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cards::UNIVERSE_SIZE;

    #[test]
    fn draw_takes_the_top_card() {
        let deck = build_deck();
        let (card, rest) = draw(&deck).unwrap();
        assert_eq!(card, deck[0]);
        assert_eq!(rest.len(), UNIVERSE_SIZE - 1);
        assert!(rest.iter().all(|c| c.id != card.id));
    }

    #[test]
    fn draw_on_empty_deck_fails() {
        assert_eq!(draw(&[]), Err(GameError::EmptyDeck));
    }

    #[test]
    fn exchange_puts_discard_on_top() {
        let deck = build_deck();
        let hand = vec![deck[0], deck[1]];
        let rest = deck[2..].to_vec();
        let ex = exchange(&hand, 1, &rest).unwrap();
        assert_eq!(ex.hand, vec![deck[0], deck[2]]);
        assert_eq!(ex.discarded, deck[1]);
        assert_eq!(ex.deck[0], deck[1]);
        assert_eq!(ex.deck.len(), rest.len());

        // the discarded card is the next one drawn
        let (redrawn, _) = draw(&ex.deck).unwrap();
        assert_eq!(redrawn, deck[1]);
    }

    #[test]
    fn exchange_rejects_out_of_range_index() {
        let deck = build_deck();
        let hand = vec![deck[0]];
        assert_eq!(
            exchange(&hand, 3, &deck[1..]),
            Err(GameError::InvalidIndex { index: 3, len: 1 })
        );
    }

    #[test]
    fn exchange_with_empty_deck_fails() {
        let deck = build_deck();
        assert_eq!(exchange(&deck[..2], 0, &[]), Err(GameError::EmptyDeck));
    }

    #[test]
    fn seeded_deck_is_reproducible() {
        let a = Deck::shuffled_with_seed(9);
        let b = Deck::shuffled_with_seed(9);
        assert_eq!(a.cards(), b.cards());
        assert_eq!(a.remaining(), UNIVERSE_SIZE);
    }
}
