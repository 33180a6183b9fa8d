use crate::cards::Card;
use crate::errors::GameError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Most cards a hand may hold.
pub const MAX_HAND_SIZE: usize = 5;

/// Cards dealt to each side when a game starts.
pub const STARTING_HAND_SIZE: usize = 2;

/// One of the two seats at the table.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    Player,
    Dealer,
}

impl Side {
    pub fn opponent(self) -> Side {
        match self {
            Side::Player => Side::Dealer,
            Side::Dealer => Side::Player,
        }
    }
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Side::Player => f.write_str("player"),
            Side::Dealer => f.write_str("dealer"),
        }
    }
}

/// Winner as shown to a renderer. `Tie` only appears while a tie-break is
/// still pending.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Winner {
    Player,
    Dealer,
    Tie,
}

impl From<Side> for Winner {
    fn from(side: Side) -> Self {
        match side {
            Side::Player => Winner::Player,
            Side::Dealer => Winner::Dealer,
        }
    }
}

/// Represents a player action during their turn.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PlayerAction {
    /// Take the top card of the deck
    Draw,
    /// Swap the card at this hand index for the top of the deck
    Exchange(usize),
    /// Shield the card at this hand index from a Sabacc Shift
    Lock(usize),
    /// End the turn
    Stand,
}

/// A seat's cards and turn flags.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Player {
    hand: Vec<Card>,
    locked_card: Option<Card>,
    has_stood: bool,
}

impl Player {
    pub fn with_hand(hand: Vec<Card>) -> Self {
        Self {
            hand,
            locked_card: None,
            has_stood: false,
        }
    }

    pub fn hand(&self) -> &[Card] {
        &self.hand
    }

    pub fn locked_card(&self) -> Option<&Card> {
        self.locked_card.as_ref()
    }

    pub fn has_stood(&self) -> bool {
        self.has_stood
    }

    pub fn is_full(&self) -> bool {
        self.hand.len() >= MAX_HAND_SIZE
    }

    pub fn locked_index(&self) -> Option<usize> {
        let locked = self.locked_card.as_ref()?;
        self.hand.iter().position(|c| c.id == locked.id)
    }

    pub fn receive(&self, card: Card) -> Result<Self, GameError> {
        if self.is_full() {
            return Err(GameError::HandFull);
        }
        let mut next = self.clone();
        next.hand.push(card);
        Ok(next)
    }

    /// Locks the card at `index`. Locking another card moves the lock;
    /// locking the card that is already locked is rejected.
    pub fn lock(&self, index: usize) -> Result<Self, GameError> {
        let card = *self.hand.get(index).ok_or(GameError::InvalidIndex {
            index,
            len: self.hand.len(),
        })?;
        if self.locked_index() == Some(index) {
            return Err(GameError::AlreadyLocked { index });
        }
        let mut next = self.clone();
        next.locked_card = Some(card);
        Ok(next)
    }

    pub fn with_replaced_hand(&self, hand: Vec<Card>) -> Self {
        // a shift keeps ids, so the locked card is refreshed from the new hand
        let locked_card = self
            .locked_card
            .and_then(|locked| hand.iter().copied().find(|c| c.id == locked.id));
        Self {
            hand,
            locked_card,
            has_stood: self.has_stood,
        }
    }

    pub fn stood(&self) -> Self {
        let mut next = self.clone();
        next.has_stood = true;
        next
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cards::build_deck;

    #[test]
    fn receive_refuses_a_sixth_card() {
        let deck = build_deck();
        let full = Player::with_hand(deck[..5].to_vec());
        assert_eq!(full.receive(deck[5]), Err(GameError::HandFull));
        let four = Player::with_hand(deck[..4].to_vec());
        assert_eq!(four.receive(deck[4]).unwrap().hand().len(), 5);
    }

    #[test]
    fn lock_moves_but_never_relocks_same_card() {
        let deck = build_deck();
        let p = Player::with_hand(deck[..3].to_vec());
        let locked = p.lock(1).unwrap();
        assert_eq!(locked.locked_card(), Some(&deck[1]));
        assert_eq!(locked.lock(1), Err(GameError::AlreadyLocked { index: 1 }));
        let moved = locked.lock(2).unwrap();
        assert_eq!(moved.locked_index(), Some(2));
        assert_eq!(
            p.lock(7),
            Err(GameError::InvalidIndex { index: 7, len: 3 })
        );
    }

    #[test]
    fn transitions_leave_original_untouched() {
        let deck = build_deck();
        let p = Player::with_hand(deck[..2].to_vec());
        let _ = p.receive(deck[2]).unwrap().stood();
        assert_eq!(p.hand().len(), 2);
        assert!(!p.has_stood());
    }
}
