use rand::Rng;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;

use crate::cards::{build_deck, Card, CardId, UNIVERSE_SIZE};
use crate::deck::{draw, shuffle};
use crate::errors::GameError;
use crate::outcome::{TieReason, WinReason};
use crate::player::{Player, Side, Winner, MAX_HAND_SIZE, STARTING_HAND_SIZE};
use crate::shift::SHIFT_PROBABILITY;

/// Most steps the dealer may take in one turn.
pub const DEALER_ACTION_CAP: usize = 5;

/// Tunables for one game.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GameConfig {
    pub shift_probability: f64,
    pub dealer_action_cap: usize,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            shift_probability: SHIFT_PROBABILITY,
            dealer_action_cap: DEALER_ACTION_CAP,
        }
    }
}

/// How a finished game was decided.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Resolution {
    Decided(WinReason),
    CoinToss(TieReason),
}

impl fmt::Display for Resolution {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Resolution::Decided(reason) => write!(f, "{}", reason),
            Resolution::CoinToss(reason) => write!(f, "coin toss ({})", reason),
        }
    }
}

/// Turn-controller state. Only moves forward.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "state")]
pub enum Phase {
    PlayerTurn,
    DealerTurn,
    ShiftPending,
    TieBreakPending { reason: TieReason },
    Finished { winner: Side, resolution: Resolution },
}

impl Phase {
    fn rank(&self) -> u8 {
        match self {
            Phase::PlayerTurn => 0,
            Phase::DealerTurn => 1,
            Phase::ShiftPending => 2,
            Phase::TieBreakPending { .. } => 3,
            Phase::Finished { .. } => 4,
        }
    }

    pub fn is_after(&self, other: &Phase) -> bool {
        self.rank() > other.rank()
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Phase::PlayerTurn => f.write_str("player turn"),
            Phase::DealerTurn => f.write_str("dealer turn"),
            Phase::ShiftPending => f.write_str("shift pending"),
            Phase::TieBreakPending { .. } => f.write_str("tie-break pending"),
            Phase::Finished { .. } => f.write_str("finished"),
        }
    }
}

/// Coarse phase as exposed to renderers.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GamePhase {
    Playing,
    ShiftPending,
    Finished,
}

/// Immutable snapshot of a game.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameState {
    pub deck: Vec<Card>,
    pub player: Player,
    pub dealer: Player,
    pub phase: Phase,
    pub message: String,
}

impl GameState {
    pub fn current_turn(&self) -> Side {
        match self.phase {
            Phase::PlayerTurn => Side::Player,
            _ => Side::Dealer,
        }
    }

    pub fn game_phase(&self) -> GamePhase {
        match self.phase {
            Phase::PlayerTurn | Phase::DealerTurn => GamePhase::Playing,
            Phase::ShiftPending | Phase::TieBreakPending { .. } => GamePhase::ShiftPending,
            Phase::Finished { .. } => GamePhase::Finished,
        }
    }

    pub fn winner(&self) -> Option<Winner> {
        match self.phase {
            Phase::Finished { winner, .. } => Some(winner.into()),
            Phase::TieBreakPending { .. } => Some(Winner::Tie),
            _ => None,
        }
    }

    pub fn seat(&self, side: Side) -> &Player {
        match side {
            Side::Player => &self.player,
            Side::Dealer => &self.dealer,
        }
    }

    /// Verifies hand caps, lock membership and that deck plus hands form the
    /// full universe with no duplicates.
    pub fn check_invariants(&self) -> Result<(), GameError> {
        for side in [Side::Player, Side::Dealer] {
            let seat = self.seat(side);
            if seat.hand().len() > MAX_HAND_SIZE {
                return Err(GameError::InvariantViolation(format!(
                    "{} holds {} cards",
                    side,
                    seat.hand().len()
                )));
            }
            if seat.locked_card().is_some() && seat.locked_index().is_none() {
                return Err(GameError::InvariantViolation(format!(
                    "{} locked a card it no longer holds",
                    side
                )));
            }
        }

        let all = self
            .deck
            .iter()
            .chain(self.player.hand())
            .chain(self.dealer.hand());
        let mut seen: HashSet<CardId> = HashSet::with_capacity(UNIVERSE_SIZE);
        let mut count = 0usize;
        for card in all {
            count += 1;
            if usize::from(card.id.0) >= UNIVERSE_SIZE {
                return Err(GameError::InvariantViolation(format!(
                    "unknown card id {}",
                    card.id
                )));
            }
            if !seen.insert(card.id) {
                return Err(GameError::InvariantViolation(format!(
                    "duplicate card id {}",
                    card.id
                )));
            }
        }
        if count != UNIVERSE_SIZE {
            return Err(GameError::InvariantViolation(format!(
                "expected {} cards in play, found {}",
                UNIVERSE_SIZE, count
            )));
        }
        Ok(())
    }
}

/// Shuffles a fresh universe and deals two cards to each side, alternating
/// and starting with the player.
pub fn initialize_game<R: Rng + ?Sized>(rng: &mut R) -> Result<GameState, GameError> {
    let mut deck = shuffle(&build_deck(), rng);
    let mut player = Vec::with_capacity(MAX_HAND_SIZE);
    let mut dealer = Vec::with_capacity(MAX_HAND_SIZE);
    for _ in 0..STARTING_HAND_SIZE {
        let (card, rest) = draw(&deck)?;
        player.push(card);
        let (card, rest) = draw(&rest)?;
        dealer.push(card);
        deck = rest;
    }
    Ok(GameState {
        deck,
        player: Player::with_hand(player),
        dealer: Player::with_hand(dealer),
        phase: Phase::PlayerTurn,
        message: "Your turn: draw, exchange, lock or stand.".to_string(),
    })
}
