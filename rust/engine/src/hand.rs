use serde::{Deserialize, Serialize};

use crate::cards::{Card, CardName};

/// Target total. Hands are measured against +23 only.
pub const SABACC_TARGET: i32 = 23;

/// Totals at or beyond this magnitude bomb out.
pub const BOMB_OUT_THRESHOLD: i32 = 24;

#[derive(Debug, Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Serialize, Deserialize)]
pub enum Category {
    BombOut = 0,
    Normal = 1,
    PureSabacc = 2,
    IdiotsArray = 3,
}

#[derive(Debug, Clone, Copy, Eq, PartialEq, Serialize, Deserialize)]
pub struct HandEvaluation {
    pub total: i32,
    pub category: Category,
}

impl HandEvaluation {
    /// Distance from +23, the metric used to compare two normal hands.
    pub fn distance(&self) -> i32 {
        distance_to_target(self.total)
    }
}

/// Sum of card values. An empty hand totals zero.
pub fn compute_total(hand: &[Card]) -> i32 {
    hand.iter().map(|c| c.value).sum()
}

/// True when the hand holds "The Idiot", a "2" and a "3", in any suit.
pub fn check_idiots_array(hand: &[Card]) -> bool {
    let has = |name: CardName| hand.iter().any(|c| c.name == name);
    has(CardName::TheIdiot) && has(CardName::Number(2)) && has(CardName::Number(3))
}

pub fn check_pure_sabacc(total: i32) -> bool {
    total == SABACC_TARGET || total == -SABACC_TARGET
}

pub fn check_bomb_out(total: i32) -> bool {
    total.abs() >= BOMB_OUT_THRESHOLD
}

pub fn distance_to_target(total: i32) -> i32 {
    (total - SABACC_TARGET).abs()
}

/// Classifies a hand. Bomb-out wins over every other category since a
/// bombed hand loses no matter what it holds.
pub fn evaluate_hand(hand: &[Card]) -> HandEvaluation {
    let total = compute_total(hand);
    let category = if check_bomb_out(total) {
        Category::BombOut
    } else if check_idiots_array(hand) {
        Category::IdiotsArray
    } else if check_pure_sabacc(total) {
        Category::PureSabacc
    } else {
        Category::Normal
    };
    HandEvaluation { total, category }
}
