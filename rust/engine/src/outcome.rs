use serde::{Deserialize, Serialize};
use std::fmt;

use crate::cards::Card;
use crate::hand::{evaluate_hand, Category, HandEvaluation};
use crate::player::Side;

/// Why a side won outright.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WinReason {
    OpponentBombedOut,
    /// Both hands bombed; the dealer takes it
    BothBombedOut,
    IdiotsArray,
    PureSabacc,
    CloserToTarget,
}

/// Why the hands could not be ranked.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TieReason {
    BothIdiotsArray,
    BothPureSabacc,
    EqualStanding,
}

impl fmt::Display for WinReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            WinReason::OpponentBombedOut => "opponent bombed out",
            WinReason::BothBombedOut => "both hands bombed out",
            WinReason::IdiotsArray => "Idiot's Array",
            WinReason::PureSabacc => "Pure Sabacc",
            WinReason::CloserToTarget => "closer to 23",
        };
        f.write_str(s)
    }
}

impl fmt::Display for TieReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            TieReason::BothIdiotsArray => "both sides hold Idiot's Array",
            TieReason::BothPureSabacc => "both sides hold Pure Sabacc",
            TieReason::EqualStanding => "hands are equally close to 23",
        };
        f.write_str(s)
    }
}

#[derive(Debug, Copy, Clone, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Outcome {
    Winner { side: Side, reason: WinReason },
    NeedsTieBreak(TieReason),
}

/// Ranks the two final hands.
pub fn resolve_outcome(player_hand: &[Card], dealer_hand: &[Card]) -> Outcome {
    resolve_evaluations(&evaluate_hand(player_hand), &evaluate_hand(dealer_hand))
}

/// Priority ladder: bomb-out, Idiot's Array, Pure Sabacc, then distance to +23.
pub fn resolve_evaluations(player: &HandEvaluation, dealer: &HandEvaluation) -> Outcome {
    use Category::*;

    let win = |side, reason| Outcome::Winner { side, reason };

    match (player.category, dealer.category) {
        (BombOut, BombOut) => return win(Side::Dealer, WinReason::BothBombedOut),
        (BombOut, _) => return win(Side::Dealer, WinReason::OpponentBombedOut),
        (_, BombOut) => return win(Side::Player, WinReason::OpponentBombedOut),
        _ => {}
    }

    match (player.category, dealer.category) {
        (IdiotsArray, IdiotsArray) => return Outcome::NeedsTieBreak(TieReason::BothIdiotsArray),
        (IdiotsArray, _) => return win(Side::Player, WinReason::IdiotsArray),
        (_, IdiotsArray) => return win(Side::Dealer, WinReason::IdiotsArray),
        _ => {}
    }

    match (player.category, dealer.category) {
        (PureSabacc, PureSabacc) => return Outcome::NeedsTieBreak(TieReason::BothPureSabacc),
        (PureSabacc, _) => return win(Side::Player, WinReason::PureSabacc),
        (_, PureSabacc) => return win(Side::Dealer, WinReason::PureSabacc),
        _ => {}
    }

    match player.distance().cmp(&dealer.distance()) {
        std::cmp::Ordering::Less => win(Side::Player, WinReason::CloserToTarget),
        std::cmp::Ordering::Greater => win(Side::Dealer, WinReason::CloserToTarget),
        std::cmp::Ordering::Equal => Outcome::NeedsTieBreak(TieReason::EqualStanding),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn eval(total: i32, category: Category) -> HandEvaluation {
        HandEvaluation { total, category }
    }

    fn normal(total: i32) -> HandEvaluation {
        let category = if total.abs() >= 24 {
            Category::BombOut
        } else if total.abs() == 23 {
            Category::PureSabacc
        } else {
            Category::Normal
        };
        eval(total, category)
    }

    #[test]
    fn both_pure_sabacc_needs_tie_break() {
        assert_eq!(
            resolve_evaluations(&normal(23), &normal(-23)),
            Outcome::NeedsTieBreak(TieReason::BothPureSabacc)
        );
    }

    #[test]
    fn player_bomb_out_loses() {
        assert_eq!(
            resolve_evaluations(&normal(30), &normal(10)),
            Outcome::Winner {
                side: Side::Dealer,
                reason: WinReason::OpponentBombedOut
            }
        );
    }

    #[test]
    fn both_bombed_goes_to_dealer() {
        assert_eq!(
            resolve_evaluations(&normal(25), &normal(26)),
            Outcome::Winner {
                side: Side::Dealer,
                reason: WinReason::BothBombedOut
            }
        );
    }

    #[test]
    fn idiots_array_beats_pure_sabacc() {
        assert_eq!(
            resolve_evaluations(&normal(23), &eval(5, Category::IdiotsArray)),
            Outcome::Winner {
                side: Side::Dealer,
                reason: WinReason::IdiotsArray
            }
        );
    }

    #[test]
    fn distance_measured_against_plus_23_only() {
        // -20 is 43 away from +23, 10 is 13 away
        assert_eq!(
            resolve_evaluations(&normal(-20), &normal(10)),
            Outcome::Winner {
                side: Side::Dealer,
                reason: WinReason::CloserToTarget
            }
        );
    }

    #[test]
    fn equal_totals_need_tie_break() {
        assert_eq!(
            resolve_evaluations(&normal(17), &normal(17)),
            Outcome::NeedsTieBreak(TieReason::EqualStanding)
        );
    }
}
