use serde::{Deserialize, Serialize};
use std::fmt;

/// Number of distinct cards in a Sabacc universe (60 standard + 16 special).
pub const UNIVERSE_SIZE: usize = 76;

/// Copies of each named special card in the universe.
pub const SPECIAL_COPIES: usize = 2;

/// Every value a card can take during a Sabacc Shift: the union of the
/// standard values (1..=15) and the special values.
pub const SHIFT_VALUE_POOL: [i32; 23] = [
    -15, -14, -13, -11, -10, -8, -2, 0, 1, 2, 3, 4, 5, 6, 7, 8, 9, 10, 11, 12, 13, 14, 15,
];

/// One of the four Sabacc suits. Special cards carry no suit.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Ord, PartialOrd, Serialize, Deserialize)]
pub enum Suit {
    /// Flasks suit
    Flasks,
    /// Sabers suit
    Sabers,
    /// Staves suit
    Staves,
    /// Coins suit
    Coins,
}

impl fmt::Display for Suit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Suit::Flasks => "Flasks",
            Suit::Sabers => "Sabers",
            Suit::Staves => "Staves",
            Suit::Coins => "Coins",
        };
        f.write_str(s)
    }
}

/// Printed name of a card. Numbered ranks keep their number, the four high
/// ranks and the eight specials carry their own names.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Ord, PartialOrd, Serialize, Deserialize)]
pub enum CardName {
    /// Numbered rank 1 through 11
    Number(u8),
    /// Commander (12)
    Commander,
    /// Mistress (13)
    Mistress,
    /// Master (14)
    Master,
    /// Ace (15)
    Ace,
    /// Balance (-11)
    Balance,
    /// The Idiot (0)
    TheIdiot,
    /// Endurance (-8)
    Endurance,
    /// Moderation (-14)
    Moderation,
    /// The Evil One (-15)
    TheEvilOne,
    /// The Queen of Air and Darkness (-2)
    QueenOfAirAndDarkness,
    /// Demise (-13)
    Demise,
    /// The Star (-10)
    TheStar,
}

impl CardName {
    /// Printed value of the card before any shift.
    pub fn base_value(self) -> i32 {
        match self {
            CardName::Number(n) => i32::from(n),
            CardName::Commander => 12,
            CardName::Mistress => 13,
            CardName::Master => 14,
            CardName::Ace => 15,
            CardName::Balance => -11,
            CardName::TheIdiot => 0,
            CardName::Endurance => -8,
            CardName::Moderation => -14,
            CardName::TheEvilOne => -15,
            CardName::QueenOfAirAndDarkness => -2,
            CardName::Demise => -13,
            CardName::TheStar => -10,
        }
    }

    pub fn is_special(self) -> bool {
        special_names().contains(&self)
    }
}

impl fmt::Display for CardName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CardName::Number(n) => write!(f, "{}", n),
            CardName::Commander => f.write_str("Commander"),
            CardName::Mistress => f.write_str("Mistress"),
            CardName::Master => f.write_str("Master"),
            CardName::Ace => f.write_str("Ace"),
            CardName::Balance => f.write_str("Balance"),
            CardName::TheIdiot => f.write_str("The Idiot"),
            CardName::Endurance => f.write_str("Endurance"),
            CardName::Moderation => f.write_str("Moderation"),
            CardName::TheEvilOne => f.write_str("The Evil One"),
            CardName::QueenOfAirAndDarkness => f.write_str("The Queen of Air and Darkness"),
            CardName::Demise => f.write_str("Demise"),
            CardName::TheStar => f.write_str("The Star"),
        }
    }
}

/// Stable identity of a physical card within one universe.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Ord, PartialOrd, Serialize, Deserialize)]
pub struct CardId(pub u8);

impl fmt::Display for CardId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "card_{}", self.0)
    }
}

/// A single Sabacc card.
///
/// Cards are plain values: a shift builds a new `Card` with the same id
/// instead of changing one in place.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub struct Card {
    /// Unique id within the 76-card universe
    pub id: CardId,
    /// Printed name, used for Idiot's Array detection
    pub name: CardName,
    /// Suit, `None` for special cards
    pub suit: Option<Suit>,
    /// Current value (may differ from the printed value after a shift)
    pub value: i32,
}

impl Card {
    pub fn is_suitless(&self) -> bool {
        self.suit.is_none()
    }
}

impl fmt::Display for Card {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.suit {
            Some(suit) => write!(f, "{} of {} ({})", self.name, suit, self.value),
            None => write!(f, "{} ({})", self.name, self.value),
        }
    }
}

pub fn all_suits() -> [Suit; 4] {
    [Suit::Flasks, Suit::Sabers, Suit::Staves, Suit::Coins]
}

/// The fifteen standard ranks in ascending value order.
pub fn standard_names() -> [CardName; 15] {
    [
        CardName::Number(1),
        CardName::Number(2),
        CardName::Number(3),
        CardName::Number(4),
        CardName::Number(5),
        CardName::Number(6),
        CardName::Number(7),
        CardName::Number(8),
        CardName::Number(9),
        CardName::Number(10),
        CardName::Number(11),
        CardName::Commander,
        CardName::Mistress,
        CardName::Master,
        CardName::Ace,
    ]
}

pub fn special_names() -> [CardName; 8] {
    [
        CardName::Balance,
        CardName::TheIdiot,
        CardName::Endurance,
        CardName::Moderation,
        CardName::TheEvilOne,
        CardName::QueenOfAirAndDarkness,
        CardName::Demise,
        CardName::TheStar,
    ]
}

/// Builds the ordered 76-card universe: every suit's fifteen ranks, then two
/// copies of each special. Ids follow that order starting at zero.
pub fn build_deck() -> Vec<Card> {
    let mut v = Vec::with_capacity(UNIVERSE_SIZE);
    let mut next_id = 0u8;
    let mut push = |v: &mut Vec<Card>, name: CardName, suit: Option<Suit>| {
        v.push(Card {
            id: CardId(next_id),
            name,
            suit,
            value: name.base_value(),
        });
        next_id += 1;
    };
    for &s in &all_suits() {
        for &name in &standard_names() {
            push(&mut v, name, Some(s));
        }
    }
    for &name in &special_names() {
        for _ in 0..SPECIAL_COPIES {
            push(&mut v, name, None);
        }
    }
    v
}
