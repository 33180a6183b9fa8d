//! # sabacc-engine: Sabacc Game Engine Core
//!
//! A deterministic engine for single-player Sabacc against a dealer.
//! Provides the card catalog, deck handling, hand evaluation, the Sabacc
//! Shift, outcome resolution and the turn controller, with seeded RNG so any
//! game can be replayed.
//!
//! ## Core Modules
//!
//! - [`cards`] - The 76-card universe: suited number cards and named specials
//! - [`deck`] - Shuffling, drawing and exchanging against the draw pile
//! - [`hand`] - Totals, Idiot's Array, Pure Sabacc and bomb-out checks
//! - [`player`] - Seats, hand limits and the interference field lock
//! - [`shift`] - The random Sabacc Shift
//! - [`outcome`] - Ranking two hands against each other
//! - [`coin`] - Coin toss used to break ties
//! - [`dealer`] - The dealer decision seam
//! - [`rules`] - Action legality checks
//! - [`game`] - Game snapshots, phases and the opening deal
//! - [`engine`] - The turn controller
//! - [`logger`] - GameRecord serialization to JSONL
//! - [`errors`] - Error types for game operations
//!
//! ## Quick Start
//!
//! ```rust
//! use sabacc_engine::cards::{Card, CardId, CardName, Suit};
//! use sabacc_engine::hand::{evaluate_hand, Category};
//!
//! let hand = [
//!     Card { id: CardId(0), name: CardName::Commander, suit: Some(Suit::Sabers), value: 12 },
//!     Card { id: CardId(1), name: CardName::Ace, suit: Some(Suit::Coins), value: 15 },
//! ];
//!
//! let eval = evaluate_hand(&hand);
//! assert_eq!(eval.total, 27);
//! assert_eq!(eval.category, Category::BombOut);
//! ```
//!
//! ## Deterministic Gameplay
//!
//! ```rust
//! use sabacc_engine::engine::Engine;
//!
//! let a = Engine::new(Some(42)).unwrap();
//! let b = Engine::new(Some(42)).unwrap();
//! assert_eq!(a.snapshot(), b.snapshot());
//! ```

pub mod cards;
pub mod coin;
pub mod dealer;
pub mod deck;
pub mod engine;
pub mod errors;
pub mod game;
pub mod hand;
pub mod logger;
pub mod outcome;
pub mod player;
pub mod rules;
pub mod shift;
