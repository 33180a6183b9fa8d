//! # sabacc-ai: Decision Policies for Sabacc
//!
//! Provides the dealer's decision ladder and a simple autopilot for the
//! player seat, used by simulators and scripted front-ends.
//!
//! ## Core Components
//!
//! - [`baseline`] - The dealer's rule ladder
//! - [`autopilot`] - Threshold-based player autopilot
//! - [`create_ai`] - Factory for dealer policies by name
//!
//! ## Quick Start
//!
//! ```rust
//! use sabacc_ai::create_ai;
//! use sabacc_engine::coin::RandomCoin;
//! use sabacc_engine::engine::Engine;
//! use sabacc_engine::player::PlayerAction;
//!
//! let dealer = create_ai("baseline").expect("known policy");
//!
//! let mut engine = Engine::new(Some(42)).expect("Failed to deal");
//! engine.apply_player_action(PlayerAction::Stand).expect("stand");
//! engine
//!     .play_out(dealer.as_ref(), &mut RandomCoin::new_with_seed(42))
//!     .expect("finish");
//! assert!(engine.is_finished());
//! ```

use sabacc_engine::dealer::DealerPolicy;
use sabacc_engine::game::GameState;
use sabacc_engine::player::PlayerAction;

pub mod autopilot;
pub mod baseline;

/// Names accepted by [`create_ai`].
pub const AVAILABLE_POLICIES: &[&str] = &["baseline"];

/// Drives the player seat without a human at the keyboard.
///
/// # Example Implementation
///
/// ```rust
/// use sabacc_ai::PlayerPolicy;
/// use sabacc_engine::game::GameState;
/// use sabacc_engine::player::PlayerAction;
///
/// struct Timid;
///
/// impl PlayerPolicy for Timid {
///     fn next_action(&self, _state: &GameState) -> PlayerAction {
///         PlayerAction::Stand
///     }
///
///     fn name(&self) -> &str {
///         "Timid"
///     }
/// }
/// ```
pub trait PlayerPolicy: Send + Sync {
    /// Choose the player's next action from the current snapshot.
    fn next_action(&self, state: &GameState) -> PlayerAction;

    fn name(&self) -> &str;
}

/// Creates a dealer policy by name.
///
/// Returns `None` for unknown names so callers can report the problem
/// instead of crashing.
///
/// # Example
///
/// ```rust
/// use sabacc_ai::create_ai;
///
/// let ai = create_ai("baseline").expect("baseline exists");
/// assert_eq!(ai.name(), "BaselineDealer");
/// assert!(create_ai("oracle").is_none());
/// ```
pub fn create_ai(ai_type: &str) -> Option<Box<dyn DealerPolicy>> {
    match ai_type {
        "baseline" => Some(Box::new(baseline::BaselineDealer::new())),
        _ => None,
    }
}
