//! Delays between the scheduled steps that finish a round.

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Work deferred until after the player stands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Continuation {
    DealerTurn,
    Shift,
    CoinToss,
}

/// How long each continuation waits before it runs, in milliseconds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Pacing {
    pub dealer_delay_ms: u64,
    pub shift_delay_ms: u64,
    pub coin_toss_delay_ms: u64,
}

impl Default for Pacing {
    fn default() -> Self {
        Self {
            dealer_delay_ms: 1000,
            shift_delay_ms: 2000,
            coin_toss_delay_ms: 3000,
        }
    }
}

impl Pacing {
    /// No waiting at all; continuations still run on the runtime.
    pub fn immediate() -> Self {
        Self {
            dealer_delay_ms: 0,
            shift_delay_ms: 0,
            coin_toss_delay_ms: 0,
        }
    }

    pub fn delay(&self, step: Continuation) -> Duration {
        let ms = match step {
            Continuation::DealerTurn => self.dealer_delay_ms,
            Continuation::Shift => self.shift_delay_ms,
            Continuation::CoinToss => self.coin_toss_delay_ms,
        };
        Duration::from_millis(ms)
    }
}
