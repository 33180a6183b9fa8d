//! One module per subcommand.
//!
//! Every handler has the shape
//! `handle_X_command(args.., out: &mut dyn Write, err: &mut dyn Write) -> Result<(), CliError>`
//! so it can be driven from tests with in-memory buffers.

pub mod cfg;
pub mod deal;
pub mod play;
pub mod rng;
pub mod sim;
pub mod stats;

pub use cfg::handle_cfg_command;
pub use deal::handle_deal_command;
pub use play::handle_play_command;
pub use rng::handle_rng_command;
pub use sim::handle_sim_command;
pub use stats::handle_stats_command;

use crate::config::{self, Config};
use crate::error::CliError;
use crate::ui;
use sabacc_engine::dealer::DealerPolicy;
use std::io::Write;

/// Resolved configuration, with the failure already reported on `err`.
pub(crate) fn load_config(err: &mut dyn Write) -> Result<Config, CliError> {
    config::load().or_else(|e| {
        ui::write_error(err, &format!("Invalid configuration: {}", e))?;
        Err(CliError::Config(e.to_string()))
    })
}

pub(crate) fn dealer_for(name: &str, err: &mut dyn Write) -> Result<Box<dyn DealerPolicy>, CliError> {
    match sabacc_ai::create_ai(name) {
        Some(policy) => Ok(policy),
        None => {
            let msg = format!(
                "Unknown dealer policy '{}'. Available: {}",
                name,
                sabacc_ai::AVAILABLE_POLICIES.join(", ")
            );
            ui::write_error(err, &msg)?;
            Err(CliError::InvalidInput(msg))
        }
    }
}
