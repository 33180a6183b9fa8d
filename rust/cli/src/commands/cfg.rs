//! Configuration command handler.
//!
//! Prints the resolved configuration as pretty JSON, each field with the
//! layer it came from:
//!
//! ```json
//! {
//!   "ai_version": {
//!     "value": "baseline",
//!     "source": "default"
//!   },
//!   ...
//! }
//! ```

use crate::config;
use crate::error::CliError;
use crate::ui;
use std::io::Write;

pub fn handle_cfg_command(out: &mut dyn Write, err: &mut dyn Write) -> Result<(), CliError> {
    let resolved = match config::load_with_sources() {
        Ok(r) => r,
        Err(e) => {
            ui::write_error(err, &format!("Invalid configuration: {}", e))?;
            return Err(CliError::Config(format!("Invalid configuration: {}", e)));
        }
    };

    let config::ConfigResolved { config, sources } = resolved;
    let display = serde_json::json!({
        "seed": {
            "value": config.seed,
            "source": sources.seed,
        },
        "ai_version": {
            "value": config.ai_version,
            "source": sources.ai_version,
        },
        "shift_probability": {
            "value": config.shift_probability,
            "source": sources.shift_probability,
        },
        "dealer_action_cap": {
            "value": config.dealer_action_cap,
            "source": sources.dealer_action_cap,
        },
        "player_threshold": {
            "value": config.player_threshold,
            "source": sources.player_threshold,
        }
    });
    let json_str = serde_json::to_string_pretty(&display).map_err(std::io::Error::other)?;
    writeln!(out, "{}", json_str)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prints_every_field_with_its_source() {
        let mut out = Vec::new();
        let mut err = Vec::new();
        handle_cfg_command(&mut out, &mut err).unwrap();

        let json: serde_json::Value = serde_json::from_slice(&out).unwrap();
        for key in [
            "seed",
            "ai_version",
            "shift_probability",
            "dealer_action_cap",
            "player_threshold",
        ] {
            assert!(json[key].get("value").is_some(), "missing value for {}", key);
            assert!(json[key]["source"].is_string(), "missing source for {}", key);
        }
    }
}
