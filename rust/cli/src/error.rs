//! Error type shared by every command handler.
//!
//! Handlers return `Result<(), CliError>`; [`crate::run`] turns the variant
//! into an exit code (see [`crate::exit_code`]).

use sabacc_engine::errors::GameError;
use std::fmt;

#[derive(Debug)]
pub enum CliError {
    /// Reading input, writing output or touching a file failed
    Io(std::io::Error),

    /// Bad arguments or unusable data from the user
    InvalidInput(String),

    /// Configuration could not be loaded or failed validation
    Config(String),

    /// The engine reported a fault while playing a game
    Engine(String),

    /// The user walked away mid-game (closed stdin)
    Interrupted(String),
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CliError::Io(e) => write!(f, "I/O error: {}", e),
            CliError::InvalidInput(msg) => write!(f, "Invalid input: {}", msg),
            CliError::Config(msg) => write!(f, "Configuration error: {}", msg),
            CliError::Engine(msg) => write!(f, "Engine error: {}", msg),
            CliError::Interrupted(msg) => write!(f, "Interrupted: {}", msg),
        }
    }
}

impl std::error::Error for CliError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            CliError::Io(e) => Some(e),
            _ => None,
        }
    }
}

impl From<std::io::Error> for CliError {
    fn from(error: std::io::Error) -> Self {
        CliError::Io(error)
    }
}

impl From<GameError> for CliError {
    fn from(error: GameError) -> Self {
        CliError::Engine(error.to_string())
    }
}

impl CliError {
    pub fn exit_code(&self) -> i32 {
        match self {
            CliError::Interrupted(_) => crate::exit_code::INTERRUPTED,
            _ => crate::exit_code::ERROR,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn engine_faults_convert_with_their_message() {
        let err: CliError = GameError::EmptyDeck.into();
        assert!(matches!(err, CliError::Engine(_)));
        assert!(err.to_string().starts_with("Engine error:"));
    }

    #[test]
    fn interrupted_maps_to_130() {
        assert_eq!(CliError::Interrupted("eof".into()).exit_code(), 130);
        assert_eq!(CliError::InvalidInput("x".into()).exit_code(), 2);
    }
}
