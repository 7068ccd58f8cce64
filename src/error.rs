//! Error taxonomy shared by the command handlers.
//!
//! Every failure that can happen while handling a chat command is a
//! [`CommandError`]. User errors carry enough information to build a reply,
//! external failures carry a description that is logged and never shown to
//! the user.

use thiserror::Error;

/// Errors raised while parsing or executing a bot command.
#[derive(Debug, Error, PartialEq)]
pub enum CommandError {
    /// Wrong number of arguments. Holds the usage line of the command.
    #[error("malformed command, expected `{0}`")]
    MalformedCommand(String),

    /// Hours are not a number, out of range or zero.
    #[error("invalid hours: {0}")]
    InvalidHours(HoursProblem),

    /// The alias is already taken by an alias or a member name.
    #[error("alias `{0}` is already in use")]
    AliasConflict(String),

    /// The member id is not in the signup table.
    #[error("member is not registered")]
    NotRegistered,

    /// The member signed up but no payment row exists.
    #[error("no payment recorded for member")]
    PaymentNotRecorded,

    /// The spreadsheet holds data the bot cannot work with.
    #[error("configuration error: {0}")]
    Configuration(String),

    /// The spreadsheet API failed or answered with something unexpected.
    #[error("external service failure: {0}")]
    ExternalService(String),
}

/// Reason why an hours value was rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HoursProblem {
    NotANumber,
    OutOfRange,
    Zero,
}

impl std::fmt::Display for HoursProblem {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            HoursProblem::NotANumber => write!(f, "not a number"),
            HoursProblem::OutOfRange => write!(f, "more than 24 hours"),
            HoursProblem::Zero => write!(f, "zero hours"),
        }
    }
}

impl From<reqwest::Error> for CommandError {
    fn from(error: reqwest::Error) -> Self {
        CommandError::ExternalService(error.to_string())
    }
}

impl CommandError {
    /// Returns `true` for failures that must be logged and answered with a
    /// generic apology instead of a specific message.
    pub fn is_internal(&self) -> bool {
        matches!(
            self,
            CommandError::Configuration(_) | CommandError::ExternalService(_)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_internal_errors() {
        assert!(CommandError::ExternalService("timeout".to_string()).is_internal());
        assert!(CommandError::Configuration("no milestones".to_string()).is_internal());
        assert!(!CommandError::NotRegistered.is_internal());
        assert!(!CommandError::InvalidHours(HoursProblem::Zero).is_internal());
        assert!(!CommandError::AliasConflict("bob".to_string()).is_internal());
    }

    #[test]
    fn test_display_messages() {
        assert_eq!(
            CommandError::InvalidHours(HoursProblem::OutOfRange).to_string(),
            "invalid hours: more than 24 hours"
        );
        assert_eq!(
            CommandError::AliasConflict("bobby".to_string()).to_string(),
            "alias `bobby` is already in use"
        );
    }
}
