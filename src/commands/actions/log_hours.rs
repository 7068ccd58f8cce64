//! Log hours command handler.
//!
//! Checks the hours, resolves the name through the alias table and returns
//! the ledger entry to append. Nothing is logged when a check fails.
//!
//! # Validation
//!
//! Arity and the number format are checked while parsing. The handler then
//! rejects, in order:
//! - more than 24 hours either way
//! - zero hours

use log::debug;

use crate::{
    commands::{
        CommandContext, CommandResult,
        command::Command,
        markdown_response::{Subject, format_command_error, format_hours_logged},
    },
    error::{CommandError, HoursProblem},
    volunteers::HourEntry,
};

/// Most hours that can be added or removed at once.
const MAX_HOURS: f64 = 24.0;

/// Checks the range of `hours`.
///
/// # Errors
///
/// [`CommandError::InvalidHours`] when `|hours|` exceeds 24 or is zero.
fn validate_hours(hours: f64) -> Result<f64, CommandError> {
    if hours.abs() > MAX_HOURS {
        debug!("hours {} out of range", hours);
        return Err(CommandError::InvalidHours(HoursProblem::OutOfRange));
    }
    if hours == 0.0 {
        debug!("no hours to log");
        return Err(CommandError::InvalidHours(HoursProblem::Zero));
    }
    Ok(hours)
}

/// Builds the ledger entry of a `!logHours` command.
///
/// # Returns
///
/// - `Some(CommandResult)`: the appreciation and the entry to log, or an error message
/// - `None`: only if the command is not a `LogHours` variant
pub fn handle_log_hours(context: &CommandContext, command: &Command) -> Option<CommandResult> {
    debug!("handling log hours command: {:?}", command);

    let Command::LogHours {
        name,
        description,
        hours,
    } = command
    else {
        return None;
    };

    let hours = match validate_hours(*hours) {
        Ok(hours) => hours,
        Err(error) => {
            return Some(CommandResult::reply(format_command_error(&error, None)));
        }
    };

    let target = name.as_deref().unwrap_or(&context.sender_id);
    let entry = HourEntry {
        name: context.aliases.resolve(target),
        description: description.clone(),
        timestamp: context.now,
        hours,
    };
    let subject = Subject::new(&context.aliases, &context.sender_id, target);

    Some(CommandResult {
        response: format_hours_logged(hours, &subject),
        hours_to_log: Some(entry),
        alias_to_add: None,
    })
}
