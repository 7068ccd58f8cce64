//! Add alias command handler.
//!
//! The new alias must not already be an alias, nor the name of another
//! member. Names are taken from both the alias table and the hours ledger.

use log::debug;

use crate::commands::{
    CommandContext, CommandResult,
    command::Command,
    markdown_response::{Subject, format_alias_added, format_command_error},
};

/// Checks the new alias and returns it for appending.
///
/// # Returns
///
/// - `Some(CommandResult)`: a confirmation and the alias to add, or an error message
/// - `None`: only if the command is not an `AddAlias` variant
pub fn handle_add_alias(context: &CommandContext, command: &Command) -> Option<CommandResult> {
    debug!("handling add alias command: {:?}", command);

    let Command::AddAlias { name, alias } = command else {
        return None;
    };

    let person = name.as_deref().unwrap_or(&context.sender_id);
    let new_alias = match context
        .aliases
        .check_new_alias(person, alias, context.totals.names())
    {
        Ok(new_alias) => new_alias,
        Err(error) => {
            return Some(CommandResult::reply(format_command_error(&error, None)));
        }
    };

    let subject = Subject::new(&context.aliases, &context.sender_id, person);
    Some(CommandResult {
        response: format_alias_added(&subject, &new_alias.alias),
        hours_to_log: None,
        alias_to_add: Some(new_alias),
    })
}
