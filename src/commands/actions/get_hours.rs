//! Get hours command handler.

use log::debug;

use crate::commands::{
    CommandContext, CommandResult,
    command::Command,
    markdown_response::{Subject, format_total_hours},
};

/// Replies with the total hours of the target, the sender by default.
///
/// # Returns
///
/// `None` only if the command is not a `GetHours` variant.
pub fn handle_get_hours(context: &CommandContext, command: &Command) -> Option<CommandResult> {
    let Command::GetHours { name } = command else {
        return None;
    };

    let target = name.as_deref().unwrap_or(&context.sender_id);
    let canonical = context.aliases.resolve(target);
    let hours = context.totals.get(&canonical);
    debug!("{} has {:?} hours", canonical, hours);

    let subject = Subject::new(&context.aliases, &context.sender_id, target);
    Some(CommandResult::reply(format_total_hours(&subject, hours)))
}
