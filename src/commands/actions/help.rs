//! Help command handler.

use log::debug;

use crate::commands::{BotKind, CommandResult, markdown_response::format_help};

/// Lists the commands of `bot`.
pub fn handle_help(bot: BotKind) -> CommandResult {
    debug!("handling help command for {} bot", bot.name());

    CommandResult::reply(format_help(bot))
}
