//! Command action handlers.
//!
//! One handler per command. Each handler receives a
//! [`CommandContext`](crate::commands::CommandContext) holding a snapshot of
//! the spreadsheet and returns a [`CommandResult`](crate::commands::CommandResult).
//!
//! Handlers don't write to the spreadsheet. Writes are returned through
//! `hours_to_log` or `alias_to_add` and applied by the bot.

mod add_alias;
mod get_hours;
mod help;
mod hiscores;
mod log_hours;
mod verify;

pub use crate::commands::actions::{
    add_alias::handle_add_alias, get_hours::handle_get_hours, help::handle_help,
    hiscores::handle_hiscores, log_hours::handle_log_hours, verify::handle_verify,
};
