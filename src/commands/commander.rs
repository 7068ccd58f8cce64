//! Command orchestration and execution.
//!
//! This module provides the [`Commander`] struct, the entry point for
//! processing bot commands.
//!
//! # Flow
//!
//! ```text
//! Matrix Message → parse() → Command → parse_command() → CommandResult
//! ```

use crate::{
    commands::{
        BotKind, CommandContext, CommandParseError, CommandResult,
        actions::{
            handle_add_alias, handle_get_hours, handle_help, handle_hiscores, handle_log_hours,
            handle_verify,
        },
        command::{Command, format_parsing_error},
        markdown_response::{format_command_error, format_external_failure, format_milestone},
    },
    error::CommandError,
};

/// Command orchestrator of one bot.
///
/// Only the commands of its [`BotKind`] (and `!help`) are parsed, everything
/// else is reported as [`CommandParseError::NotForBot`].
pub struct Commander {
    /// Bot owning this commander
    bot: BotKind,
}

impl Commander {
    /// Creates a new Commander for `bot`.
    ///
    /// # Examples
    ///
    /// ```
    /// # use clubbot::commands::{BotKind, Commander};
    /// let commander = Commander::new(BotKind::Volunteers);
    /// ```
    pub fn new(bot: BotKind) -> Self {
        Commander { bot }
    }

    /// Parses a Matrix message body into a structured command.
    ///
    /// # Arguments
    ///
    /// * `body` - The raw message text from Matrix
    ///
    /// # Returns
    ///
    /// * `Ok(Command)` - Successfully parsed command
    /// * `Err(CommandParseError::NotForBot)` - Message is not a command or for a different bot
    /// * `Err(CommandParseError::InvalidCommand)` - Arguments are invalid
    ///
    /// # Examples
    ///
    /// ```
    /// # use clubbot::commands::{BotKind, Commander};
    /// let commander = Commander::new(BotKind::Volunteers);
    ///
    /// assert!(commander.parse("!hiscores").is_ok());
    /// assert!(commander.parse("Hello, world!").is_err());
    /// assert!(commander.parse("!verify John McClane 1234567").is_err());
    /// ```
    pub fn parse(&self, body: &str) -> Result<Command, CommandParseError> {
        Command::parse(body, self.bot).map_err(|error| match format_parsing_error(error) {
            Some(message) => CommandParseError::InvalidCommand(message),
            None => CommandParseError::NotForBot,
        })
    }

    /// Executes a parsed command and returns the result.
    ///
    /// # Arguments
    ///
    /// * `command` - The parsed command to execute
    /// * `context` - Sender and spreadsheet snapshot
    ///
    /// # Returns
    ///
    /// * `Some(CommandResult)` - Reply and pending writes
    /// * `None` - A handler was given a command it does not handle
    ///
    /// # Command Handlers
    ///
    /// - [`Command::Help`] → [`handle_help`]
    /// - [`Command::LogHours`] → [`handle_log_hours`]
    /// - [`Command::GetHours`] → [`handle_get_hours`]
    /// - [`Command::AddAlias`] → [`handle_add_alias`]
    /// - [`Command::Hiscores`] → [`handle_hiscores`]
    /// - [`Command::Verify`] → [`handle_verify`]
    pub fn parse_command(
        &self,
        command: &Command,
        context: &CommandContext,
    ) -> Option<CommandResult> {
        let result = match command {
            Command::Help => handle_help(self.bot),
            Command::LogHours { .. } => handle_log_hours(context, command)?,
            Command::GetHours { .. } => handle_get_hours(context, command)?,
            Command::AddAlias { .. } => handle_add_alias(context, command)?,
            Command::Hiscores => handle_hiscores(context),
            Command::Verify { .. } => handle_verify(context, command)?,
        };

        Some(result)
    }

    /// Announcement posted to the room when a milestone is crossed.
    ///
    /// # Examples
    ///
    /// ```
    /// # use clubbot::commands::Commander;
    /// let message = Commander::get_milestone_message(100.0);
    /// assert!(message.contains("100 hours"));
    /// ```
    pub fn get_milestone_message(milestone: f64) -> String {
        format_milestone(milestone)
    }

    /// Reply sent when a command failed after parsing.
    ///
    /// Spreadsheet failures get an apology without details, other errors their
    /// own message.
    pub fn get_failure_message(error: &CommandError) -> String {
        if error.is_internal() {
            format_external_failure(error)
        } else {
            format_command_error(error, None)
        }
    }
}
