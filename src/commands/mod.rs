//! Bot command parsing and response formatting.
//!
//! This module provides the command processing pipeline of both bots: the
//! volunteers bot, which logs and reports volunteer hours, and the membership
//! bot, which checks the membership of a club member.
//!
//! # Overview
//!
//! 1. **Parsing** - Converting chat messages into structured [`command::Command`] enums
//! 2. **Validation** - Checking arity and argument values
//! 3. **Execution** - Routing commands to pure handlers working on a snapshot
//!    of the spreadsheet
//! 4. **Response** - Formatting results as Markdown
//! 5. **Writes** - Handlers return the rows to append, the bot applies them
//!
//! # Architecture
//!
//! ```text
//! Matrix Message
//!      │
//!      ▼
//! ┌─────────────┐
//! │  Commander  │  ← Entry point: parse() + parse_command()
//! └─────────────┘
//!      │
//!      ├── parse() ───────────────► command::Command
//!      │
//!      │   (bot fetches the tables the command needs)
//!      │
//!      └── parse_command() ───────► Action handlers ──► CommandResult
//!                                                        - response (MD)
//!                                                        - hours to log
//!                                                        - alias to add
//! ```
//!
//! # Commands
//!
//! | Command | Bot | Arguments |
//! |---------|-----|-----------|
//! | `!logHours` | volunteers | `[name] <description> <hours>` |
//! | `!getHours` | volunteers | `[name]` |
//! | `!addAlias` | volunteers | `[name] <new-alias>` |
//! | `!hiscores`, `!highscores`, `!leaderboards` | volunteers | none |
//! | `!verify` | membership | `<first-name> <last-name> <id-number>` |
//! | `!help` | both | none |
//!
//! The command word is matched without regard to case.
//!
//! # Error Handling
//!
//! - **Silent Errors** ([`CommandParseError::NotForBot`]): regular chat, unknown
//!   commands and commands of the other bot. The rooms are shared so these get
//!   no answer.
//! - **User Errors** ([`CommandParseError::InvalidCommand`]): wrong arguments.
//!   These come with a message for the user.

use chrono::{DateTime, NaiveDate, Utc};

mod actions;
pub mod command;
mod commander;
mod markdown_response;

pub use crate::commands::commander::Commander;
use crate::{
    membership::MembershipTables,
    volunteers::{Alias, AliasTable, HourEntry, Totals},
};

/// The two bots sharing this command pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BotKind {
    /// Logs and reports volunteer hours
    Volunteers,
    /// Verifies club memberships
    Membership,
}

impl BotKind {
    /// Name of the bot, used for logs and data directories.
    pub fn name(&self) -> &'static str {
        match self {
            BotKind::Volunteers => "volunteers",
            BotKind::Membership => "membership",
        }
    }
}

/// Runtime context for command execution.
///
/// Holds the sender and a snapshot of the spreadsheet tables. Tables the
/// command does not need are left empty by the caller (see
/// [`command::Command::needs_aliases`] and friends).
///
/// # Examples
///
/// ```
/// # use clubbot::commands::CommandContext;
/// let context = CommandContext {
///     sender_id: "@user:example.com".to_string(),
///     aliases: Default::default(),
///     totals: Default::default(),
///     membership: Default::default(),
///     now: chrono::Utc::now(),
///     today: chrono::Local::now().date_naive(),
///     signup_url: None,
/// };
/// ```
#[derive(Debug, Clone)]
pub struct CommandContext {
    /// Matrix user ID of the command issuer
    pub sender_id: String,
    /// Alias table
    pub aliases: AliasTable,
    /// Hours per person
    pub totals: Totals,
    /// Membership tables
    pub membership: MembershipTables,
    /// Timestamp given to logged hours
    pub now: DateTime<Utc>,
    /// Local date deciding the semester of a payment
    pub today: NaiveDate,
    /// Where unregistered members can sign up
    pub signup_url: Option<String>,
}

/// Result of command execution.
///
/// Command handlers don't write to the spreadsheet. They return the rows to
/// append through `hours_to_log` and `alias_to_add`, and the caller applies
/// them before sending `response`.
#[derive(Debug)]
pub struct CommandResult {
    /// Markdown-formatted response message
    pub response: String,
    /// Ledger entry to append
    pub hours_to_log: Option<HourEntry>,
    /// Alias to append
    pub alias_to_add: Option<Alias>,
}

impl CommandResult {
    /// A result without any write.
    pub fn reply(response: String) -> Self {
        CommandResult {
            response,
            hours_to_log: None,
            alias_to_add: None,
        }
    }
}

/// Errors that can occur during command parsing.
///
/// # Variants
///
/// * `NotForBot` - Message is not a command or is for a different bot.
///   Should be handled silently without responding to the user.
///
/// * `InvalidCommand` - Command arguments are invalid.
///   Contains a user-friendly error message to display.
#[derive(Debug, PartialEq)]
pub enum CommandParseError {
    /// Message is not for this bot (silent error)
    NotForBot,
    /// Invalid command syntax with error message
    InvalidCommand(String),
}
