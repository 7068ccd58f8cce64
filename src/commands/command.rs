//! Command parsing.
//!
//! This module converts chat message text into structured [`Command`] enums.
//! Messages are split on whitespace and the first word, matched without
//! regard to case, selects an entry of the command table.

use log::debug;

use crate::{
    commands::{BotKind, markdown_response::format_command_error},
    error::{CommandError, HoursProblem},
    sheets::parse_number,
};

/// Represents a parsed bot command.
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    /// List the commands of the bot
    Help,
    /// Log volunteer hours
    ///
    /// `name` defaults to the sender when omitted. `hours` is a number but
    /// its range is not checked yet.
    LogHours {
        name: Option<String>,
        description: String,
        hours: f64,
    },
    /// Show the total hours of someone
    GetHours { name: Option<String> },
    /// Give someone a new alias
    AddAlias { name: Option<String>, alias: String },
    /// Show the leaderboard
    Hiscores,
    /// Check a membership and greet the member
    Verify {
        first_name: String,
        last_name: String,
        id_number: String,
    },
}

/// Errors that can occur during command parsing.
#[derive(Debug, PartialEq)]
pub enum CommandParsingError {
    /// The message does not start with a command word
    NotACommand,
    /// The command word is unknown or belongs to the other bot
    NotForBot,
    /// The command is for the bot but its arguments are wrong
    Invalid(CommandError),
}

type ArgumentsParser = fn(&[&str]) -> Result<Command, CommandError>;

/// Command words, the bot answering them (`None` for both) and their parser.
const COMMAND_TABLE: [(&str, Option<BotKind>, ArgumentsParser); 8] = [
    ("!help", None, parse_help),
    ("!loghours", Some(BotKind::Volunteers), parse_log_hours),
    ("!gethours", Some(BotKind::Volunteers), parse_get_hours),
    ("!addalias", Some(BotKind::Volunteers), parse_add_alias),
    ("!hiscores", Some(BotKind::Volunteers), parse_hiscores),
    ("!highscores", Some(BotKind::Volunteers), parse_hiscores),
    ("!leaderboards", Some(BotKind::Volunteers), parse_hiscores),
    ("!verify", Some(BotKind::Membership), parse_verify),
];

pub const LOG_HOURS_USAGE: &str = "!logHours <your-name> <description> <hours>";
pub const GET_HOURS_USAGE: &str = "!getHours <name>";
pub const ADD_ALIAS_USAGE: &str = "!addAlias <name> <new-alias>";
pub const VERIFY_USAGE: &str = "!verify <first-name> <last-name> <id-number>";

impl Command {
    /// Parses a message body into a Command.
    ///
    /// # Arguments
    ///
    /// * `body` - The message text to parse
    /// * `bot` - The bot receiving the message, commands of the other bot are
    ///   not for it
    ///
    /// # Errors
    ///
    /// - The message is not a command - [`CommandParsingError::NotACommand`]
    /// - The command is unknown or for the other bot - [`CommandParsingError::NotForBot`]
    /// - The arguments are wrong - [`CommandParsingError::Invalid`]
    ///
    /// # Examples
    ///
    /// ```
    /// let result = Command::parse("!hiscores", BotKind::Volunteers);
    /// assert_eq!(result, Ok(Command::Hiscores));
    /// ```
    pub fn parse(body: &str, bot: BotKind) -> Result<Self, CommandParsingError> {
        let tokens: Vec<&str> = body.split_whitespace().collect();

        let Some(first) = tokens.first() else {
            return Err(CommandParsingError::NotACommand);
        };
        if !first.starts_with('!') {
            return Err(CommandParsingError::NotACommand);
        }

        let keyword = first.to_lowercase();
        let Some((_, _, parse_arguments)) = COMMAND_TABLE
            .iter()
            .find(|(word, kind, _)| *word == keyword && kind.is_none_or(|kind| kind == bot))
        else {
            return Err(CommandParsingError::NotForBot);
        };

        debug!("parsing command {:?}", tokens);

        parse_arguments(&tokens[1..]).map_err(CommandParsingError::Invalid)
    }

    /// Whether handling the command needs the alias table.
    pub fn needs_aliases(&self) -> bool {
        matches!(
            self,
            Command::LogHours { .. } | Command::GetHours { .. } | Command::AddAlias { .. }
        )
    }

    /// Whether handling the command needs the per-person totals.
    pub fn needs_totals(&self) -> bool {
        matches!(
            self,
            Command::GetHours { .. } | Command::AddAlias { .. } | Command::Hiscores
        )
    }

    /// Whether handling the command needs the membership tables.
    pub fn needs_membership(&self) -> bool {
        matches!(self, Command::Verify { .. })
    }
}

fn parse_help(_: &[&str]) -> Result<Command, CommandError> {
    Ok(Command::Help)
}

fn parse_hiscores(_: &[&str]) -> Result<Command, CommandError> {
    Ok(Command::Hiscores)
}

fn parse_log_hours(arguments: &[&str]) -> Result<Command, CommandError> {
    let (name, description, hours) = match arguments {
        [description, hours] => (None, description, hours),
        [name, description, hours] => (Some(name.to_string()), description, hours),
        _ => return Err(CommandError::MalformedCommand(LOG_HOURS_USAGE.to_string())),
    };

    let Some(hours) = parse_number(hours) else {
        debug!("hours {} are not a number", hours);
        return Err(CommandError::InvalidHours(HoursProblem::NotANumber));
    };

    debug!(
        "parsed log hours command - name: {:?}, description: {}, hours: {}",
        name, description, hours
    );

    Ok(Command::LogHours {
        name,
        description: description.to_string(),
        hours,
    })
}

fn parse_get_hours(arguments: &[&str]) -> Result<Command, CommandError> {
    match arguments {
        [] => Ok(Command::GetHours { name: None }),
        [name] => Ok(Command::GetHours {
            name: Some(name.to_string()),
        }),
        _ => Err(CommandError::MalformedCommand(GET_HOURS_USAGE.to_string())),
    }
}

fn parse_add_alias(arguments: &[&str]) -> Result<Command, CommandError> {
    match arguments {
        [alias] => Ok(Command::AddAlias {
            name: None,
            alias: alias.to_string(),
        }),
        [name, alias] => Ok(Command::AddAlias {
            name: Some(name.to_string()),
            alias: alias.to_string(),
        }),
        _ => Err(CommandError::MalformedCommand(ADD_ALIAS_USAGE.to_string())),
    }
}

fn parse_verify(arguments: &[&str]) -> Result<Command, CommandError> {
    let [first_name, last_name, id_number] = arguments else {
        return Err(CommandError::MalformedCommand(VERIFY_USAGE.to_string()));
    };

    Ok(Command::Verify {
        first_name: first_name.to_string(),
        last_name: last_name.to_string(),
        id_number: id_number.to_string(),
    })
}

/// Formats a parsing error into a user-friendly message.
///
/// Messages that are not commands, or not for this bot, get no answer so the
/// bot stays quiet in rooms shared with other bots.
///
/// # Returns
///
/// * `Some(String)` - A formatted error message for invalid arguments
/// * `None` - For messages the bot should ignore
pub fn format_parsing_error(error: CommandParsingError) -> Option<String> {
    match error {
        CommandParsingError::Invalid(error) => Some(format_command_error(&error, None)),
        _ => None,
    }
}
