//! Markdown response formatters for bot commands.
//!
//! This module provides functions to format bot responses in Markdown format
//! for display in Matrix chat rooms.

use std::fmt;

use crate::{
    commands::{
        BotKind,
        command::{ADD_ALIAS_USAGE, GET_HOURS_USAGE, LOG_HOURS_USAGE, VERIFY_USAGE},
    },
    error::{CommandError, HoursProblem},
    membership::Tier,
    utils::pick_random,
    volunteers::{AliasTable, PersonTotal},
};

/// Replies to successfully logged hours.
const APPRECIATIONS: [&str; 3] = ["Thanks!", "Nice!", "Sweet!"];

/// Openers of a successful verification.
const SUCCESSES: [&str; 3] = [
    "Welcome to the party pal!",
    "Happy trails, Hans.",
    "Yippee-ki-yay!",
];

/// Openers of a failed verification.
const FAILURES: [&str; 2] = ["Sorry, Hans. Wrong guess.", "Uh-oh spaghetti-O's!"];

/// Title of the leaderboard table.
const LEADERBOARD_TITLE: &str = "Hours Volunteered";

/// Who a reply talks about.
///
/// Displays as `you` when the sender asked about themselves, or as the
/// canonical name of the member otherwise.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Subject {
    You,
    Member(String),
}

impl Subject {
    /// Resolves `target` and compares it with the sender.
    pub fn new(aliases: &AliasTable, sender_id: &str, target: &str) -> Self {
        if aliases.is_same_person(sender_id, target) {
            Subject::You
        } else {
            Subject::Member(aliases.resolve(target))
        }
    }
}

impl fmt::Display for Subject {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Subject::You => write!(f, "you"),
            Subject::Member(name) => write!(f, "{}", name),
        }
    }
}

/// Formats the help message of `bot`.
///
/// # Examples
///
/// ```
/// # use clubbot::commands::{BotKind, markdown_response::format_help};
/// let help = format_help(BotKind::Membership);
/// assert!(help.contains("!verify"));
/// ```
pub fn format_help(bot: BotKind) -> String {
    match bot {
        BotKind::Volunteers => format!(
            "Commands:\n\
            - `{}`: log volunteer hours, use negative hours to fix a mistake\n\
            - `{}`: show the hours of someone, yours by default\n\
            - `{}`: give a new alias to someone, you by default\n\
            - `!hiscores`: show the best volunteers\n\
            - `!help`: show this help message\n\n\
            The name can be left out to use yours, and any alias works in its place.",
            LOG_HOURS_USAGE, GET_HOURS_USAGE, ADD_ALIAS_USAGE
        ),
        BotKind::Membership => format!(
            "Commands:\n\
            - `{}`: check your membership\n\
            - `!help`: show this help message",
            VERIFY_USAGE
        ),
    }
}

/// Formats the reply to a command with the wrong number of arguments.
pub fn format_usage(usage: &str) -> String {
    format!(
        "Sorry, I didn't understand you. Please try again?\n\
        Here's the format I understand:\n\
        ```\n{}\n```",
        usage
    )
}

/// Formats the reply to rejected hours.
pub fn format_invalid_hours(problem: HoursProblem) -> String {
    match problem {
        HoursProblem::NotANumber => {
            "I couldn't figure out how many hours you did. Please try again?".to_owned()
        }
        HoursProblem::OutOfRange => {
            "I can only add or remove a maximum of 24 hours! Please try again?".to_owned()
        }
        HoursProblem::Zero => "Looks like you didn't contribute any volunteering time. \
            Please try again once you have!"
            .to_owned(),
    }
}

/// Formats the reply to logged hours, opening with a random appreciation.
pub fn format_hours_logged(hours: f64, subject: &Subject) -> String {
    format!(
        "{} I've logged {} hours for {}.",
        pick_random(&APPRECIATIONS),
        hours,
        subject
    )
}

/// Formats the total hours of someone, rounded to one decimal place.
///
/// # Examples
///
/// ```
/// # use clubbot::commands::markdown_response::{format_total_hours, Subject};
/// assert_eq!(format_total_hours(&Subject::You, None), "You haven't volunteered yet.");
/// ```
pub fn format_total_hours(subject: &Subject, hours: Option<f64>) -> String {
    let hours = hours.map(|hours| (hours * 10.0).round() / 10.0);
    match (subject, hours) {
        (Subject::You, Some(hours)) => format!("You have volunteered for {} hours.", hours),
        (Subject::You, None) => "You haven't volunteered yet.".to_owned(),
        (Subject::Member(name), Some(hours)) => {
            format!("{} has volunteered for {} hours.", name, hours)
        }
        (Subject::Member(name), None) => format!("{} hasn't volunteered yet.", name),
    }
}

/// Formats the reply to a registered alias.
pub fn format_alias_added(subject: &Subject, alias: &str) -> String {
    match subject {
        Subject::You => format!("Done! You can now be called `{}`.", alias),
        Subject::Member(name) => format!("Done! {} can now be called `{}`.", name, alias),
    }
}

/// Formats the reply to an alias that is already used.
pub fn format_alias_conflict(alias: &str) -> String {
    format!(
        "Sorry, `{}` is already taken by someone. Please pick another alias?",
        alias
    )
}

/// Formats the leaderboard as a fixed-width table in a code block.
///
/// Hours are rounded to whole hours.
///
/// # Examples
///
/// ```text
/// .-------------------.
/// | Hours Volunteered |
/// |-------------------|
/// | #1 | 12h | alice  |
/// | #2 | 3h  | bob    |
/// '-------------------'
/// ```
pub fn format_leaderboard(hiscores: &[PersonTotal]) -> String {
    if hiscores.is_empty() {
        return "Nobody has volunteered yet.".to_owned();
    }

    let rows: Vec<[String; 3]> = hiscores
        .iter()
        .enumerate()
        .map(|(index, total)| {
            [
                format!("#{}", index + 1),
                format!("{}h", total.hours.round() as i64),
                total.name.clone(),
            ]
        })
        .collect();

    let mut widths = [0usize; 3];
    for row in &rows {
        for (width, cell) in widths.iter_mut().zip(row) {
            *width = (*width).max(cell.chars().count());
        }
    }
    // Room for the title, given to the name column
    let title_width = LEADERBOARD_TITLE.chars().count() + 2;
    let inner = widths.iter().sum::<usize>() + 8;
    if inner < title_width {
        widths[2] += title_width - inner;
    }
    let inner = inner.max(title_width);

    let border = "-".repeat(inner);
    let mut lines = vec![
        format!(".{}.", border),
        format!("|{:^width$}|", LEADERBOARD_TITLE, width = inner),
        format!("|{}|", border),
    ];
    for [rank, hours, name] in &rows {
        lines.push(format!(
            "| {:<w0$} | {:<w1$} | {:<w2$} |",
            rank,
            hours,
            name,
            w0 = widths[0],
            w1 = widths[1],
            w2 = widths[2]
        ));
    }
    lines.push(format!("'{}'", border));

    format!("\n```\n{}\n```", lines.join("\n"))
}

/// Formats the announcement of a crossed milestone.
pub fn format_milestone(milestone: f64) -> String {
    format!(
        "Congratulations, we've now volunteered for more than {} hours!",
        milestone
    )
}

/// Formats the greeting of a verified member.
pub fn format_verified(first_name: &str, last_name: &str, tier: Tier) -> String {
    let membership = match tier {
        Tier::Associate => "an associate member",
        _ => "a full member",
    };
    format!(
        "{} Welcome {} {}, you are {} of the club.",
        pick_random(&SUCCESSES),
        first_name,
        last_name,
        membership
    )
}

/// Formats the reply to a member who did not pay for the current semester.
pub fn format_not_yet_paid() -> String {
    format!(
        "{} You haven't paid your fees for this semester! \
        Tell a committee member if you have paid.",
        pick_random(&FAILURES)
    )
}

/// Formats the reply to an id missing from the signup table.
pub fn format_not_registered(signup_url: Option<&str>) -> String {
    let register = match signup_url {
        Some(url) => format!("Register at {} first.", url),
        None => "Sign up with the club first.".to_owned(),
    };
    format!(
        "{} {} Tell a committee member if you have already.",
        pick_random(&FAILURES),
        register
    )
}

/// Formats the reply to a signed up member without a payment row.
pub fn format_payment_not_recorded() -> String {
    format!(
        "{} You're signed up but I can't find any payment for you. \
        Tell a committee member if you have paid.",
        pick_random(&FAILURES)
    )
}

/// Formats the apology sent when the spreadsheet could not be used.
///
/// The details of `error` are logged, never shown.
pub fn format_external_failure(error: &CommandError) -> String {
    match error {
        CommandError::Configuration(_) => "Sorry, the spreadsheet doesn't look right. \
            Please tell a committee member."
            .to_owned(),
        _ => "Sorry, something went wrong while talking to the spreadsheet. \
            Please try again later."
            .to_owned(),
    }
}

/// Formats any command error into a reply.
///
/// # Arguments
///
/// * `error` - The error to format
/// * `signup_url` - Shown to members who are not registered
pub fn format_command_error(error: &CommandError, signup_url: Option<&str>) -> String {
    match error {
        CommandError::MalformedCommand(usage) => format_usage(usage),
        CommandError::InvalidHours(problem) => format_invalid_hours(*problem),
        CommandError::AliasConflict(alias) => format_alias_conflict(alias),
        CommandError::NotRegistered => format_not_registered(signup_url),
        CommandError::PaymentNotRecorded => format_payment_not_recorded(),
        CommandError::Configuration(_) | CommandError::ExternalService(_) => {
            format_external_failure(error)
        }
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn total(name: &str, hours: f64) -> PersonTotal {
        PersonTotal {
            name: name.to_string(),
            hours,
        }
    }

    #[test]
    fn test_subject() {
        let aliases = AliasTable::from_rows(&vec![vec![json!("bobby"), json!("@bob:example.com")]]);
        assert_eq!(
            Subject::new(&aliases, "@bob:example.com", "Bobby"),
            Subject::You
        );
        assert_eq!(
            Subject::new(&aliases, "@alice:example.com", "bobby"),
            Subject::Member("@bob:example.com".to_string())
        );
        assert_eq!(Subject::You.to_string(), "you");
    }

    #[test]
    fn test_format_help() {
        let help = format_help(BotKind::Volunteers);
        assert!(help.contains(LOG_HOURS_USAGE));
        assert!(help.contains("!hiscores"));
        assert!(!help.contains("!verify"));
    }

    #[test]
    fn test_format_usage() {
        let message = format_usage(VERIFY_USAGE);
        assert!(message.starts_with("Sorry, I didn't understand you."));
        assert!(message.contains("```\n!verify <first-name> <last-name> <id-number>\n```"));
    }

    #[test]
    fn test_format_invalid_hours() {
        assert!(format_invalid_hours(HoursProblem::OutOfRange).contains("24 hours"));
        assert!(format_invalid_hours(HoursProblem::Zero).contains("didn't contribute"));
        assert!(format_invalid_hours(HoursProblem::NotANumber).contains("how many hours"));
    }

    #[test]
    fn test_format_hours_logged() {
        let message = format_hours_logged(2.5, &Subject::Member("bob".to_string()));
        assert!(APPRECIATIONS.iter().any(|line| message.starts_with(line)));
        assert!(message.ends_with("logged 2.5 hours for bob."));
    }

    #[test]
    fn test_format_total_hours() {
        assert_eq!(
            format_total_hours(&Subject::You, Some(12.345)),
            "You have volunteered for 12.3 hours."
        );
        assert_eq!(
            format_total_hours(&Subject::Member("bob".to_string()), Some(4.0)),
            "bob has volunteered for 4 hours."
        );
        assert_eq!(
            format_total_hours(&Subject::Member("bob".to_string()), None),
            "bob hasn't volunteered yet."
        );
    }

    #[test]
    fn test_format_alias_added() {
        assert_eq!(
            format_alias_added(&Subject::You, "bobby"),
            "Done! You can now be called `bobby`."
        );
    }

    #[test]
    fn test_format_leaderboard_empty() {
        assert_eq!(format_leaderboard(&[]), "Nobody has volunteered yet.");
    }

    #[test]
    fn test_format_leaderboard() {
        let table = format_leaderboard(&[total("alice", 11.6), total("bob", 3.2)]);
        let expected = "\n```\n\
            .-------------------.\n\
            | Hours Volunteered |\n\
            |-------------------|\n\
            | #1 | 12h | alice  |\n\
            | #2 | 3h  | bob    |\n\
            '-------------------'\n\
            ```";
        assert_eq!(table, expected);
    }

    #[test]
    fn test_format_leaderboard_long_names() {
        let table = format_leaderboard(&[total("@someone-with-a-long-name:example.com", 1.0)]);
        let lines: Vec<&str> = table.lines().filter(|line| !line.is_empty()).collect();
        let width = lines[1].chars().count();
        assert!(
            lines[1..lines.len() - 1]
                .iter()
                .all(|line| line.chars().count() == width)
        );
        assert!(table.contains("| #1 | 1h | @someone-with-a-long-name:example.com |"));
    }

    #[test]
    fn test_format_milestone() {
        assert_eq!(
            format_milestone(100.0),
            "Congratulations, we've now volunteered for more than 100 hours!"
        );
    }

    #[test]
    fn test_format_verified() {
        let message = format_verified("John", "McClane", Tier::FullMember);
        assert!(SUCCESSES.iter().any(|line| message.starts_with(line)));
        assert!(message.contains("Welcome John McClane, you are a full member"));
        assert!(format_verified("John", "McClane", Tier::Associate).contains("associate member"));
    }

    #[test]
    fn test_format_membership_failures() {
        let not_registered = format_not_registered(Some("https://example.org/signup"));
        assert!(FAILURES.iter().any(|line| not_registered.starts_with(line)));
        assert!(not_registered.contains("Register at https://example.org/signup first."));
        assert!(format_not_registered(None).contains("Sign up with the club first."));
        assert!(format_payment_not_recorded().contains("can't find any payment"));
        assert!(format_not_yet_paid().contains("haven't paid your fees"));
    }

    #[test]
    fn test_format_command_error() {
        assert_eq!(
            format_command_error(&CommandError::AliasConflict("al".to_string()), None),
            format_alias_conflict("al")
        );
        assert!(
            format_command_error(&CommandError::Configuration("no start date".to_string()), None)
                .contains("committee member")
        );
        assert!(
            !format_command_error(&CommandError::ExternalService("secret".to_string()), None)
                .contains("secret")
        );
    }
}
