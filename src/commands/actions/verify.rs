//! Membership verification command handler.
//!
//! Looks the id number up in the membership tables and greets the member by
//! name, or explains why they are not a member yet.

use log::{debug, info};

use crate::commands::{
    CommandContext, CommandResult,
    command::Command,
    markdown_response::{format_command_error, format_not_yet_paid, format_verified},
};
use crate::membership::Tier;

/// Verifies the membership of the sender.
///
/// # Returns
///
/// - `Some(CommandResult)`: a greeting, or the reason the check failed
/// - `None`: only if the command is not a `Verify` variant
pub fn handle_verify(context: &CommandContext, command: &Command) -> Option<CommandResult> {
    let Command::Verify {
        first_name,
        last_name,
        id_number,
    } = command
    else {
        return None;
    };

    debug!("verifying {} {} ({})", first_name, last_name, id_number);

    let response = match context
        .membership
        .evaluate(id_number, context.today)
        .into_result()
    {
        Ok(Tier::NotYetPaid) => format_not_yet_paid(),
        Ok(tier) => {
            info!(
                "{} verified as {} {} ({:?})",
                context.sender_id, first_name, last_name, tier
            );
            format_verified(first_name, last_name, tier)
        }
        Err(error) => format_command_error(&error, context.signup_url.as_deref()),
    };

    Some(CommandResult::reply(response))
}

#[cfg(test)]
mod tests {
    use chrono::{NaiveDate, Utc};
    use serde_json::json;

    use super::*;
    use crate::{membership::MembershipTables, sheets::Rows};

    fn column(ids: &[&str]) -> Rows {
        ids.iter().map(|id| vec![json!(id)]).collect()
    }

    fn create_test_context(today: NaiveDate) -> CommandContext {
        CommandContext {
            sender_id: "@john:example.com".to_string(),
            aliases: Default::default(),
            totals: Default::default(),
            membership: MembershipTables::from_rows(
                &column(&["1", "2", "3", "4"]),
                &column(&["3"]),
                &column(&["1", "2"]),
                &vec![
                    vec![json!("Yes"), json!("No"), json!("No")],
                    vec![json!("No"), json!("No"), json!("Yes")],
                ],
            ),
            now: Utc::now(),
            today,
            signup_url: Some("https://example.org/signup".to_string()),
        }
    }

    fn verify(id_number: &str, today: NaiveDate) -> String {
        let command = Command::Verify {
            first_name: "John".to_string(),
            last_name: "McClane".to_string(),
            id_number: id_number.to_string(),
        };
        handle_verify(&create_test_context(today), &command)
            .unwrap()
            .response
    }

    fn march() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, 1).unwrap()
    }

    fn september() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 9, 1).unwrap()
    }

    #[test]
    fn test_verify_full_member() {
        assert!(verify("1", march()).contains("Welcome John McClane, you are a full member"));
        assert!(verify("2", september()).contains("you are a full member"));
    }

    #[test]
    fn test_verify_associate() {
        assert!(verify("3", september()).contains("you are an associate member"));
    }

    #[test]
    fn test_verify_not_yet_paid() {
        assert!(verify("1", september()).contains("haven't paid your fees"));
    }

    #[test]
    fn test_verify_payment_not_recorded() {
        assert!(verify("4", march()).contains("can't find any payment"));
    }

    #[test]
    fn test_verify_not_registered() {
        assert!(verify("5", march()).contains("Register at https://example.org/signup first."));
    }

    #[test]
    fn test_handle_verify_wrong_command() {
        assert!(handle_verify(&create_test_context(march()), &Command::Help).is_none());
    }
}
