//! Leaderboard command handler.

use log::debug;

use crate::commands::{CommandContext, CommandResult, markdown_response::format_leaderboard};

/// Replies with the best volunteers.
pub fn handle_hiscores(context: &CommandContext) -> CommandResult {
    let hiscores = context.totals.leaderboard();
    debug!("leaderboard of {} people", hiscores.len());

    CommandResult::reply(format_leaderboard(&hiscores))
}

#[cfg(test)]
mod tests {
    use chrono::{NaiveDate, Utc};
    use serde_json::json;

    use super::*;
    use crate::volunteers::Totals;

    fn create_test_context(rows: Vec<Vec<serde_json::Value>>) -> CommandContext {
        let mut table = vec![vec![json!("Name"), json!("Event"), json!("Date"), json!("Hours")]];
        table.extend(rows);
        CommandContext {
            sender_id: "@bob:example.com".to_string(),
            aliases: Default::default(),
            totals: Totals::from_normalised_rows(&table),
            membership: Default::default(),
            now: Utc::now(),
            today: NaiveDate::from_ymd_opt(2024, 3, 1).unwrap(),
            signup_url: None,
        }
    }

    #[test]
    fn test_handle_hiscores_empty() {
        let result = handle_hiscores(&create_test_context(vec![]));
        assert_eq!(result.response, "Nobody has volunteered yet.");
    }

    #[test]
    fn test_handle_hiscores_ranks() {
        let result = handle_hiscores(&create_test_context(vec![
            vec![json!("bob"), json!("party"), json!(45352), json!(2)],
            vec![json!("alice"), json!("party"), json!(45352), json!(5.5)],
            vec![json!("bob"), json!("cleanup"), json!(45353), json!(1)],
        ]));

        let alice = result.response.find("| #1 | 6h | alice").unwrap();
        let bob = result.response.find("| #2 | 3h | bob").unwrap();
        assert!(alice < bob);
        assert!(result.hours_to_log.is_none());
    }
}
