//! Bot runtime.
//!
//! A [`Bot`] ties a Matrix account to a spreadsheet [`Backend`]. Every
//! message is handled in its own task:
//!
//! 1. the [`Commander`] parses the message, non-commands are dropped
//! 2. the backend reads the tables the command needs
//! 3. the command handler computes the reply and the rows to append
//! 4. the backend appends the rows
//! 5. the reply (and a milestone announcement) is sent
//!
//! Spreadsheet failures are logged and answered with an apology. They never
//! stop the bot.

use std::sync::Arc;

use chrono::{Local, Utc};
use log::{error, info, warn};

use crate::{
    commands::{
        BotKind, CommandContext, CommandParseError, CommandResult, Commander, command::Command,
    },
    config,
    error::CommandError,
    matrix::{IncomingMessage, MatrixClient, UserCredentials},
    membership::MembershipService,
    sheets::{Requester, SheetsRequester},
    utils::get_path,
    volunteers::VolunteerService,
};

/// Spreadsheet side of a bot.
pub enum Backend<R: Requester> {
    Volunteers(VolunteerService<R>),
    Membership {
        service: MembershipService<R>,
        signup_url: Option<String>,
    },
}

/// What the bot sends back for a command.
#[derive(Debug, PartialEq)]
pub struct Reply {
    /// Reply to the command message
    pub response: String,
    /// Message posted to the whole room
    pub announcement: Option<String>,
}

impl<R: Requester> Backend<R> {
    pub fn kind(&self) -> BotKind {
        match self {
            Backend::Volunteers(_) => BotKind::Volunteers,
            Backend::Membership { .. } => BotKind::Membership,
        }
    }

    /// Reads the snapshot `command` works on. Tables it does not need stay
    /// empty.
    async fn context(
        &self,
        command: &Command,
        sender_id: &str,
    ) -> Result<CommandContext, CommandError> {
        let mut context = CommandContext {
            sender_id: sender_id.to_string(),
            aliases: Default::default(),
            totals: Default::default(),
            membership: Default::default(),
            now: Utc::now(),
            today: Local::now().date_naive(),
            signup_url: None,
        };

        match self {
            Backend::Volunteers(service) => {
                if command.needs_aliases() {
                    context.aliases = service.aliases().await?;
                }
                if command.needs_totals() {
                    context.totals = service.totals().await?;
                }
            }
            Backend::Membership {
                service,
                signup_url,
            } => {
                if command.needs_membership() {
                    context.membership = service.tables().await?;
                }
                context.signup_url = signup_url.clone();
            }
        }

        Ok(context)
    }

    /// Appends the rows requested by a command result.
    async fn apply(&self, result: CommandResult) -> Result<Reply, CommandError> {
        let mut announcement = None;

        if let Backend::Volunteers(service) = self {
            if let Some(entry) = &result.hours_to_log {
                announcement = service
                    .log_hours(entry)
                    .await?
                    .map(Commander::get_milestone_message);
            }
            if let Some(alias) = &result.alias_to_add {
                service.add_alias(alias).await?;
            }
        }

        Ok(Reply {
            response: result.response,
            announcement,
        })
    }

    /// Runs a parsed command against the spreadsheet.
    ///
    /// # Returns
    ///
    /// * `Ok(Some(Reply))` - What to send back
    /// * `Ok(None)` - The command produced nothing to send
    /// * `Err(CommandError)` - The spreadsheet could not be read or written
    pub async fn execute(
        &self,
        commander: &Commander,
        command: &Command,
        sender_id: &str,
    ) -> Result<Option<Reply>, CommandError> {
        let context = self.context(command, sender_id).await?;
        let Some(result) = commander.parse_command(command, &context) else {
            return Ok(None);
        };
        self.apply(result).await.map(Some)
    }
}

impl Backend<SheetsRequester> {
    /// Backend of the volunteers bot.
    pub fn volunteers(sheets: &config::Sheets, bot: &config::VolunteersBot) -> Self {
        let requester = SheetsRequester::new(&sheets.url, &bot.spreadsheet_id, &sheets.access_token);
        Backend::Volunteers(VolunteerService::new(requester))
    }

    /// Backend of the membership bot.
    pub fn membership(sheets: &config::Sheets, bot: &config::MembershipBot) -> Self {
        let requester = SheetsRequester::new(&sheets.url, &bot.spreadsheet_id, &sheets.access_token);
        Backend::Membership {
            service: MembershipService::new(requester),
            signup_url: bot.signup_url.clone(),
        }
    }
}

struct MessageContext {
    message: IncomingMessage,
    matrix_client: Arc<MatrixClient>,
    commander: Arc<Commander>,
    backend: Arc<Backend<SheetsRequester>>,
}

pub struct Bot {
    kind: BotKind,

    matrix_client: Arc<MatrixClient>,

    commander: Arc<Commander>,

    backend: Arc<Backend<SheetsRequester>>,
}

impl Bot {
    /// Logs the bot in.
    ///
    /// # Arguments
    ///
    /// * `backend` - Spreadsheet side of the bot, deciding which bot this is
    /// * `matrix` - Matrix account of the bot
    /// * `data_path` - Data directory, the session goes in a subdirectory
    ///   named after the bot
    pub async fn new(
        backend: Backend<SheetsRequester>,
        matrix: &config::Matrix,
        data_path: &str,
    ) -> anyhow::Result<Self> {
        let kind = backend.kind();

        let matrix_client = Arc::new(
            MatrixClient::new(
                &UserCredentials {
                    user_id: matrix.user_id.clone(),
                    password: matrix.password.clone(),
                    device_name: format!("{} bot", kind.name()),
                },
                &get_path(data_path, kind.name()),
            )
            .await?,
        );

        Ok(Bot {
            kind,
            matrix_client,
            commander: Arc::new(Commander::new(kind)),
            backend: Arc::new(backend),
        })
    }

    /// Handles messages until the Matrix sync stops.
    pub async fn start(self) {
        info!("{} bot started", self.kind.name());

        let matrix_client = Arc::clone(&self.matrix_client);
        let commander = Arc::clone(&self.commander);
        let backend = Arc::clone(&self.backend);

        let on_message = move |message: IncomingMessage| {
            Self::handle_matrix_message(MessageContext {
                message,
                matrix_client: Arc::clone(&matrix_client),
                commander: Arc::clone(&commander),
                backend: Arc::clone(&backend),
            })
        };

        self.matrix_client.sync(on_message).await;
        info!("{} bot stopped", self.kind.name());
    }

    fn handle_matrix_message(ctx: MessageContext) {
        tokio::spawn(async move {
            let message = &ctx.message;

            let command = match ctx.commander.parse(&message.body) {
                Ok(command) => command,
                Err(CommandParseError::NotForBot) => return,
                Err(CommandParseError::InvalidCommand(response)) => {
                    ctx.matrix_client.send_reply(message, &response).await;
                    return;
                }
            };

            let reply = match ctx
                .backend
                .execute(&ctx.commander, &command, &message.sender_id)
                .await
            {
                Ok(Some(reply)) => reply,
                Ok(None) => return,
                Err(e) => {
                    if e.is_internal() {
                        error!(
                            "failed to handle {:?} from {}: {}",
                            command, message.sender_id, e
                        );
                    } else {
                        warn!("{:?} from {} rejected: {}", command, message.sender_id, e);
                    }
                    ctx.matrix_client
                        .send_reply(message, &Commander::get_failure_message(&e))
                        .await;
                    return;
                }
            };

            ctx.matrix_client.send_reply(message, &reply.response).await;
            if let Some(announcement) = reply.announcement {
                ctx.matrix_client
                    .send_message(&message.room_id, &announcement)
                    .await;
            }
        });
    }
}

#[cfg(test)]
mod tests {
    use mockall::predicate::{eq, function};
    use serde_json::{Value, json};

    use super::*;
    use crate::sheets::{MockRequester, ValueRender, ranges};

    fn header() -> Vec<Value> {
        vec![json!("Name"), json!("Event"), json!("Date"), json!("Hours")]
    }

    fn mock_milestones(mock_requester: &mut MockRequester, hours_per_call: Vec<f64>) {
        mock_requester
            .expect_get_values()
            .with(eq(ranges::MILESTONES_START_DATE), eq(ValueRender::Unformatted))
            .returning(|_, _| Ok(vec![vec![json!("2020-01-01")]]));
        mock_requester
            .expect_get_values()
            .with(eq(ranges::MILESTONES_COLUMN), eq(ValueRender::Unformatted))
            .returning(|_, _| Ok(vec![vec![json!(0)], vec![json!(100)]]));

        let mut calls = 0;
        mock_requester
            .expect_get_values()
            .with(eq(ranges::DATE_HOURS_TABLE), eq(ValueRender::Unformatted))
            .times(hours_per_call.len())
            .returning(move |_, _| {
                let hours = hours_per_call[calls];
                calls += 1;
                Ok(vec![vec![json!("2024-01-01"), json!(hours)]])
            });
    }

    fn mock_aliases(mock_requester: &mut MockRequester) {
        mock_requester
            .expect_get_values()
            .with(eq(ranges::ALIAS_NAME_TABLE), eq(ValueRender::Formatted))
            .returning(|_, _| Ok(vec![vec![json!("bobby"), json!("@bob:example.com")]]));
    }

    async fn execute(
        backend: &Backend<MockRequester>,
        body: &str,
    ) -> Result<Option<Reply>, CommandError> {
        let commander = Commander::new(backend.kind());
        let command = commander.parse(body).unwrap();
        backend
            .execute(&commander, &command, "@bob:example.com")
            .await
    }

    #[tokio::test]
    async fn test_log_hours_crossing_milestone_is_announced() {
        let mut mock_requester = MockRequester::new();
        mock_aliases(&mut mock_requester);
        mock_milestones(&mut mock_requester, vec![98.0, 100.5]);
        mock_requester
            .expect_append_row()
            .with(
                eq(ranges::HOURS_TABLE_NEXT),
                function(|row: &Vec<Value>| row[0] == json!("@bob:example.com") && row[3] == json!(2.5)),
            )
            .times(1)
            .returning(|_, _| Ok(()));

        let backend = Backend::Volunteers(VolunteerService::new(mock_requester));
        let reply = execute(&backend, "!logHours bobby party 2.5")
            .await
            .unwrap()
            .unwrap();

        assert!(reply.response.ends_with("logged 2.5 hours for you."));
        assert_eq!(
            reply.announcement.as_deref(),
            Some("Congratulations, we've now volunteered for more than 100 hours!")
        );
    }

    #[tokio::test]
    async fn test_invalid_hours_are_not_written() {
        let mut mock_requester = MockRequester::new();
        mock_aliases(&mut mock_requester);
        mock_requester.expect_append_row().times(0);

        let backend = Backend::Volunteers(VolunteerService::new(mock_requester));
        let reply = execute(&backend, "!logHours bob party 25")
            .await
            .unwrap()
            .unwrap();

        assert!(reply.response.contains("maximum of 24 hours"));
        assert!(reply.announcement.is_none());
    }

    #[tokio::test]
    async fn test_add_alias_is_appended() {
        let mut mock_requester = MockRequester::new();
        mock_aliases(&mut mock_requester);
        mock_requester
            .expect_get_values()
            .with(eq(ranges::NORMALISED_HOURS_TABLE), eq(ValueRender::Unformatted))
            .returning(|_, _| Ok(vec![header()]));
        mock_requester
            .expect_append_row()
            .with(
                eq(ranges::ALIASES_TABLE_NEXT),
                eq(vec![json!("rob"), json!("@bob:example.com")]),
            )
            .times(1)
            .returning(|_, _| Ok(()));

        let backend = Backend::Volunteers(VolunteerService::new(mock_requester));
        let reply = execute(&backend, "!addAlias rob").await.unwrap().unwrap();
        assert_eq!(reply.response, "Done! You can now be called `rob`.");
    }

    #[tokio::test]
    async fn test_hiscores_only_reads_totals() {
        let mut mock_requester = MockRequester::new();
        mock_requester
            .expect_get_values()
            .with(eq(ranges::NORMALISED_HOURS_TABLE), eq(ValueRender::Unformatted))
            .times(1)
            .returning(|_, _| {
                Ok(vec![
                    header(),
                    vec![json!("alice"), json!("party"), json!(45352), json!(3)],
                ])
            });

        let backend = Backend::Volunteers(VolunteerService::new(mock_requester));
        let reply = execute(&backend, "!hiscores").await.unwrap().unwrap();
        assert!(reply.response.contains("| #1 | 3h | alice"));
    }

    #[tokio::test]
    async fn test_sheet_failure_is_returned() {
        let mut mock_requester = MockRequester::new();
        mock_requester
            .expect_get_values()
            .returning(|_, _| Err(CommandError::ExternalService("403".to_string())));
        mock_requester.expect_append_row().times(0);

        let backend = Backend::Volunteers(VolunteerService::new(mock_requester));
        let result = execute(&backend, "!getHours").await;
        assert!(matches!(result, Err(CommandError::ExternalService(_))));
    }

    #[tokio::test]
    async fn test_verify_unregistered_shows_signup_url() {
        let mut mock_requester = MockRequester::new();
        mock_requester
            .expect_get_values()
            .returning(|_, _| Ok(vec![vec![json!("1")]]));

        let backend = Backend::Membership {
            service: MembershipService::new(mock_requester),
            signup_url: Some("https://example.org/signup".to_string()),
        };
        let reply = execute(&backend, "!verify John McClane 2")
            .await
            .unwrap()
            .unwrap();

        assert!(reply.response.contains("https://example.org/signup"));
        assert!(reply.announcement.is_none());
    }

    #[tokio::test]
    async fn test_help_reads_nothing() {
        let mock_requester = MockRequester::new();
        let backend = Backend::Membership {
            service: MembershipService::new(mock_requester),
            signup_url: None,
        };
        let reply = execute(&backend, "!help").await.unwrap().unwrap();
        assert!(reply.response.contains("!verify"));
    }
}
