//! Matrix client of one bot.
//!
//! Wraps the SDK client with what the bots need: logging in, syncing, and
//! sending Markdown messages, either as replies or to the whole room.

use anyhow::Context;
use log::{error, info, warn};
use matrix_sdk::{
    Client,
    ruma::{
        EventId, RoomId, UserId,
        events::room::message::{
            AddMentions, ForwardThread, ReplyMetadata, RoomMessageEventContent,
        },
    },
};

use crate::matrix::{
    IncomingMessage, UserCredentials, login::setup_client, session::SessionStore,
    sync::MatrixSync,
};

pub struct MatrixClient {
    matrix_sync: MatrixSync,
    client: Client,
}

impl MatrixClient {
    /// Logs in (or restores the saved session) and sets the display name.
    ///
    /// # Arguments
    ///
    /// * `credentials` - Account of the bot
    /// * `session_dir` - Directory holding the session files of this bot
    pub async fn new(credentials: &UserCredentials, session_dir: &str) -> anyhow::Result<Self> {
        let store = SessionStore::open(session_dir).await?;
        let client = setup_client(credentials, &store)
            .await
            .with_context(|| format!("failed to set up matrix client {}", credentials.user_id))?;

        if let Err(e) = client
            .account()
            .set_display_name(Some(credentials.device_name.as_str()))
            .await
        {
            warn!("failed to set display name: {:?}", e);
        }

        let matrix_sync = MatrixSync::new(&client, &store);

        Ok(MatrixClient {
            matrix_sync,
            client,
        })
    }

    /// Syncs until the connection fails for good.
    pub async fn sync<F>(&self, on_message: F)
    where
        F: Fn(IncomingMessage) + Send + Sync + 'static,
    {
        match self.matrix_sync.sync(on_message).await {
            Ok(_) => info!("matrix sync ended successfully"),
            Err(e) => error!("matrix sync ended with error: {:?}", e),
        }
    }

    /// Replies to `message` with Markdown `body`.
    pub async fn send_reply(&self, message: &IncomingMessage, body: &str) {
        if let Err(e) = self.reply(message, body).await {
            error!("failed to reply in {}: {:?}", message.room_id, e);
        }
    }

    /// Posts Markdown `body` to the room.
    pub async fn send_message(&self, room_id: &str, body: &str) {
        let content = RoomMessageEventContent::text_markdown(body);
        if let Err(e) = self.send(room_id, content).await {
            error!("failed to send message in {}: {:?}", room_id, e);
        }
    }

    async fn reply(&self, message: &IncomingMessage, body: &str) -> anyhow::Result<()> {
        let sender = UserId::parse(&message.sender_id)?;
        let event = EventId::parse(&message.event_id)?;
        let content = RoomMessageEventContent::text_markdown(body).make_reply_to(
            ReplyMetadata::new(&event, &sender, None),
            ForwardThread::No,
            AddMentions::Yes,
        );
        self.send(&message.room_id, content).await
    }

    async fn send(&self, room_id: &str, content: RoomMessageEventContent) -> anyhow::Result<()> {
        let room_id = RoomId::parse(room_id)?;
        let room = self
            .client
            .get_room(&room_id)
            .with_context(|| format!("unknown room {}", room_id))?;
        room.send(content).await?;
        Ok(())
    }
}
