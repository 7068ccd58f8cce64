//! Matrix sync loop.
//!
//! Joins the rooms the bot is invited to and forwards every new text message
//! to a callback. The sync token is saved after each sync so a restarted bot
//! does not answer old messages again.

use std::sync::Arc;

use anyhow::Result;
use log::{error, info, warn};
use matrix_sdk::{
    Client, LoopCtrl, Room, RoomState,
    config::SyncSettings,
    ruma::{
        api::client::filter::FilterDefinition,
        events::room::{
            member::StrippedRoomMemberEvent,
            message::{MessageType, OriginalSyncRoomMessageEvent},
        },
    },
};
use tokio::time::{Duration, sleep};

use crate::matrix::{IncomingMessage, session::SessionStore};

/// Give up joining a room once the retry delay exceeds an hour.
const MAX_JOIN_DELAY_SECS: u64 = 3600;

pub struct MatrixSync {
    client: Client,
    store: SessionStore,
}

impl MatrixSync {
    pub fn new(client: &Client, store: &SessionStore) -> Self {
        MatrixSync {
            client: client.clone(),
            store: store.clone(),
        }
    }

    /// Syncs forever, calling `on_message` for every new text message.
    pub async fn sync<F>(&self, on_message: F) -> Result<()>
    where
        F: Fn(IncomingMessage) + Send + Sync + 'static,
    {
        info!("start syncing");

        self.client.add_event_handler(auto_join_rooms);

        let filter = FilterDefinition::with_lazy_loading();
        let mut sync_settings = SyncSettings::default().filter(filter.into());
        if let Some(sync_token) = self.store.sync_token() {
            sync_settings = sync_settings.token(sync_token);
        }

        // Catch up first so messages sent while offline are not answered
        let next_batch = loop {
            match self.client.sync_once(sync_settings.clone()).await {
                Ok(response) => break response.next_batch,
                Err(e) => {
                    error!("initial sync failed: {e}, retrying");
                    sleep(Duration::from_secs(5)).await;
                }
            }
        };
        self.save_sync_token(&next_batch).await;

        let on_message = Arc::new(on_message);
        self.client.add_event_handler({
            let on_message = Arc::clone(&on_message);
            move |event: OriginalSyncRoomMessageEvent, room: Room| {
                let on_message = Arc::clone(&on_message);
                async move { on_room_message(event, room, on_message.as_ref()) }
            }
        });

        sync_settings = sync_settings.token(next_batch);
        self.client
            .sync_with_result_callback(sync_settings, |sync_result| async move {
                let response = sync_result?;
                self.save_sync_token(&response.next_batch).await;
                Ok(LoopCtrl::Continue)
            })
            .await?;

        Ok(())
    }

    async fn save_sync_token(&self, sync_token: &str) {
        if let Err(e) = self.store.save_sync_token(sync_token).await {
            error!("failed to save sync token: {:?}", e);
        }
    }
}

async fn auto_join_rooms(room_member: StrippedRoomMemberEvent, client: Client, room: Room) {
    let Some(user_id) = client.user_id() else {
        warn!("could not get user id from client");
        return;
    };

    if room_member.state_key != user_id {
        return;
    }

    tokio::spawn(async move {
        info!("auto joining room {}", room.room_id());
        let mut delay = 2;

        // Synapse can send the invite before the room accepts the join
        while let Err(e) = room.join().await {
            error!(
                "failed to join room {} ({e:?}), retrying in {delay}s",
                room.room_id()
            );
            sleep(Duration::from_secs(delay)).await;
            delay *= 2;

            if delay > MAX_JOIN_DELAY_SECS {
                error!("can't join room {} ({e:?})", room.room_id());
                return;
            }
        }
        info!("joined room {}", room.room_id());
    });
}

fn on_room_message<F>(event: OriginalSyncRoomMessageEvent, room: Room, on_message: &F)
where
    F: Fn(IncomingMessage),
{
    if room.state() != RoomState::Joined {
        return;
    }
    if event.sender == room.own_user_id() {
        return;
    }

    let MessageType::Text(text_content) = event.content.msgtype else {
        return;
    };

    on_message(IncomingMessage {
        body: text_content.body,
        room_id: room.room_id().to_string(),
        sender_id: event.sender.to_string(),
        event_id: event.event_id.to_string(),
    });
}
