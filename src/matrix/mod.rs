//! Matrix protocol integration for the bots.
//!
//! Each bot runs its own [`MatrixClient`]:
//! - **Login**: password login on the first run, saved session afterwards
//! - **Session**: session files in the data directory of the bot
//! - **Sync**: auto-join on invite and delivery of new text messages
//!
//! # Examples
//!
//! ```no_run
//! use clubbot::matrix::{MatrixClient, UserCredentials};
//!
//! # async fn example() -> anyhow::Result<()> {
//! let credentials = UserCredentials {
//!     user_id: "@volunteers:example.org".to_string(),
//!     password: "password".to_string(),
//!     device_name: "volunteers bot".to_string(),
//! };
//!
//! let client = MatrixClient::new(&credentials, "./data/volunteers").await?;
//! client.sync(|message| println!("{}", message.body)).await;
//! # Ok(())
//! # }
//! ```

mod client;
mod login;
mod session;
mod sync;

pub use crate::matrix::client::MatrixClient;

/// Credentials of a Matrix account
#[derive(Debug, Clone)]
pub struct UserCredentials {
    /// User ID of the matrix account
    pub user_id: String,
    /// Password of the matrix account
    pub password: String,
    /// Display name of the bot and of its device
    pub device_name: String,
}

/// A text message received in a joined room.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IncomingMessage {
    pub body: String,
    pub room_id: String,
    pub sender_id: String,
    pub event_id: String,
}
