//! Files keeping a bot logged in across restarts.
//!
//! Each bot has its own directory holding:
//! - `session`: JSON with the Matrix login and the last sync token
//! - `sqlite`: the SDK state store

use std::path::Path;

use anyhow::Context;
use log::{debug, trace, warn};
use matrix_sdk::authentication::matrix::MatrixSession;
use serde::{Deserialize, Serialize};
use tokio::fs;

use crate::utils::get_path;

/// Content of the `session` file.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct SavedSession {
    /// Login returned by the homeserver
    login: MatrixSession,
    /// Where the next sync resumes
    #[serde(skip_serializing_if = "Option::is_none")]
    sync_token: Option<String>,
}

/// Session files of one bot.
#[derive(Debug, Clone)]
pub struct SessionStore {
    /// Session loaded at startup, if any
    saved: Option<SavedSession>,
    session_path: String,
    sqlite_path: String,
}

impl SessionStore {
    /// Opens the session directory, creating it when missing.
    ///
    /// A missing or unreadable `session` file means the bot has to log in
    /// again, it is not an error.
    pub async fn open(dir_path: &str) -> anyhow::Result<SessionStore> {
        fs::create_dir_all(dir_path)
            .await
            .with_context(|| format!("cannot create session directory {}", dir_path))?;

        let session_path = get_path(dir_path, "session");
        let sqlite_path = get_path(dir_path, "sqlite");

        let saved = match read_session(&session_path).await {
            Ok(saved) => saved,
            Err(e) => {
                warn!("ignoring session file {}: {:?}", session_path, e);
                None
            }
        };
        debug!(
            "session directory {} (logged in: {})",
            dir_path,
            saved.is_some()
        );

        Ok(SessionStore {
            saved,
            session_path,
            sqlite_path,
        })
    }

    pub fn sqlite_path(&self) -> &str {
        &self.sqlite_path
    }

    /// Login saved by a previous run.
    pub fn login(&self) -> Option<&MatrixSession> {
        self.saved.as_ref().map(|saved| &saved.login)
    }

    pub fn sync_token(&self) -> Option<&str> {
        self.saved
            .as_ref()
            .and_then(|saved| saved.sync_token.as_deref())
    }

    /// Writes a fresh login, forgetting the previous sync token.
    pub async fn save_login(&self, login: &MatrixSession) -> anyhow::Result<()> {
        trace!("save login to {}", self.session_path);

        let saved = SavedSession {
            login: login.clone(),
            sync_token: None,
        };
        fs::write(&self.session_path, serde_json::to_string(&saved)?).await?;
        Ok(())
    }

    /// Updates the sync token of the saved login.
    pub async fn save_sync_token(&self, sync_token: &str) -> anyhow::Result<()> {
        trace!("save sync token {}", sync_token);

        let mut saved = read_session(&self.session_path)
            .await?
            .context("no login saved")?;
        saved.sync_token = Some(sync_token.to_string());
        fs::write(&self.session_path, serde_json::to_string(&saved)?).await?;
        Ok(())
    }
}

async fn read_session(session_path: &str) -> anyhow::Result<Option<SavedSession>> {
    if !Path::new(session_path).exists() {
        return Ok(None);
    }
    let data = fs::read_to_string(session_path).await?;
    Ok(Some(serde_json::from_str(&data)?))
}

#[cfg(test)]
mod tests {
    use matrix_sdk::{SessionMeta, SessionTokens};
    use tempfile::TempDir;

    use super::*;

    fn create_login() -> MatrixSession {
        MatrixSession {
            meta: SessionMeta {
                user_id: "@volunteers:example.org".try_into().unwrap(),
                device_id: "DEVICEID".into(),
            },
            tokens: SessionTokens {
                access_token: "access_token".to_string(),
                refresh_token: None,
            },
        }
    }

    fn dir_path(temp_dir: &TempDir) -> String {
        temp_dir.path().to_string_lossy().to_string()
    }

    #[tokio::test]
    async fn test_open_empty_directory() {
        let temp_dir = TempDir::new().unwrap();
        let store = SessionStore::open(&dir_path(&temp_dir)).await.unwrap();

        assert!(store.login().is_none());
        assert!(store.sync_token().is_none());
        assert_eq!(store.sqlite_path(), get_path(&dir_path(&temp_dir), "sqlite"));
    }

    #[tokio::test]
    async fn test_open_creates_directory() {
        let temp_dir = TempDir::new().unwrap();
        let bot_dir = get_path(&dir_path(&temp_dir), "membership");

        SessionStore::open(&bot_dir).await.unwrap();
        assert!(Path::new(&bot_dir).is_dir());
    }

    #[tokio::test]
    async fn test_save_and_reopen() {
        let temp_dir = TempDir::new().unwrap();
        let store = SessionStore::open(&dir_path(&temp_dir)).await.unwrap();

        store.save_login(&create_login()).await.unwrap();
        store.save_sync_token("s42_token").await.unwrap();

        let reopened = SessionStore::open(&dir_path(&temp_dir)).await.unwrap();
        assert_eq!(
            reopened.login().unwrap().meta.user_id.as_str(),
            "@volunteers:example.org"
        );
        assert_eq!(reopened.sync_token(), Some("s42_token"));
    }

    #[tokio::test]
    async fn test_new_login_resets_sync_token() {
        let temp_dir = TempDir::new().unwrap();
        let store = SessionStore::open(&dir_path(&temp_dir)).await.unwrap();
        store.save_login(&create_login()).await.unwrap();
        store.save_sync_token("old").await.unwrap();

        store.save_login(&create_login()).await.unwrap();

        let reopened = SessionStore::open(&dir_path(&temp_dir)).await.unwrap();
        assert!(reopened.login().is_some());
        assert!(reopened.sync_token().is_none());
    }

    #[tokio::test]
    async fn test_sync_token_needs_login() {
        let temp_dir = TempDir::new().unwrap();
        let store = SessionStore::open(&dir_path(&temp_dir)).await.unwrap();
        assert!(store.save_sync_token("token").await.is_err());
    }

    #[tokio::test]
    async fn test_corrupted_session_is_ignored() {
        let temp_dir = TempDir::new().unwrap();
        fs::write(get_path(&dir_path(&temp_dir), "session"), "not json")
            .await
            .unwrap();

        let store = SessionStore::open(&dir_path(&temp_dir)).await.unwrap();
        assert!(store.login().is_none());
    }
}
