//! Matrix login.
//!
//! The first run logs in with the password and saves the session. Later runs
//! restore the saved session without sending the password again.

use anyhow::Context;
use log::{debug, info};
use matrix_sdk::{Client, ruma::OwnedUserId};

use crate::matrix::{UserCredentials, session::SessionStore};

async fn build_client(user_id: &OwnedUserId, store: &SessionStore) -> anyhow::Result<Client> {
    let client = Client::builder()
        .server_name(user_id.server_name())
        .sqlite_store(store.sqlite_path(), None)
        .build()
        .await?;
    debug!("matrix client created for {}", user_id);
    Ok(client)
}

async fn login(credentials: &UserCredentials, store: &SessionStore) -> anyhow::Result<Client> {
    let user_id: OwnedUserId = credentials.user_id.clone().try_into()?;
    let client = build_client(&user_id, store).await?;

    client
        .matrix_auth()
        .login_username(&user_id, &credentials.password)
        .initial_device_display_name(&credentials.device_name)
        .send()
        .await?;

    let login = client
        .matrix_auth()
        .session()
        .context("no session after login")?;
    store.save_login(&login).await?;

    info!("logged in as {}", user_id);
    Ok(client)
}

async fn restore(credentials: &UserCredentials, store: &SessionStore) -> anyhow::Result<Client> {
    let user_id: OwnedUserId = credentials.user_id.clone().try_into()?;
    let login = store.login().context("no saved session")?;
    if login.meta.user_id != user_id {
        anyhow::bail!(
            "saved session belongs to {}, not {}",
            login.meta.user_id,
            user_id
        );
    }

    let client = build_client(&user_id, store).await?;
    client.restore_session(login.clone()).await?;

    info!("restored session of {}", user_id);
    Ok(client)
}

/// Returns a logged in client, restoring the saved session when there is one.
pub async fn setup_client(
    credentials: &UserCredentials,
    store: &SessionStore,
) -> anyhow::Result<Client> {
    info!("setting up matrix client for user {}", credentials.user_id);

    if store.login().is_some() {
        restore(credentials, store).await
    } else {
        login(credentials, store).await
    }
}
