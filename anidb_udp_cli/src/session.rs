//! Opening an authenticated client from configuration

use crate::config::AppConfig;
use anidb_udp_core::AniDbClient;
use anyhow::{Context, Result};
use dialoguer::{Input, Password};
use zeroize::Zeroizing;

/// Connect and log in, prompting for whatever credentials are missing
pub async fn login(config: &AppConfig) -> Result<AniDbClient> {
    let mut credentials = config.credentials.clone();

    let username = match credentials.username.take() {
        Some(username) => username,
        None => Input::new()
            .with_prompt("AniDB username")
            .interact_text()
            .context("Failed to read username")?,
    };

    let password = match credentials.take_password() {
        Some(password) => password,
        None => Zeroizing::new(
            Password::new()
                .with_prompt("AniDB password")
                .interact()
                .context("Failed to read password")?,
        ),
    };

    let client = connect(config).await?;
    log::debug!("Logging in as {username}");
    client
        .authenticate(&username, &password)
        .await
        .context("Failed to log in to AniDB")?;

    Ok(client)
}

/// Connect without logging in
pub async fn connect(config: &AppConfig) -> Result<AniDbClient> {
    AniDbClient::open(config.client.clone())
        .await
        .with_context(|| {
            format!(
                "Failed to reach {}:{}",
                config.client.server, config.client.port
            )
        })
}
