/// Startup administrator
///
/// Superusers cannot be created over HTTP. When `BOOTSTRAP_ADMIN_USERNAME`
/// and `BOOTSTRAP_ADMIN_PASSWORD` are set, the server creates that account at
/// startup unless the username is already taken.

use crate::{app::AppState, config::AdminCredentials};
use anyhow::Context;
use bazaar_shared::{
    auth::password::hash_password,
    models::{Account, NewAccount},
};

/// Creates the administrator account if it does not exist yet
///
/// Returns the new account, or `None` when the username already exists (the
/// existing account is left as it is).
pub async fn ensure_admin(
    state: &AppState,
    credentials: &AdminCredentials,
) -> anyhow::Result<Option<Account>> {
    if let Some(existing) = state
        .accounts
        .find_by_username(&credentials.username)
        .await
        .context("Failed to look up bootstrap administrator")?
    {
        if !existing.is_superuser {
            tracing::warn!(
                username = %existing.username,
                "Bootstrap administrator username belongs to a regular account"
            );
        }
        return Ok(None);
    }

    let account = Account::new(NewAccount {
        username: credentials.username.clone(),
        password_hash: hash_password(&credentials.password)?,
        first_name: "admin".to_string(),
        last_name: "admin".to_string(),
        is_seller: false,
        is_active: true,
        is_superuser: true,
    });

    let account = state
        .accounts
        .create(account)
        .await
        .context("Failed to create bootstrap administrator")?;

    tracing::info!(account_id = %account.id, username = %account.username, "Created bootstrap administrator");

    Ok(Some(account))
}
