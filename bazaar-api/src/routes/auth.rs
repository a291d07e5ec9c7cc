/// Token login
///
/// # Endpoints
///
/// - `POST /api/login/` - Exchange username and password for a token

use crate::{
    app::AppState,
    error::{ApiError, ApiResult},
    extract::JsonObject,
};
use axum::{extract::State, Json};
use bazaar_shared::{
    auth::password::verify_password,
    models::AuthToken,
    serializers::fields::FieldReader,
};
use serde::Serialize;

const INVALID_CREDENTIALS: &str = "Unable to log in with provided credentials.";

/// Login response
#[derive(Debug, Serialize)]
pub struct LoginResponse {
    /// Plaintext token key, shown only here
    pub token: String,
}

/// Login handler
///
/// Every successful login mints a new token; earlier tokens stay valid.
///
/// # Endpoint
///
/// ```text
/// POST /api/login/
/// Content-Type: application/json
///
/// {
///   "username": "ale",
///   "password": "abcd"
/// }
/// ```
///
/// # Response
///
/// ```json
/// {
///   "token": "bzr_..."
/// }
/// ```
///
/// # Errors
///
/// - `400 Bad Request`: Missing fields, wrong credentials or inactive account
pub async fn login(
    State(state): State<AppState>,
    JsonObject(data): JsonObject,
) -> ApiResult<Json<LoginResponse>> {
    let mut reader = FieldReader::new(&data, false);
    let username = reader.string("username", true);
    let password = reader.password("password", true);

    let (username, password) = match (username, password) {
        (Some(username), Some(password)) => (username, password),
        _ => return Err(reader.into_errors().into()),
    };

    let account = match state.accounts.find_by_username(&username).await? {
        Some(account) if account.is_active => account,
        _ => {
            tracing::info!(%username, "Login rejected: unknown or inactive account");
            return Err(ApiError::non_field(INVALID_CREDENTIALS));
        }
    };

    if !verify_password(&password, &account.password_hash)? {
        tracing::info!(account_id = %account.id, "Login rejected: wrong password");
        return Err(ApiError::non_field(INVALID_CREDENTIALS));
    }

    let (token, key) = AuthToken::issue(account.id);
    let token = state.tokens.create(token).await?;

    tracing::info!(
        account_id = %account.id,
        key_prefix = %token.key_prefix,
        "Issued login token"
    );

    Ok(Json(LoginResponse { token: key }))
}
