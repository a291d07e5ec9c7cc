/// Token authentication middleware
///
/// Resolves the `Authorization` header of every request to a [`Requester`]
/// and stores it in the request extensions. Handlers read it with
/// `Extension<Requester>`.
///
/// Requests without credentials continue as [`Requester::Anonymous`]; whether
/// that is acceptable is decided later by the permission predicates. A header
/// that names the `Token` scheme but cannot be resolved ends the request
/// with 401.

use axum::{
    extract::{Request, State},
    http::header,
    middleware::Next,
    response::Response,
};
use bazaar_shared::auth::context::{authenticate, Requester};

use crate::{app::AppState, error::ApiError};

pub async fn token_auth_layer(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let auth_header = req
        .headers()
        .get(header::AUTHORIZATION)
        .map(|v| v.as_bytes());

    let requester = authenticate(auth_header, state.tokens.as_ref(), state.accounts.as_ref())
        .await
        .map_err(|e| {
            tracing::debug!(error = %e, "Token authentication failed");
            ApiError::from(e)
        })?;

    if let Requester::Account(account) = &requester {
        tracing::debug!(account_id = %account.id, "Authenticated request");
    }

    req.extensions_mut().insert(requester);

    Ok(next.run(req).await)
}
