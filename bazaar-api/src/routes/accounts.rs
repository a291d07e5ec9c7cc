/// Account endpoints
///
/// # Endpoints
///
/// - `GET   /api/accounts/` - List accounts, oldest first (anyone)
/// - `POST  /api/accounts/` - Register (anyone)
/// - `GET   /api/accounts/newest/:num` - The `num` most recently joined accounts (anyone)
/// - `PATCH /api/accounts/:id/`, `PUT /api/accounts/:id/` - Profile update (owner)
/// - `PATCH /api/accounts/:id/management/` - Activate or deactivate (administrator)

use crate::{
    app::AppState,
    error::{ApiError, ApiResult},
    extract::{JsonObject, UuidPath},
    routes::{absolute_url, PageQuery},
};
use axum::{
    extract::{OriginalUri, Path, Query, State},
    http::{HeaderMap, StatusCode},
    Extension, Json,
};
use bazaar_shared::{
    auth::{
        context::Requester,
        password::hash_password,
        permissions::{is_admin, is_owner, require},
    },
    models::{Account, NewAccount, ProfileChanges},
    pagination::{Page, PageWindow},
    serializers::{
        account::{
            validate_activation, validate_profile_update, validate_registration, AccountPayload,
            AccountResponse, USERNAME_TAKEN,
        },
        FieldErrors,
    },
};
use serde_json::{Map, Value};
use uuid::Uuid;

/// List all accounts
///
/// # Endpoint
///
/// ```text
/// GET /api/accounts/?page=2
/// ```
///
/// # Response
///
/// ```json
/// {
///   "count": 12,
///   "next": null,
///   "previous": "http://host/api/accounts/",
///   "results": [{"id": "uuid", "username": "ale", ...}]
/// }
/// ```
///
/// # Errors
///
/// - `404 Not Found`: Page out of range
pub async fn list_accounts(
    State(state): State<AppState>,
    headers: HeaderMap,
    OriginalUri(uri): OriginalUri,
    query: Option<Query<PageQuery>>,
) -> ApiResult<Json<Page<AccountResponse>>> {
    let page = query.and_then(|Query(q)| q.page);

    let total = state.accounts.count().await?;
    let window = PageWindow::resolve(page.as_deref(), total, state.page_size())?;
    let accounts = state.accounts.list(window.offset, window.limit).await?;

    Ok(Json(Page::new(
        accounts.iter().map(AccountResponse::from).collect(),
        &window,
        &absolute_url(&headers, &uri),
    )))
}

/// List the `num` most recently joined accounts, newest first
///
/// The result set holds at most `num` accounts and is paginated like the
/// full list.
///
/// # Errors
///
/// - `404 Not Found`: `num` is not a non-negative integer, or page out of range
pub async fn newest_accounts(
    State(state): State<AppState>,
    Path(num): Path<String>,
    headers: HeaderMap,
    OriginalUri(uri): OriginalUri,
    query: Option<Query<PageQuery>>,
) -> ApiResult<Json<Page<AccountResponse>>> {
    if num.is_empty() || !num.bytes().all(|b| b.is_ascii_digit()) {
        return Err(ApiError::not_found());
    }
    let num: i64 = num.parse().unwrap_or(i64::MAX);
    let page = query.and_then(|Query(q)| q.page);

    let total = state.accounts.count().await?.min(num);
    let window = PageWindow::resolve(page.as_deref(), total, state.page_size())?;
    let accounts = state.accounts.list_newest(window.offset, window.limit).await?;

    Ok(Json(Page::new(
        accounts.iter().map(AccountResponse::from).collect(),
        &window,
        &absolute_url(&headers, &uri),
    )))
}

/// Register a new account
///
/// # Endpoint
///
/// ```text
/// POST /api/accounts/
/// Content-Type: application/json
///
/// {
///   "username": "ale",
///   "password": "abcd",
///   "first_name": "Alexandre",
///   "last_name": "Alves",
///   "is_seller": true
/// }
/// ```
///
/// # Response
///
/// `201 Created` with the account representation (no password).
///
/// # Errors
///
/// - `400 Bad Request`: Missing or invalid fields, username taken
pub async fn create_account(
    State(state): State<AppState>,
    JsonObject(data): JsonObject,
) -> ApiResult<(StatusCode, Json<AccountResponse>)> {
    let payload = with_unique_username(&state, validate_registration(&data), &data, None).await?;

    let (username, password, first_name, last_name) = match (
        payload.username,
        payload.password,
        payload.first_name,
        payload.last_name,
    ) {
        (Some(u), Some(p), Some(f), Some(l)) => (u, p, f, l),
        _ => return Err(ApiError::InternalError("Validated registration is incomplete".to_string())),
    };

    let account = Account::new(NewAccount {
        username,
        password_hash: hash_password(&password)?,
        first_name,
        last_name,
        is_seller: payload.is_seller.unwrap_or(false),
        is_active: payload.is_active.unwrap_or(true),
        is_superuser: false,
    });

    let account = state.accounts.create(account).await?;

    tracing::info!(
        account_id = %account.id,
        username = %account.username,
        is_seller = account.is_seller,
        "Registered account"
    );

    Ok((StatusCode::CREATED, Json(AccountResponse::from(&account))))
}

/// Full profile update (`PUT`)
pub async fn update_account(
    State(state): State<AppState>,
    Extension(requester): Extension<Requester>,
    UuidPath(id): UuidPath,
    JsonObject(data): JsonObject,
) -> ApiResult<Json<AccountResponse>> {
    update_profile(&state, &requester, id, &data, false).await
}

/// Partial profile update (`PATCH`)
pub async fn partial_update_account(
    State(state): State<AppState>,
    Extension(requester): Extension<Requester>,
    UuidPath(id): UuidPath,
    JsonObject(data): JsonObject,
) -> ApiResult<Json<AccountResponse>> {
    update_profile(&state, &requester, id, &data, true).await
}

/// Owner-only profile update
///
/// May change username, password, names and the seller flag. Activation is
/// not part of the profile; sending a different `is_active` fails with 400.
///
/// # Errors
///
/// - `404 Not Found`: No such account
/// - `401 Unauthorized` / `403 Forbidden`: Requester is not the account
/// - `400 Bad Request`: Invalid fields or username taken
async fn update_profile(
    state: &AppState,
    requester: &Requester,
    id: Uuid,
    data: &Map<String, Value>,
    partial: bool,
) -> ApiResult<Json<AccountResponse>> {
    let mut account = state
        .accounts
        .find_by_id(id)
        .await?
        .ok_or_else(ApiError::not_found)?;

    require(is_owner(requester, &account), requester)?;

    let validated = validate_profile_update(data, partial, &account);
    let payload = with_unique_username(state, validated, data, Some(account.id)).await?;

    let password_hash = payload
        .password
        .as_deref()
        .map(hash_password)
        .transpose()?;

    account.apply_profile(ProfileChanges {
        username: payload.username,
        password_hash,
        first_name: payload.first_name,
        last_name: payload.last_name,
        is_seller: payload.is_seller,
    });

    let account = state.accounts.update(&account).await?;

    tracing::info!(account_id = %account.id, "Updated account profile");

    Ok(Json(AccountResponse::from(&account)))
}

/// Activate or deactivate an account
///
/// Only `is_active` is read from the body; everything else is ignored.
/// Without `is_active` the account is returned unchanged.
///
/// # Endpoint
///
/// ```text
/// PATCH /api/accounts/:id/management/
/// Authorization: Token bzr_...
///
/// {"is_active": false}
/// ```
///
/// # Errors
///
/// - `401 Unauthorized` / `403 Forbidden`: Requester is not an administrator
/// - `404 Not Found`: No such account
/// - `400 Bad Request`: `is_active` is not a boolean
pub async fn set_account_active(
    State(state): State<AppState>,
    Extension(requester): Extension<Requester>,
    UuidPath(id): UuidPath,
    JsonObject(data): JsonObject,
) -> ApiResult<Json<AccountResponse>> {
    require(is_admin(&requester), &requester)?;

    let mut account = state
        .accounts
        .find_by_id(id)
        .await?
        .ok_or_else(ApiError::not_found)?;

    if let Some(active) = validate_activation(&data)? {
        account.set_active(active);
        account = state.accounts.update(&account).await?;

        tracing::info!(
            account_id = %account.id,
            is_active = active,
            admin_id = ?requester.account_id(),
            "Changed account activation"
        );
    }

    Ok(Json(AccountResponse::from(&account)))
}

/// Adds the "username taken" error to the validation outcome
///
/// `current_id` is the account being updated, which may keep its own name.
async fn with_unique_username(
    state: &AppState,
    validated: Result<AccountPayload, FieldErrors>,
    data: &Map<String, Value>,
    current_id: Option<Uuid>,
) -> ApiResult<AccountPayload> {
    let username = data
        .get("username")
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|name| !name.is_empty());

    let taken = match username {
        Some(name) => state
            .accounts
            .find_by_username(name)
            .await?
            .map_or(false, |existing| Some(existing.id) != current_id),
        None => false,
    };

    match validated {
        Ok(payload) if !taken => Ok(payload),
        Ok(_) => Err(FieldErrors::single("username", USERNAME_TAKEN).into()),
        Err(mut errors) => {
            if taken && !errors.contains("username") {
                errors.add("username", USERNAME_TAKEN);
            }
            Err(errors.into())
        }
    }
}
