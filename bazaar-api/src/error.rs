/// Error handling for the API server
///
/// Every handler returns [`ApiResult`]; `ApiError` renders the JSON error
/// shapes clients rely on:
///
/// | Variant          | Status | Body                                   |
/// |------------------|--------|----------------------------------------|
/// | `Validation`     | 400    | `{"field": ["message", ...]}`          |
/// | `NonField`       | 400    | `{"non_field_errors": ["message"]}`    |
/// | `BadRequest`     | 400    | `{"detail": "message"}`                |
/// | `Unauthorized`   | 401    | `{"detail": "message"}`                |
/// | `Forbidden`      | 403    | `{"detail": "message"}`                |
/// | `NotFound`       | 404    | `{"detail": "message"}`                |
/// | `InternalError`  | 500    | `{"detail": "A server error occurred."}` |
///
/// # Example
///
/// ```
/// use bazaar_api::error::{ApiError, ApiResult};
/// use axum::Json;
///
/// async fn handler(found: bool) -> ApiResult<Json<&'static str>> {
///     if !found {
///         return Err(ApiError::not_found());
///     }
///     Ok(Json("ok"))
/// }
/// ```

use axum::{
    http::{header, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use bazaar_shared::{
    auth::{context::AuthError, password::PasswordError, permissions::AuthzError, token::AUTH_SCHEME},
    pagination::PaginationError,
    repository::StoreError,
    serializers::{account::USERNAME_TAKEN, FieldErrors},
};
use serde_json::json;
use std::fmt;

/// API result type alias
pub type ApiResult<T> = Result<T, ApiError>;

const NOT_FOUND: &str = "Not found.";
const SERVER_ERROR: &str = "A server error occurred.";

/// Unified API error type
#[derive(Debug)]
pub enum ApiError {
    /// Field-scoped validation errors (400)
    Validation(FieldErrors),

    /// Errors not tied to a field (400)
    NonField(Vec<String>),

    /// Bad request (400)
    BadRequest(String),

    /// Missing or rejected credentials (401)
    Unauthorized(String),

    /// Authenticated but not allowed (403)
    Forbidden(String),

    /// Not found (404)
    NotFound(String),

    /// Internal server error (500), details are logged only
    InternalError(String),
}

impl ApiError {
    pub fn not_found() -> Self {
        ApiError::NotFound(NOT_FOUND.to_string())
    }

    pub fn non_field(message: impl Into<String>) -> Self {
        ApiError::NonField(vec![message.into()])
    }

    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::Validation(_) | ApiError::NonField(_) | ApiError::BadRequest(_) => {
                StatusCode::BAD_REQUEST
            }
            ApiError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            ApiError::Forbidden(_) => StatusCode::FORBIDDEN,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::InternalError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ApiError::Validation(errors) => write!(f, "{}", errors),
            ApiError::NonField(messages) => write!(f, "Bad request: {}", messages.join(" ")),
            ApiError::BadRequest(msg) => write!(f, "Bad request: {}", msg),
            ApiError::Unauthorized(msg) => write!(f, "Unauthorized: {}", msg),
            ApiError::Forbidden(msg) => write!(f, "Forbidden: {}", msg),
            ApiError::NotFound(msg) => write!(f, "Not found: {}", msg),
            ApiError::InternalError(msg) => write!(f, "Internal error: {}", msg),
        }
    }
}

impl std::error::Error for ApiError {}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();

        let body = match self {
            ApiError::Validation(errors) => json!(errors),
            ApiError::NonField(messages) => json!({ "non_field_errors": messages }),
            ApiError::InternalError(msg) => {
                // Log internal errors but don't expose details to clients
                tracing::error!("Internal error: {}", msg);
                json!({ "detail": SERVER_ERROR })
            }
            ApiError::BadRequest(msg)
            | ApiError::Unauthorized(msg)
            | ApiError::Forbidden(msg)
            | ApiError::NotFound(msg) => json!({ "detail": msg }),
        };

        let mut response = (status, Json(body)).into_response();
        if status == StatusCode::UNAUTHORIZED {
            response
                .headers_mut()
                .insert(header::WWW_AUTHENTICATE, HeaderValue::from_static(AUTH_SCHEME));
        }
        response
    }
}

impl From<FieldErrors> for ApiError {
    fn from(errors: FieldErrors) -> Self {
        ApiError::Validation(errors)
    }
}

impl From<StoreError> for ApiError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::Duplicate("username") => {
                ApiError::Validation(FieldErrors::single("username", USERNAME_TAKEN))
            }
            StoreError::Duplicate(field) => ApiError::Validation(FieldErrors::single(
                field,
                format!("A record with that {} already exists.", field),
            )),
            StoreError::NotFound => ApiError::not_found(),
            StoreError::Database(e) => ApiError::InternalError(format!("Database error: {}", e)),
        }
    }
}

impl From<AuthError> for ApiError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::Store(e) => e.into(),
            AuthError::InvalidHeader(_) | AuthError::InvalidToken | AuthError::Inactive => {
                ApiError::Unauthorized(err.to_string())
            }
        }
    }
}

impl From<AuthzError> for ApiError {
    fn from(err: AuthzError) -> Self {
        match err {
            AuthzError::NotAuthenticated => ApiError::Unauthorized(err.to_string()),
            AuthzError::PermissionDenied => ApiError::Forbidden(err.to_string()),
        }
    }
}

impl From<PasswordError> for ApiError {
    fn from(err: PasswordError) -> Self {
        ApiError::InternalError(err.to_string())
    }
}

impl From<PaginationError> for ApiError {
    fn from(err: PaginationError) -> Self {
        ApiError::NotFound(err.to_string())
    }
}
