/// API route handlers
///
/// - `health`: Health check endpoint
/// - `auth`: Token login
/// - `accounts`: Registration, listing, profile updates and activation
/// - `products`: Product catalogue

use axum::http::{header, HeaderMap, Uri};
use serde::Deserialize;

pub mod accounts;
pub mod auth;
pub mod health;
pub mod products;

/// `?page=` query parameter
#[derive(Debug, Default, Deserialize)]
pub struct PageQuery {
    pub page: Option<String>,
}

/// Absolute URL of the current path (no query), built from the `Host` header
///
/// Pass the request's `OriginalUri`: inside the nested `/api` router the
/// plain `Uri` has the prefix stripped.
pub(crate) fn absolute_url(headers: &HeaderMap, uri: &Uri) -> String {
    let host = headers
        .get(header::HOST)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("localhost");

    format!("http://{}{}", host, uri.path())
}
