/// Middleware for the API server
///
/// - `auth`: Token authentication, attaches the requester to each request
/// - `security`: Security response headers

pub mod auth;
pub mod security;
