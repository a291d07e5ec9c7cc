/// Database layer
///
/// - `pool`: PostgreSQL connection pool with a startup health check
/// - `migrations`: Embedded schema migrations
///
/// Queries themselves live in [`crate::repository::postgres`].

pub mod migrations;
pub mod pool;
