/// Storage abstraction for accounts, products and login tokens
///
/// Handlers talk to the traits in this module only. Two backends implement
/// them:
///
/// - [`postgres::PostgresStore`]: PostgreSQL through an sqlx pool (production)
/// - [`memory::InMemoryStore`]: `RwLock`-guarded maps (tests, local demos)
///
/// All list operations return rows in a stable order so that page-number
/// pagination never skips or repeats a row between requests.

use async_trait::async_trait;
use uuid::Uuid;

use crate::models::{Account, AuthToken, Product};

pub mod memory;
pub mod postgres;

pub use memory::InMemoryStore;
pub use postgres::PostgresStore;

/// Storage error
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// Unique constraint violated on the named field
    #[error("Duplicate value for {0}")]
    Duplicate(&'static str),

    /// Row to update does not exist
    #[error("Record not found")]
    NotFound,

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

pub type StoreResult<T> = Result<T, StoreError>;

/// Account persistence
#[async_trait]
pub trait AccountRepository: Send + Sync {
    /// Inserts a new account
    ///
    /// # Errors
    ///
    /// `StoreError::Duplicate("username")` if the username is taken
    async fn create(&self, account: Account) -> StoreResult<Account>;

    async fn find_by_id(&self, id: Uuid) -> StoreResult<Option<Account>>;

    /// Exact, case-sensitive lookup
    async fn find_by_username(&self, username: &str) -> StoreResult<Option<Account>>;

    /// Accounts in registration order (oldest first)
    async fn list(&self, offset: i64, limit: i64) -> StoreResult<Vec<Account>>;

    /// Accounts newest first
    async fn list_newest(&self, offset: i64, limit: i64) -> StoreResult<Vec<Account>>;

    async fn count(&self) -> StoreResult<i64>;

    /// Replaces the stored row with `account`
    ///
    /// # Errors
    ///
    /// - `StoreError::NotFound` if no row has `account.id`
    /// - `StoreError::Duplicate("username")` if the new username is taken
    async fn update(&self, account: &Account) -> StoreResult<Account>;
}

/// Product persistence
#[async_trait]
pub trait ProductRepository: Send + Sync {
    async fn create(&self, product: Product) -> StoreResult<Product>;

    async fn find_by_id(&self, id: Uuid) -> StoreResult<Option<Product>>;

    /// Products in creation order (oldest first)
    async fn list(&self, offset: i64, limit: i64) -> StoreResult<Vec<Product>>;

    async fn count(&self) -> StoreResult<i64>;

    async fn update(&self, product: &Product) -> StoreResult<Product>;
}

/// Login token persistence
#[async_trait]
pub trait TokenRepository: Send + Sync {
    async fn create(&self, token: AuthToken) -> StoreResult<AuthToken>;

    /// Looks a token up by key hash and stamps `last_used_at`
    async fn authenticate(&self, key_hash: &str) -> StoreResult<Option<AuthToken>>;
}
