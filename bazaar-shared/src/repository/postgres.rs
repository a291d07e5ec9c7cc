/// PostgreSQL storage backend
///
/// Queries use `sqlx::query_as` with runtime-checked SQL so the crate builds
/// without a live database.

use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use super::{
    AccountRepository, ProductRepository, StoreError, StoreResult, TokenRepository,
};
use crate::models::{Account, AuthToken, Product};

const ACCOUNT_COLUMNS: &str = "id, username, password_hash, first_name, last_name, \
     is_seller, is_active, is_superuser, date_joined";

const PRODUCT_COLUMNS: &str =
    "id, description, price, quantity, is_active, seller_id, created_at";

const TOKEN_COLUMNS: &str = "id, account_id, key_prefix, key_hash, created_at, last_used_at";

/// Repository implementation backed by a PostgreSQL pool
#[derive(Debug, Clone)]
pub struct PostgresStore {
    pool: PgPool,
}

impl PostgresStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

/// Maps a unique violation on `accounts_username_key` to `Duplicate("username")`
fn map_account_error(err: sqlx::Error) -> StoreError {
    if let sqlx::Error::Database(db_err) = &err {
        if db_err.constraint() == Some("accounts_username_key") {
            return StoreError::Duplicate("username");
        }
    }
    StoreError::Database(err)
}

#[async_trait]
impl AccountRepository for PostgresStore {
    async fn create(&self, account: Account) -> StoreResult<Account> {
        let query = format!(
            r#"
            INSERT INTO accounts ({ACCOUNT_COLUMNS})
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            RETURNING {ACCOUNT_COLUMNS}
            "#
        );

        sqlx::query_as::<_, Account>(&query)
            .bind(account.id)
            .bind(&account.username)
            .bind(&account.password_hash)
            .bind(&account.first_name)
            .bind(&account.last_name)
            .bind(account.is_seller)
            .bind(account.is_active)
            .bind(account.is_superuser)
            .bind(account.date_joined)
            .fetch_one(&self.pool)
            .await
            .map_err(map_account_error)
    }

    async fn find_by_id(&self, id: Uuid) -> StoreResult<Option<Account>> {
        let query = format!("SELECT {ACCOUNT_COLUMNS} FROM accounts WHERE id = $1");

        Ok(sqlx::query_as::<_, Account>(&query)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?)
    }

    async fn find_by_username(&self, username: &str) -> StoreResult<Option<Account>> {
        let query = format!("SELECT {ACCOUNT_COLUMNS} FROM accounts WHERE username = $1");

        Ok(sqlx::query_as::<_, Account>(&query)
            .bind(username)
            .fetch_optional(&self.pool)
            .await?)
    }

    async fn list(&self, offset: i64, limit: i64) -> StoreResult<Vec<Account>> {
        let query = format!(
            r#"
            SELECT {ACCOUNT_COLUMNS}
            FROM accounts
            ORDER BY date_joined ASC, id ASC
            LIMIT $1 OFFSET $2
            "#
        );

        Ok(sqlx::query_as::<_, Account>(&query)
            .bind(limit)
            .bind(offset)
            .fetch_all(&self.pool)
            .await?)
    }

    async fn list_newest(&self, offset: i64, limit: i64) -> StoreResult<Vec<Account>> {
        let query = format!(
            r#"
            SELECT {ACCOUNT_COLUMNS}
            FROM accounts
            ORDER BY date_joined DESC, id DESC
            LIMIT $1 OFFSET $2
            "#
        );

        Ok(sqlx::query_as::<_, Account>(&query)
            .bind(limit)
            .bind(offset)
            .fetch_all(&self.pool)
            .await?)
    }

    async fn count(&self) -> StoreResult<i64> {
        let count: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM accounts")
            .fetch_one(&self.pool)
            .await?;

        Ok(count.0)
    }

    async fn update(&self, account: &Account) -> StoreResult<Account> {
        let query = format!(
            r#"
            UPDATE accounts
            SET username = $2, password_hash = $3, first_name = $4, last_name = $5,
                is_seller = $6, is_active = $7
            WHERE id = $1
            RETURNING {ACCOUNT_COLUMNS}
            "#
        );

        sqlx::query_as::<_, Account>(&query)
            .bind(account.id)
            .bind(&account.username)
            .bind(&account.password_hash)
            .bind(&account.first_name)
            .bind(&account.last_name)
            .bind(account.is_seller)
            .bind(account.is_active)
            .fetch_optional(&self.pool)
            .await
            .map_err(map_account_error)?
            .ok_or(StoreError::NotFound)
    }
}

#[async_trait]
impl ProductRepository for PostgresStore {
    async fn create(&self, product: Product) -> StoreResult<Product> {
        let query = format!(
            r#"
            INSERT INTO products ({PRODUCT_COLUMNS})
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING {PRODUCT_COLUMNS}
            "#
        );

        Ok(sqlx::query_as::<_, Product>(&query)
            .bind(product.id)
            .bind(&product.description)
            .bind(product.price)
            .bind(product.quantity)
            .bind(product.is_active)
            .bind(product.seller_id)
            .bind(product.created_at)
            .fetch_one(&self.pool)
            .await?)
    }

    async fn find_by_id(&self, id: Uuid) -> StoreResult<Option<Product>> {
        let query = format!("SELECT {PRODUCT_COLUMNS} FROM products WHERE id = $1");

        Ok(sqlx::query_as::<_, Product>(&query)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?)
    }

    async fn list(&self, offset: i64, limit: i64) -> StoreResult<Vec<Product>> {
        let query = format!(
            r#"
            SELECT {PRODUCT_COLUMNS}
            FROM products
            ORDER BY created_at ASC, id ASC
            LIMIT $1 OFFSET $2
            "#
        );

        Ok(sqlx::query_as::<_, Product>(&query)
            .bind(limit)
            .bind(offset)
            .fetch_all(&self.pool)
            .await?)
    }

    async fn count(&self) -> StoreResult<i64> {
        let count: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM products")
            .fetch_one(&self.pool)
            .await?;

        Ok(count.0)
    }

    async fn update(&self, product: &Product) -> StoreResult<Product> {
        let query = format!(
            r#"
            UPDATE products
            SET description = $2, price = $3, quantity = $4, is_active = $5
            WHERE id = $1
            RETURNING {PRODUCT_COLUMNS}
            "#
        );

        sqlx::query_as::<_, Product>(&query)
            .bind(product.id)
            .bind(&product.description)
            .bind(product.price)
            .bind(product.quantity)
            .bind(product.is_active)
            .fetch_optional(&self.pool)
            .await?
            .ok_or(StoreError::NotFound)
    }
}

#[async_trait]
impl TokenRepository for PostgresStore {
    async fn create(&self, token: AuthToken) -> StoreResult<AuthToken> {
        let query = format!(
            r#"
            INSERT INTO auth_tokens ({TOKEN_COLUMNS})
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING {TOKEN_COLUMNS}
            "#
        );

        Ok(sqlx::query_as::<_, AuthToken>(&query)
            .bind(token.id)
            .bind(token.account_id)
            .bind(&token.key_prefix)
            .bind(&token.key_hash)
            .bind(token.created_at)
            .bind(token.last_used_at)
            .fetch_one(&self.pool)
            .await?)
    }

    async fn authenticate(&self, key_hash: &str) -> StoreResult<Option<AuthToken>> {
        let query = format!(
            r#"
            UPDATE auth_tokens
            SET last_used_at = NOW()
            WHERE key_hash = $1
            RETURNING {TOKEN_COLUMNS}
            "#
        );

        Ok(sqlx::query_as::<_, AuthToken>(&query)
            .bind(key_hash)
            .fetch_optional(&self.pool)
            .await?)
    }
}
