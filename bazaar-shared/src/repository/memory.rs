/// In-memory storage backend
///
/// Rows live in vectors behind a single `tokio::sync::RwLock`. Listings sort
/// by timestamp with `id` as the tiebreak, matching the `ORDER BY` clauses of
/// the PostgreSQL backend.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;
use uuid::Uuid;

use super::{
    AccountRepository, ProductRepository, StoreError, StoreResult, TokenRepository,
};
use crate::models::{Account, AuthToken, Product};

#[derive(Debug, Default)]
struct Tables {
    accounts: Vec<Account>,
    products: Vec<Product>,
    tokens: Vec<AuthToken>,
}

/// Repository implementation for development and tests
#[derive(Debug, Default, Clone)]
pub struct InMemoryStore {
    tables: Arc<RwLock<Tables>>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

fn window<T: Clone>(rows: Vec<&T>, offset: i64, limit: i64) -> Vec<T> {
    rows.into_iter()
        .skip(offset.max(0) as usize)
        .take(limit.max(0) as usize)
        .cloned()
        .collect()
}

#[async_trait]
impl AccountRepository for InMemoryStore {
    async fn create(&self, account: Account) -> StoreResult<Account> {
        let mut tables = self.tables.write().await;

        if tables.accounts.iter().any(|a| a.username == account.username) {
            return Err(StoreError::Duplicate("username"));
        }

        tables.accounts.push(account.clone());
        Ok(account)
    }

    async fn find_by_id(&self, id: Uuid) -> StoreResult<Option<Account>> {
        let tables = self.tables.read().await;
        Ok(tables.accounts.iter().find(|a| a.id == id).cloned())
    }

    async fn find_by_username(&self, username: &str) -> StoreResult<Option<Account>> {
        let tables = self.tables.read().await;
        Ok(tables
            .accounts
            .iter()
            .find(|a| a.username == username)
            .cloned())
    }

    async fn list(&self, offset: i64, limit: i64) -> StoreResult<Vec<Account>> {
        let tables = self.tables.read().await;

        let mut rows: Vec<&Account> = tables.accounts.iter().collect();
        rows.sort_by_key(|a| (a.date_joined, a.id));

        Ok(window(rows, offset, limit))
    }

    async fn list_newest(&self, offset: i64, limit: i64) -> StoreResult<Vec<Account>> {
        let tables = self.tables.read().await;

        let mut rows: Vec<&Account> = tables.accounts.iter().collect();
        rows.sort_by_key(|a| std::cmp::Reverse((a.date_joined, a.id)));

        Ok(window(rows, offset, limit))
    }

    async fn count(&self) -> StoreResult<i64> {
        let tables = self.tables.read().await;
        Ok(tables.accounts.len() as i64)
    }

    async fn update(&self, account: &Account) -> StoreResult<Account> {
        let mut tables = self.tables.write().await;

        if tables
            .accounts
            .iter()
            .any(|a| a.id != account.id && a.username == account.username)
        {
            return Err(StoreError::Duplicate("username"));
        }

        let row = tables
            .accounts
            .iter_mut()
            .find(|a| a.id == account.id)
            .ok_or(StoreError::NotFound)?;

        // Registration time and the superuser flag are never rewritten.
        let date_joined = row.date_joined;
        let is_superuser = row.is_superuser;
        *row = Account {
            date_joined,
            is_superuser,
            ..account.clone()
        };

        Ok(row.clone())
    }
}

#[async_trait]
impl ProductRepository for InMemoryStore {
    async fn create(&self, product: Product) -> StoreResult<Product> {
        let mut tables = self.tables.write().await;
        tables.products.push(product.clone());
        Ok(product)
    }

    async fn find_by_id(&self, id: Uuid) -> StoreResult<Option<Product>> {
        let tables = self.tables.read().await;
        Ok(tables.products.iter().find(|p| p.id == id).cloned())
    }

    async fn list(&self, offset: i64, limit: i64) -> StoreResult<Vec<Product>> {
        let tables = self.tables.read().await;

        let mut rows: Vec<&Product> = tables.products.iter().collect();
        rows.sort_by_key(|p| (p.created_at, p.id));

        Ok(window(rows, offset, limit))
    }

    async fn count(&self) -> StoreResult<i64> {
        let tables = self.tables.read().await;
        Ok(tables.products.len() as i64)
    }

    async fn update(&self, product: &Product) -> StoreResult<Product> {
        let mut tables = self.tables.write().await;

        let row = tables
            .products
            .iter_mut()
            .find(|p| p.id == product.id)
            .ok_or(StoreError::NotFound)?;

        row.description = product.description.clone();
        row.price = product.price;
        row.quantity = product.quantity;
        row.is_active = product.is_active;

        Ok(row.clone())
    }
}

#[async_trait]
impl TokenRepository for InMemoryStore {
    async fn create(&self, token: AuthToken) -> StoreResult<AuthToken> {
        let mut tables = self.tables.write().await;
        tables.tokens.push(token.clone());
        Ok(token)
    }

    async fn authenticate(&self, key_hash: &str) -> StoreResult<Option<AuthToken>> {
        let mut tables = self.tables.write().await;

        Ok(tables
            .tokens
            .iter_mut()
            .find(|t| t.key_hash == key_hash)
            .map(|t| {
                t.last_used_at = Some(Utc::now());
                t.clone()
            }))
    }
}
