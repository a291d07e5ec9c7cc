/// Account model
///
/// An account is the credential-holding identity of the marketplace. Sellers
/// are accounts with `is_seller` set; administrators have `is_superuser`.
///
/// # Schema
///
/// ```sql
/// CREATE TABLE accounts (
///     id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
///     username VARCHAR(150) NOT NULL,
///     password_hash VARCHAR(255) NOT NULL,
///     first_name VARCHAR(150) NOT NULL,
///     last_name VARCHAR(150) NOT NULL,
///     is_seller BOOLEAN NOT NULL DEFAULT FALSE,
///     is_active BOOLEAN NOT NULL DEFAULT TRUE,
///     is_superuser BOOLEAN NOT NULL DEFAULT FALSE,
///     date_joined TIMESTAMPTZ NOT NULL DEFAULT NOW(),
///     CONSTRAINT accounts_username_key UNIQUE (username)
/// );
/// ```
///
/// # Example
///
/// ```
/// use bazaar_shared::models::account::{Account, NewAccount, ProfileChanges};
///
/// let mut account = Account::new(NewAccount {
///     username: "ale".to_string(),
///     password_hash: "$argon2id$...".to_string(),
///     first_name: "Alexandre".to_string(),
///     last_name: "Alves".to_string(),
///     is_seller: true,
///     is_active: true,
///     is_superuser: false,
/// });
///
/// account.apply_profile(ProfileChanges {
///     first_name: Some("Roberto".to_string()),
///     ..Default::default()
/// });
/// assert_eq!(account.first_name, "Roberto");
/// ```

use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

/// Marketplace account
#[derive(Debug, Clone, PartialEq, Serialize, sqlx::FromRow)]
pub struct Account {
    /// Unique account ID (UUID v4)
    pub id: Uuid,

    /// Login name, unique across all accounts
    pub username: String,

    /// Argon2id PHC hash, never serialized
    #[serde(skip_serializing)]
    pub password_hash: String,

    pub first_name: String,

    pub last_name: String,

    /// May create and manage products
    pub is_seller: bool,

    /// Inactive accounts can neither log in nor authenticate with a token
    pub is_active: bool,

    /// Administrator flag, only settable outside the HTTP API
    pub is_superuser: bool,

    /// When the account was registered
    pub date_joined: DateTime<Utc>,
}

/// Input for creating a new account
#[derive(Debug, Clone)]
pub struct NewAccount {
    pub username: String,

    /// Argon2id hash (NOT the plaintext password)
    pub password_hash: String,

    pub first_name: String,
    pub last_name: String,
    pub is_seller: bool,
    pub is_active: bool,
    pub is_superuser: bool,
}

/// Profile fields an owner may change
///
/// Only `Some` fields are applied. Activation is deliberately absent: it is
/// changed through [`Account::set_active`] only.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProfileChanges {
    pub username: Option<String>,

    /// New password hash
    pub password_hash: Option<String>,

    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub is_seller: Option<bool>,
}

impl Account {
    /// Builds a new account with a fresh ID and `date_joined = now`
    pub fn new(data: NewAccount) -> Self {
        Self {
            id: Uuid::new_v4(),
            username: data.username,
            password_hash: data.password_hash,
            first_name: data.first_name,
            last_name: data.last_name,
            is_seller: data.is_seller,
            is_active: data.is_active,
            is_superuser: data.is_superuser,
            date_joined: Utc::now(),
        }
    }

    /// Applies an owner's profile update
    pub fn apply_profile(&mut self, changes: ProfileChanges) {
        if let Some(username) = changes.username {
            self.username = username;
        }
        if let Some(password_hash) = changes.password_hash {
            self.password_hash = password_hash;
        }
        if let Some(first_name) = changes.first_name {
            self.first_name = first_name;
        }
        if let Some(last_name) = changes.last_name {
            self.last_name = last_name;
        }
        if let Some(is_seller) = changes.is_seller {
            self.is_seller = is_seller;
        }
    }

    /// Activates or deactivates the account (administrators only)
    pub fn set_active(&mut self, active: bool) {
        self.is_active = active;
    }
}
