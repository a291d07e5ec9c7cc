/// Login token model
///
/// A token is minted for an account on every successful login and stays valid
/// until the account is deactivated or deleted.
///
/// # Schema
///
/// ```sql
/// CREATE TABLE auth_tokens (
///     id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
///     account_id UUID NOT NULL REFERENCES accounts(id) ON DELETE CASCADE,
///     key_prefix VARCHAR(16) NOT NULL,
///     key_hash VARCHAR(64) NOT NULL UNIQUE,
///     created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
///     last_used_at TIMESTAMPTZ
/// );
/// ```
///
/// # Example
///
/// ```
/// use bazaar_shared::auth::token::hash_token_key;
/// use bazaar_shared::models::auth_token::AuthToken;
/// use uuid::Uuid;
///
/// let (token, key) = AuthToken::issue(Uuid::new_v4());
/// assert_eq!(token.key_hash, hash_token_key(&key));
/// assert!(token.last_used_at.is_none());
/// ```

use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

use crate::auth::token::{display_prefix, generate_token_key};

/// Persisted login token (hash only)
#[derive(Debug, Clone, PartialEq, Serialize, sqlx::FromRow)]
pub struct AuthToken {
    pub id: Uuid,

    /// Account the token authenticates as
    pub account_id: Uuid,

    /// Leading characters of the key, for log correlation
    pub key_prefix: String,

    /// SHA-256 hex digest of the key
    #[serde(skip_serializing)]
    pub key_hash: String,

    pub created_at: DateTime<Utc>,

    /// Updated on every authenticated request
    pub last_used_at: Option<DateTime<Utc>>,
}

impl AuthToken {
    /// Mints a new token for `account_id`
    ///
    /// # Returns
    ///
    /// Tuple of (token_record, plaintext_key). The plaintext key is handed to
    /// the client once and cannot be recovered from the record.
    pub fn issue(account_id: Uuid) -> (Self, String) {
        let (key, key_hash) = generate_token_key();

        let token = Self {
            id: Uuid::new_v4(),
            account_id,
            key_prefix: display_prefix(&key),
            key_hash,
            created_at: Utc::now(),
            last_used_at: None,
        };

        (token, key)
    }
}
