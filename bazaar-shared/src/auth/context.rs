/// Requester identity
///
/// Every request is attributed to a [`Requester`] before it reaches a
/// handler. Requests without a `Token` authorization header are anonymous;
/// a header that is present but unusable fails the request with 401 instead.

use uuid::Uuid;

use super::token::{
    hash_token_key, parse_authorization_bytes, validate_token_format, HeaderError,
};
use crate::models::Account;
use crate::repository::{AccountRepository, StoreError, TokenRepository};

/// Identity of the caller of a request
#[derive(Debug, Clone, PartialEq)]
pub enum Requester {
    Anonymous,
    Account(Account),
}

impl Requester {
    pub fn is_authenticated(&self) -> bool {
        matches!(self, Requester::Account(_))
    }

    pub fn account(&self) -> Option<&Account> {
        match self {
            Requester::Anonymous => None,
            Requester::Account(account) => Some(account),
        }
    }

    pub fn account_id(&self) -> Option<Uuid> {
        self.account().map(|a| a.id)
    }

    pub fn is_seller(&self) -> bool {
        self.account().map_or(false, |a| a.is_seller)
    }

    pub fn is_superuser(&self) -> bool {
        self.account().map_or(false, |a| a.is_superuser)
    }
}

/// Error type for token authentication
#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    #[error(transparent)]
    InvalidHeader(#[from] HeaderError),

    /// Unknown or malformed key
    #[error("Invalid token.")]
    InvalidToken,

    /// Token belongs to a deactivated or deleted account
    #[error("User inactive or deleted.")]
    Inactive,

    #[error("Storage error: {0}")]
    Store(#[from] StoreError),
}

/// Resolves the raw `Authorization` header bytes of a request to a requester
///
/// # Errors
///
/// - `AuthError::InvalidHeader` for `Token` with zero or several credentials,
///   or with credentials that are not visible ASCII
/// - `AuthError::InvalidToken` if the key is malformed or unknown
/// - `AuthError::Inactive` if the owning account is deactivated or gone
pub async fn authenticate(
    header: Option<&[u8]>,
    tokens: &dyn TokenRepository,
    accounts: &dyn AccountRepository,
) -> Result<Requester, AuthError> {
    let key = match header {
        Some(value) => match parse_authorization_bytes(value)? {
            Some(key) => key,
            None => return Ok(Requester::Anonymous),
        },
        None => return Ok(Requester::Anonymous),
    };

    if !validate_token_format(key) {
        return Err(AuthError::InvalidToken);
    }

    let token = tokens
        .authenticate(&hash_token_key(key))
        .await?
        .ok_or(AuthError::InvalidToken)?;

    match accounts.find_by_id(token.account_id).await? {
        Some(account) if account.is_active => Ok(Requester::Account(account)),
        _ => Err(AuthError::Inactive),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{AuthToken, NewAccount};
    use crate::repository::InMemoryStore;

    async fn store_with_account(active: bool) -> (InMemoryStore, Account, String) {
        let store = InMemoryStore::new();
        let account = AccountRepository::create(
            &store,
            Account::new(NewAccount {
                username: "ale".to_string(),
                password_hash: "hash".to_string(),
                first_name: "Alexandre".to_string(),
                last_name: "Alves".to_string(),
                is_seller: true,
                is_active: active,
                is_superuser: false,
            }),
        )
        .await
        .unwrap();

        let (token, key) = AuthToken::issue(account.id);
        TokenRepository::create(&store, token).await.unwrap();

        (store, account, key)
    }

    #[tokio::test]
    async fn test_missing_header_is_anonymous() {
        let (store, _, _) = store_with_account(true).await;

        let requester = authenticate(None, &store, &store).await.unwrap();
        assert_eq!(requester, Requester::Anonymous);

        let requester = authenticate(Some("Bearer abc".as_bytes()), &store, &store)
            .await
            .unwrap();
        assert!(!requester.is_authenticated());
    }

    #[tokio::test]
    async fn test_valid_token() {
        let (store, account, key) = store_with_account(true).await;
        let header = format!("Token {}", key);

        let requester = authenticate(Some(header.as_bytes()), &store, &store).await.unwrap();

        assert_eq!(requester.account_id(), Some(account.id));
        assert!(requester.is_seller());
        assert!(!requester.is_superuser());
    }

    #[tokio::test]
    async fn test_invalid_tokens() {
        let (store, _, _) = store_with_account(true).await;

        let err = authenticate(Some("Token garbage".as_bytes()), &store, &store)
            .await
            .unwrap_err();
        assert!(matches!(err, AuthError::InvalidToken));

        let (_, unknown) = AuthToken::issue(Uuid::new_v4());
        let header = format!("Token {}", unknown);
        let err = authenticate(Some(header.as_bytes()), &store, &store)
            .await
            .unwrap_err();
        assert!(matches!(err, AuthError::InvalidToken));

        let err = authenticate(Some("Token".as_bytes()), &store, &store)
            .await
            .unwrap_err();
        assert_eq!(
            err.to_string(),
            "Invalid token header. No credentials provided."
        );
    }

    #[tokio::test]
    async fn test_non_ascii_token_header() {
        let (store, _, _) = store_with_account(true).await;

        let err = authenticate(Some(&b"Token bzr_\xe9\xe9"[..]), &store, &store)
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            AuthError::InvalidHeader(HeaderError::InvalidCharacters)
        ));

        let requester = authenticate(Some(&b"Basic \xe9\xe9"[..]), &store, &store)
            .await
            .unwrap();
        assert_eq!(requester, Requester::Anonymous);
    }

    #[tokio::test]
    async fn test_inactive_account_is_rejected() {
        let (store, _, key) = store_with_account(false).await;
        let header = format!("Token {}", key);

        let err = authenticate(Some(header.as_bytes()), &store, &store)
            .await
            .unwrap_err();
        assert!(matches!(err, AuthError::Inactive));
    }
}
