/// Login token keys
///
/// Tokens are opaque bearer credentials handed out by `POST /api/login/` and
/// presented as `Authorization: Token <key>`.
///
/// # Key Format
///
/// `bzr_` followed by 40 base62 characters (44 chars total). Only the SHA-256
/// hex digest of a key is persisted; the plaintext is returned to the client
/// once and never stored.
///
/// # Example
///
/// ```
/// use bazaar_shared::auth::token::{generate_token_key, hash_token_key, validate_token_format};
///
/// let (key, hash) = generate_token_key();
/// assert!(key.starts_with("bzr_"));
/// assert!(validate_token_format(&key));
/// assert_eq!(hash_token_key(&key), hash);
/// ```

use rand::Rng;
use sha2::{Digest, Sha256};

/// Length of the random part of a key
const KEY_RANDOM_LENGTH: usize = 40;

/// Key prefix, makes leaked keys easy to grep for
const KEY_PREFIX: &str = "bzr_";

/// Number of leading characters kept for display and log correlation
const DISPLAY_PREFIX_LENGTH: usize = 8;

/// Total length of a token key
pub const TOKEN_KEY_LENGTH: usize = KEY_PREFIX.len() + KEY_RANDOM_LENGTH;

/// Authentication scheme keyword expected in the `Authorization` header
pub const AUTH_SCHEME: &str = "Token";

/// Problems with a `Token` authorization header
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum HeaderError {
    /// `Token` keyword with nothing after it
    #[error("Invalid token header. No credentials provided.")]
    MissingCredentials,

    /// More than one credential part
    #[error("Invalid token header. Token string should not contain spaces.")]
    ContainsSpaces,

    /// Credentials outside visible ASCII
    #[error("Invalid token header. Token string should not contain invalid characters.")]
    InvalidCharacters,
}

/// Generates a new token key
///
/// # Returns
///
/// Tuple of (plaintext_key, sha256_hex_hash)
pub fn generate_token_key() -> (String, String) {
    let key = format!("{}{}", KEY_PREFIX, random_base62(KEY_RANDOM_LENGTH));
    let hash = hash_token_key(&key);

    (key, hash)
}

fn random_base62(length: usize) -> String {
    const CHARSET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789";
    let mut rng = rand::thread_rng();

    (0..length)
        .map(|_| CHARSET[rng.gen_range(0..CHARSET.len())] as char)
        .collect()
}

/// Hex-encoded SHA-256 digest of a key (64 chars)
pub fn hash_token_key(key: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(key.as_bytes());
    format!("{:x}", hasher.finalize())
}

/// Checks prefix, length and alphabet of a presented key
///
/// Malformed keys are rejected before any storage lookup.
pub fn validate_token_format(key: &str) -> bool {
    key.len() == TOKEN_KEY_LENGTH
        && key.starts_with(KEY_PREFIX)
        && key[KEY_PREFIX.len()..].chars().all(|c| c.is_ascii_alphanumeric())
}

/// Leading characters of a key, safe to log
pub fn display_prefix(key: &str) -> String {
    key.chars().take(DISPLAY_PREFIX_LENGTH).collect()
}

/// Extracts the key from an `Authorization` header value
///
/// Returns `Ok(None)` when the header uses another scheme, so the request
/// proceeds anonymously. The keyword comparison is case-insensitive.
///
/// # Example
///
/// ```
/// use bazaar_shared::auth::token::{parse_authorization, HeaderError};
///
/// assert_eq!(parse_authorization("Token bzr_abc"), Ok(Some("bzr_abc")));
/// assert_eq!(parse_authorization("Bearer xyz"), Ok(None));
/// assert_eq!(parse_authorization("Token"), Err(HeaderError::MissingCredentials));
/// ```
pub fn parse_authorization(value: &str) -> Result<Option<&str>, HeaderError> {
    let mut parts = value.split_whitespace();

    match parts.next() {
        Some(scheme) if scheme.eq_ignore_ascii_case(AUTH_SCHEME) => {}
        _ => return Ok(None),
    }

    let key = parts.next().ok_or(HeaderError::MissingCredentials)?;
    if parts.next().is_some() {
        return Err(HeaderError::ContainsSpaces);
    }

    Ok(Some(key))
}

/// [`parse_authorization`] over raw header bytes
///
/// Header values may carry bytes outside ASCII. Under the `Token` scheme
/// that is an error; any other scheme stays anonymous.
pub fn parse_authorization_bytes(value: &[u8]) -> Result<Option<&str>, HeaderError> {
    match std::str::from_utf8(value) {
        Ok(text) if text.is_ascii() => parse_authorization(text),
        _ => {
            let scheme = value
                .split(u8::is_ascii_whitespace)
                .find(|part| !part.is_empty())
                .unwrap_or_default();

            if scheme.eq_ignore_ascii_case(AUTH_SCHEME.as_bytes()) {
                Err(HeaderError::InvalidCharacters)
            } else {
                Ok(None)
            }
        }
    }
}
