/// Authentication and authorization
///
/// # Modules
///
/// - [`password`]: Argon2id password hashing and verification
/// - [`token`]: Login token keys and `Authorization: Token <key>` parsing
/// - [`context`]: Resolving a request to a [`context::Requester`]
/// - [`permissions`]: Permission predicates and the 401/403 decision
///
/// # Example
///
/// ```
/// use bazaar_shared::auth::password::{hash_password, verify_password};
///
/// # fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let hash = hash_password("abcd")?;
/// assert!(verify_password("abcd", &hash)?);
/// # Ok(())
/// # }
/// ```

pub mod context;
pub mod password;
pub mod permissions;
pub mod token;
