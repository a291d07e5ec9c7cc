/// Permission predicates
///
/// Access control is expressed as plain predicates over the requester, the
/// HTTP method and (for object-level checks) the target resource. Handlers
/// evaluate them in a fixed order:
///
/// 1. view-level predicate, before any lookup
/// 2. object lookup (404 when absent)
/// 3. object-level predicate
/// 4. payload validation and mutation
///
/// A denied predicate becomes 401 for anonymous callers and 403 for
/// authenticated ones, see [`require`].
///
/// # Example
///
/// ```
/// use axum::http::Method;
/// use bazaar_shared::auth::context::Requester;
/// use bazaar_shared::auth::permissions::{is_seller_or_read_only, require, AuthzError};
///
/// let anonymous = Requester::Anonymous;
/// assert!(require(is_seller_or_read_only(&anonymous, &Method::GET), &anonymous).is_ok());
/// assert!(matches!(
///     require(is_seller_or_read_only(&anonymous, &Method::POST), &anonymous),
///     Err(AuthzError::NotAuthenticated)
/// ));
/// ```

use axum::http::Method;
use uuid::Uuid;

use super::context::Requester;
use crate::models::{Account, Product};

/// Error type for permission checks
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum AuthzError {
    #[error("Authentication credentials were not provided.")]
    NotAuthenticated,

    #[error("You do not have permission to perform this action.")]
    PermissionDenied,
}

/// Resource with an owning account
pub trait Owned {
    fn owner_id(&self) -> Uuid;
}

/// An account owns itself
impl Owned for Account {
    fn owner_id(&self) -> Uuid {
        self.id
    }
}

impl Owned for Product {
    fn owner_id(&self) -> Uuid {
        self.seller_id
    }
}

/// GET, HEAD and OPTIONS
pub fn is_safe_method(method: &Method) -> bool {
    matches!(*method, Method::GET | Method::HEAD | Method::OPTIONS)
}

/// Safe methods for everyone, anything else for sellers only
pub fn is_seller_or_read_only(requester: &Requester, method: &Method) -> bool {
    is_safe_method(method) || requester.is_seller()
}

/// Safe methods for everyone, anything else for the seller owning `resource`
pub fn is_seller_owner_or_read_only(
    requester: &Requester,
    method: &Method,
    resource: &impl Owned,
) -> bool {
    is_safe_method(method) || (requester.is_seller() && is_owner(requester, resource))
}

/// Requester is the owner of `resource`
pub fn is_owner(requester: &Requester, resource: &impl Owned) -> bool {
    requester.account_id() == Some(resource.owner_id())
}

/// Requester is an administrator
pub fn is_admin(requester: &Requester) -> bool {
    requester.is_superuser()
}

/// Turns a predicate outcome into an authorization result
///
/// # Errors
///
/// - `AuthzError::NotAuthenticated` if denied for an anonymous requester
/// - `AuthzError::PermissionDenied` if denied for an authenticated requester
pub fn require(granted: bool, requester: &Requester) -> Result<(), AuthzError> {
    if granted {
        Ok(())
    } else if requester.is_authenticated() {
        Err(AuthzError::PermissionDenied)
    } else {
        Err(AuthzError::NotAuthenticated)
    }
}
