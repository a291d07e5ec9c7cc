/// Domain models for Bazaar
///
/// Plain data types shared by the storage backends and the HTTP layer.
/// Persistence lives in [`crate::repository`]; wire representations live in
/// [`crate::serializers`].
///
/// # Models
///
/// - `account`: Marketplace accounts (buyers, sellers, administrators)
/// - `product`: Products listed by sellers
/// - `auth_token`: Login tokens, stored as SHA-256 hashes

pub mod account;
pub mod auth_token;
pub mod product;

pub use account::{Account, NewAccount, ProfileChanges};
pub use auth_token::AuthToken;
pub use product::{NewProduct, Product, ProductChanges};
