//! # Bazaar Shared Library
//!
//! Domain types and building blocks used by the Bazaar API server.
//!
//! ## Module Organization
//!
//! - `models`: Accounts, products and login tokens
//! - `auth`: Password hashing, token keys, requester identity and permission predicates
//! - `serializers`: JSON representations, payload validation and per-method serializer dispatch
//! - `pagination`: Page-number pagination envelope
//! - `repository`: Storage traits with PostgreSQL and in-memory implementations
//! - `db`: Connection pool and migrations

pub mod auth;
pub mod db;
pub mod models;
pub mod pagination;
pub mod repository;
pub mod serializers;

/// Current version of the Bazaar shared library
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
