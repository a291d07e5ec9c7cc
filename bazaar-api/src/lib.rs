//! # Bazaar API Server Library
//!
//! HTTP layer of the Bazaar marketplace: accounts, token login and products.
//!
//! ## Modules
//!
//! - `app`: Application state and router builder
//! - `bootstrap`: Startup administrator account
//! - `config`: Configuration management
//! - `error`: Error handling and HTTP response mapping
//! - `extract`: JSON body and UUID path extractors
//! - `middleware`: Token authentication and security headers
//! - `routes`: API route handlers

pub mod app;
pub mod bootstrap;
pub mod config;
pub mod error;
pub mod extract;
pub mod middleware;
pub mod routes;
