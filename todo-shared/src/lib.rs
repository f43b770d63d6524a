//! # Todo Shared Library
//!
//! Data layer and authentication primitives used by the todo API server.
//!
//! ## Module Organization
//!
//! - `db`: Connection pooling and schema migrations
//! - `models`: Users (credential store) and tasks (task store)
//! - `auth`: Password hashing, JWT tokens and the request guard

pub mod auth;
pub mod db;
pub mod models;

/// Current version of the shared library
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
