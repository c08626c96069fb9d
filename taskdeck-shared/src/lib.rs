//! # TaskDeck Shared Library
//!
//! This crate contains the types and business logic shared between the
//! TaskDeck API server and its companion binaries (admin seeding).
//!
//! ## Module Organization
//!
//! - `models`: Database models and data structures
//! - `auth`: Authentication primitives (passwords, tokens, request identity)
//! - `db`: Connection pool and migration management

pub mod auth;
pub mod db;
pub mod models;

/// Current version of the TaskDeck shared library
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version_is_set() {
        assert!(!VERSION.is_empty());
    }
}
