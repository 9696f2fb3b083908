//! Domain types for the server.
//!
//! Catalog and order aggregates travel as their wire documents
//! ([`greenbasket_core::api`]); the user aggregate carries server-only
//! fields (provider ids, hash presence) and so gets its own domain type.

pub mod user;

pub use user::{NewUser, User};
