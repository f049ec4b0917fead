//! Shopd Core - Shared domain types.
//!
//! This crate provides the common types used by the shopd server and its
//! tests. It contains only types and traits - no I/O, no database access,
//! no HTTP clients.
//!
//! # Modules
//!
//! - [`types`] - Newtype wrappers for type-safe IDs, emails, and auth providers

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
