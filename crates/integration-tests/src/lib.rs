//! Integration tests for shopd.
//!
//! # Running Tests
//!
//! ```bash
//! # With PostgreSQL up, start the server
//! cargo run -p shopd-server
//!
//! # Run integration tests
//! cargo test -p shopd-integration-tests -- --ignored
//! ```
//!
//! The tests in `tests/` drive a running shopd instance over HTTP with a
//! cookie-store-enabled reqwest client, covering registration, login, the
//! cart side effect, and session re-hydration. OAuth callbacks need a real
//! provider handshake; the HTTP tests cover the flow up to the redirect, and
//! `oauth_accounts.rs` exercises account provisioning against the database
//! directly.
