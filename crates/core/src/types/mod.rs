//! Core types for shopd.
//!
//! Type-safe wrappers for the domain concepts shared across the workspace.

pub mod email;
pub mod id;
pub mod provider;

pub use email::{Email, EmailError};
pub use id::{CartId, UserId};
pub use provider::AuthProvider;
