//! Business logic services for shopd.

pub mod auth;
