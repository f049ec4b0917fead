//! Shopd server library.
//!
//! This crate provides the shopd service as a library, allowing it to be
//! tested and reused.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod config;
pub mod db;
pub mod error;
pub mod middleware;
pub mod models;
pub mod oauth;
pub mod routes;
pub mod services;
pub mod state;
