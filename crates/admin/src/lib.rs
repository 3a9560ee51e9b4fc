//! Ark admin console library.
//!
//! Exposes the router so the binary and the integration tests share one
//! middleware stack.
//!
//! # Security
//!
//! Every product route requires an administrator session, revalidated
//! against the backend on each request.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod app;
pub mod backend;
pub mod config;
pub mod error;
pub mod filters;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod state;
