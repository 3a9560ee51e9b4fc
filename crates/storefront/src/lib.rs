//! Ark storefront library.
//!
//! The shopper-facing site as a library, so the binary and the integration
//! tests share one router.

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
