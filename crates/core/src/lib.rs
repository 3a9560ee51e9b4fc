//! Ark Core - Shared types library.
//!
//! This crate provides common types used across all Ark components:
//! - `storefront` - Public shop (browsing, cart, wishlist, shopper auth)
//! - `admin` - Product management console
//! - `cli` - Command-line tools for catalog management
//!
//! # Architecture
//!
//! The backend service owns every record. The types here mirror its JSON
//! payloads and carry display helpers only; nothing is validated or stored
//! client-side beyond what a page needs to render.
//!
//! # Modules
//!
//! - [`types`] - Newtype wrappers for IDs, prices, emails, products and profiles
//! - [`catalog`] - In-memory filtering over an already loaded product list
//! - [`http`] - REST transport to the backend (requires the `http` feature)

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod catalog;
#[cfg(feature = "http")]
pub mod http;
pub mod types;

pub use types::*;
