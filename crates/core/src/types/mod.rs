//! Core types for Ark.
//!
//! This module provides type-safe wrappers for the records mirrored from the backend.

pub mod account;
pub mod credential;
pub mod email;
pub mod id;
pub mod price;
pub mod product;

pub use account::{AdminProfile, LoginResponse, ProfileResponse, ShopperProfile};
pub use credential::BackendCookie;
pub use email::{Email, EmailError};
pub use id::*;
pub use price::Price;
pub use product::{Gender, Product, ProductDraft, StockLevel};
