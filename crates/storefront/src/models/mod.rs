//! Domain models for storefront session state.

pub mod cart;
pub mod session;
pub mod wishlist;

pub use cart::{Cart, CartError, CartLine};
pub use session::keys as session_keys;
pub use wishlist::Wishlist;
