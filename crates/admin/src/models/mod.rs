//! Domain models for the admin console.

pub mod product_form;
pub mod session;

pub use product_form::{DraftError, FormAction, ProductForm};
pub use session::keys as session_keys;
