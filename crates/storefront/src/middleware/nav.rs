//! Page header context shared by every storefront template.

use std::convert::Infallible;

use axum::{extract::FromRequestParts, http::request::Parts};
use tower_sessions::Session;

use super::auth::OptionalShopper;
use super::session::{load_cart, load_wishlist};
use crate::state::AppState;

/// What the header shows: who is logged in and the badge counts.
#[derive(Debug, Clone, Default)]
pub struct Nav {
    pub shopper_name: Option<String>,
    pub cart_count: u32,
    pub wishlist_count: usize,
    pub admin_url: String,
}

impl FromRequestParts<AppState> for Nav {
    type Rejection = Infallible;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let OptionalShopper(shopper) = OptionalShopper::from_request_parts(parts, state).await?;

        let (cart_count, wishlist_count) = match parts.extensions.get::<Session>() {
            Some(session) => {
                let cart = load_cart(session).await.unwrap_or_default();
                let wishlist = load_wishlist(session).await.unwrap_or_default();
                (cart.item_count(), wishlist.len())
            }
            None => (0, 0),
        };

        Ok(Self {
            shopper_name: shopper.map(|s| s.display_name().to_owned()),
            cart_count,
            wishlist_count,
            admin_url: state.config().admin_console_url.clone(),
        })
    }
}
