//! Session keys.
//!
//! Everything a browser session remembers lives under one of these keys.

/// Session keys for shopper state.
pub mod keys {
    /// The logged-in shopper (`ShopperProfile`).
    pub const CURRENT_SHOPPER: &str = "current_shopper";

    /// Cookies the backend issued for this browser (`BackendCookie`).
    pub const BACKEND_COOKIE: &str = "backend_cookie";

    /// The shopping cart (`Cart`).
    pub const CART: &str = "cart";

    /// The wishlist (`Wishlist`).
    pub const WISHLIST: &str = "wishlist";

    /// Email entered on the first step of the OTP reset flow.
    pub const OTP_EMAIL: &str = "otp_email";

    /// Code accepted on the second step of the OTP reset flow.
    pub const OTP_CODE: &str = "otp_code";
}
