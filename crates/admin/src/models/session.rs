//! Session keys for admin authentication state.

/// Session keys for admin authentication data.
pub mod keys {
    /// The logged-in admin (`AdminProfile`), cached between revalidations.
    pub const CURRENT_ADMIN: &str = "current_admin";

    /// Cookies the backend issued to this admin's browser (`BackendCookie`).
    pub const BACKEND_COOKIE: &str = "backend_cookie";
}
