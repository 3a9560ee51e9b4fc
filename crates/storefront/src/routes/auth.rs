//! Shopper login, signup and logout handlers.
//!
//! Credentials go straight to the backend. On success the returned profile
//! and the backend's session cookie are cached in this browser's session.

use ark_core::Email;
use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::{Query, State},
    response::{IntoResponse, Redirect, Response},
};
use secrecy::SecretString;
use serde::Deserialize;
use tower_sessions::Session;
use tracing::instrument;

use crate::error::{clear_sentry_user, set_sentry_user};
use crate::filters;
use crate::middleware::{
    Nav, OptionalShopper, clear_current_shopper, load_backend_cookie, save_backend_cookie,
    set_current_shopper,
};
use crate::state::AppState;

/// Shown when a password and its confirmation differ.
pub const PASSWORD_MISMATCH: &str = "Passwords do not match";

/// Shown when an email address fails basic validation.
pub const INVALID_EMAIL: &str = "Please enter a valid email address";

// =============================================================================
// Form Types
// =============================================================================

/// Login form data.
#[derive(Deserialize)]
pub struct LoginForm {
    pub email: String,
    pub password: String,
}

/// Signup form data.
#[derive(Deserialize)]
pub struct SignupForm {
    pub name: String,
    pub email: String,
    pub password: String,
    pub confirm_password: String,
}

/// Query flags shown as a notice on the login page.
#[derive(Debug, Deserialize)]
pub struct LoginQuery {
    pub registered: Option<String>,
    pub reset: Option<String>,
}

// =============================================================================
// Templates
// =============================================================================

/// Login page template.
#[derive(Template, WebTemplate)]
#[template(path = "auth/login.html")]
pub struct LoginTemplate {
    pub nav: Nav,
    pub email: String,
    pub error: Option<String>,
    pub notice: Option<&'static str>,
}

/// Signup page template.
#[derive(Template, WebTemplate)]
#[template(path = "auth/signup.html")]
pub struct SignupTemplate {
    pub nav: Nav,
    pub name: String,
    pub email: String,
    pub error: Option<String>,
}

// =============================================================================
// Login Routes
// =============================================================================

/// Display the login page, or go home if already logged in.
#[instrument(skip(nav, shopper))]
pub async fn login_page(
    nav: Nav,
    OptionalShopper(shopper): OptionalShopper,
    Query(query): Query<LoginQuery>,
) -> Response {
    if shopper.is_some() {
        return Redirect::to("/").into_response();
    }

    let notice = if query.reset.is_some() {
        Some("Password updated. Please log in with your new password.")
    } else if query.registered.is_some() {
        Some("Account created. Please log in.")
    } else {
        None
    };

    LoginTemplate {
        nav,
        email: String::new(),
        error: None,
        notice,
    }
    .into_response()
}

/// Handle login form submission.
#[instrument(skip_all)]
pub async fn login(
    State(state): State<AppState>,
    session: Session,
    nav: Nav,
    Form(form): Form<LoginForm>,
) -> Response {
    let render_error = |nav: Nav, email: String, error: &str| {
        LoginTemplate {
            nav,
            email,
            error: Some(error.to_string()),
            notice: None,
        }
        .into_response()
    };

    let Ok(email) = Email::parse(&form.email) else {
        return render_error(nav, form.email, INVALID_EMAIL);
    };
    let password = SecretString::from(form.password);

    let mut jar = load_backend_cookie(&session).await.unwrap_or_default();
    let shopper = match state.backend().login(&email, &password, &mut jar).await {
        Ok(Some(shopper)) => shopper,
        Ok(None) => {
            tracing::info!("Login response carried no user id");
            return render_error(nav, email.into_inner(), "Login failed");
        }
        Err(e) => {
            tracing::info!("Shopper login rejected: {e}");
            return render_error(nav, email.into_inner(), e.user_message("Login failed"));
        }
    };

    if let Err(e) = session.cycle_id().await {
        tracing::error!("Failed to cycle session id: {e}");
    }
    if let Err(e) = save_backend_cookie(&session, &jar).await {
        tracing::error!("Failed to store backend cookie: {e}");
    }
    if let Err(e) = set_current_shopper(&session, &shopper).await {
        tracing::error!("Failed to set session: {e}");
        return render_error(nav, email.into_inner(), "Login failed");
    }

    set_sentry_user(&shopper.id, Some(shopper.email.as_str()));
    tracing::info!(user_id = %shopper.id, "Shopper logged in");

    Redirect::to("/").into_response()
}

// =============================================================================
// Signup Routes
// =============================================================================

/// Display the signup page, or go home if already logged in.
#[instrument(skip(nav, shopper))]
pub async fn signup_page(nav: Nav, OptionalShopper(shopper): OptionalShopper) -> Response {
    if shopper.is_some() {
        return Redirect::to("/").into_response();
    }

    SignupTemplate {
        nav,
        name: String::new(),
        email: String::new(),
        error: None,
    }
    .into_response()
}

/// Handle signup form submission.
#[instrument(skip_all)]
pub async fn signup(
    State(state): State<AppState>,
    session: Session,
    nav: Nav,
    Form(form): Form<SignupForm>,
) -> Response {
    let name = form.name.trim().to_string();
    let render_error = |nav: Nav, name: String, email: String, error: &str| {
        SignupTemplate {
            nav,
            name,
            email,
            error: Some(error.to_string()),
        }
        .into_response()
    };

    if form.password != form.confirm_password {
        return render_error(nav, name, form.email, PASSWORD_MISMATCH);
    }
    let Ok(email) = Email::parse(&form.email) else {
        return render_error(nav, name, form.email, INVALID_EMAIL);
    };
    let password = SecretString::from(form.password);

    let mut jar = load_backend_cookie(&session).await.unwrap_or_default();
    match state
        .backend()
        .register(&name, &email, &password, &mut jar)
        .await
    {
        Ok(()) => {
            tracing::info!("Shopper account created");
            Redirect::to("/login?registered=1").into_response()
        }
        Err(e) => {
            tracing::info!("Signup rejected: {e}");
            render_error(nav, name, email.into_inner(), e.user_message("Signup failed"))
        }
    }
}

// =============================================================================
// Logout
// =============================================================================

/// Log out locally and at the backend.
///
/// Local state is cleared even if the backend call fails.
#[instrument(skip_all)]
pub async fn logout(State(state): State<AppState>, session: Session) -> Response {
    let mut jar = load_backend_cookie(&session).await.unwrap_or_default();
    if !jar.is_empty() {
        if let Err(e) = state.backend().logout(&mut jar).await {
            tracing::warn!("Backend logout failed: {e}");
        }
    }

    if let Err(e) = clear_current_shopper(&session).await {
        tracing::error!("Failed to clear session: {e}");
    }
    clear_sentry_user();

    Redirect::to("/").into_response()
}
