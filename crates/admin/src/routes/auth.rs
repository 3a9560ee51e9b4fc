//! Authentication route handlers for admin.
//!
//! Credentials are checked by the backend. On success the admin profile and
//! the backend's session cookie are cached in this browser's session.

use ark_core::Email;
use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::State,
    response::{IntoResponse, Redirect, Response},
};
use secrecy::SecretString;
use serde::Deserialize;
use tower_sessions::Session;
use tracing::instrument;

use crate::error::{clear_sentry_user, set_sentry_user};
use crate::filters;
use crate::middleware::{
    LOGIN_PATH, OptionalAdmin, clear_current_admin, load_backend_cookie, save_backend_cookie,
    set_current_admin,
};
use crate::state::AppState;

const LOGIN_FAILED: &str = "Login failed. Please try again.";
const DASHBOARD_PATH: &str = "/admin/dashboard";

/// Login form data.
#[derive(Deserialize)]
pub struct LoginForm {
    pub email: String,
    pub password: String,
}

/// Login page template.
#[derive(Template, WebTemplate)]
#[template(path = "auth/login.html")]
pub struct LoginTemplate {
    pub email: String,
    pub error: Option<String>,
}

/// Render the login page, or go to the dashboard if already signed in.
#[instrument(skip_all)]
pub async fn login_page(OptionalAdmin(admin): OptionalAdmin) -> Response {
    if admin.is_some() {
        return Redirect::to(DASHBOARD_PATH).into_response();
    }

    LoginTemplate {
        email: String::new(),
        error: None,
    }
    .into_response()
}

/// Handle login form submission.
#[instrument(skip_all)]
pub async fn login(
    State(state): State<AppState>,
    session: Session,
    Form(form): Form<LoginForm>,
) -> Response {
    let render_error = |email: String, error: &str| {
        LoginTemplate {
            email,
            error: Some(error.to_string()),
        }
        .into_response()
    };

    let Ok(email) = Email::parse(&form.email) else {
        return render_error(form.email, "Please enter a valid email address");
    };
    let password = SecretString::from(form.password);

    let mut jar = load_backend_cookie(&session).await.unwrap_or_default();
    let admin = match state.backend().login(&email, &password, &mut jar).await {
        Ok(Some(admin)) => admin,
        Ok(None) => {
            tracing::info!("Admin login response carried no id");
            return render_error(email.into_inner(), LOGIN_FAILED);
        }
        Err(e) => {
            tracing::info!("Admin login rejected: {e}");
            return render_error(email.into_inner(), e.user_message(LOGIN_FAILED));
        }
    };

    if let Err(e) = session.cycle_id().await {
        tracing::error!("Failed to cycle session id: {e}");
    }
    if let Err(e) = save_backend_cookie(&session, &jar).await {
        tracing::error!("Failed to store backend cookie: {e}");
        return render_error(email.into_inner(), LOGIN_FAILED);
    }
    if let Err(e) = set_current_admin(&session, &admin).await {
        tracing::error!("Failed to set session: {e}");
        return render_error(email.into_inner(), LOGIN_FAILED);
    }

    set_sentry_user(&admin.id, Some(admin.email.as_str()));
    tracing::info!(admin_id = %admin.id, "Admin logged in");

    Redirect::to(DASHBOARD_PATH).into_response()
}

/// Logout and clear session.
///
/// The local session is cleared even when the backend call fails.
#[instrument(skip_all)]
pub async fn logout(State(state): State<AppState>, session: Session) -> Redirect {
    let mut jar = load_backend_cookie(&session).await.unwrap_or_default();
    if let Err(e) = state.backend().logout(&mut jar).await {
        tracing::warn!("Backend logout failed: {e}");
    }

    if let Err(e) = clear_current_admin(&session).await {
        tracing::error!("Failed to clear session: {e}");
    }
    clear_sentry_user();

    Redirect::to(LOGIN_PATH)
}
