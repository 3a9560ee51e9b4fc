//! Password recovery handlers.
//!
//! Two flows are offered:
//!
//! - Reset link: `/forgot-password` emails a link to `/reset-password/{token}`.
//! - One-time code: a three-step wizard. `/otp-forgot-password` sends the
//!   code, `/verify-otp` checks it and `/otp-reset-password` sets the new
//!   password. Each step stores what the next one needs in the session;
//!   arriving at a step without it sends the shopper back to the start.

use ark_core::Email;
use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::{Path, State},
    response::{IntoResponse, Redirect, Response},
};
use secrecy::SecretString;
use serde::Deserialize;
use tower_sessions::Session;
use tracing::instrument;

use super::auth::{INVALID_EMAIL, PASSWORD_MISMATCH};
use crate::filters;
use crate::middleware::{Nav, load_backend_cookie};
use crate::models::session_keys;
use crate::state::AppState;

const OTP_START: &str = "/otp-forgot-password";
const LOGIN_AFTER_RESET: &str = "/login?reset=1";

// =============================================================================
// Form Types
// =============================================================================

/// Email-only form (reset link, OTP request).
#[derive(Debug, Deserialize)]
pub struct EmailForm {
    pub email: String,
}

/// New password form.
#[derive(Deserialize)]
pub struct NewPasswordForm {
    pub password: String,
    pub confirm_password: String,
}

impl NewPasswordForm {
    /// The password, if it matches its confirmation.
    fn confirmed(self) -> Option<SecretString> {
        (self.password == self.confirm_password).then(|| SecretString::from(self.password))
    }
}

/// One-time code form.
#[derive(Debug, Deserialize)]
pub struct OtpForm {
    pub otp: String,
}

// =============================================================================
// Templates
// =============================================================================

/// Forgot password page template.
#[derive(Template, WebTemplate)]
#[template(path = "auth/forgot_password.html")]
pub struct ForgotPasswordTemplate {
    pub nav: Nav,
    pub email: String,
    pub error: Option<String>,
    pub success: Option<String>,
}

/// Reset password (token) page template.
#[derive(Template, WebTemplate)]
#[template(path = "auth/reset_password.html")]
pub struct ResetPasswordTemplate {
    pub nav: Nav,
    pub token: String,
    pub error: Option<String>,
}

/// OTP step 1: request a code.
#[derive(Template, WebTemplate)]
#[template(path = "auth/otp_request.html")]
pub struct OtpRequestTemplate {
    pub nav: Nav,
    pub email: String,
    pub error: Option<String>,
}

/// OTP step 2: enter the code.
#[derive(Template, WebTemplate)]
#[template(path = "auth/otp_verify.html")]
pub struct OtpVerifyTemplate {
    pub nav: Nav,
    pub email: String,
    pub error: Option<String>,
}

/// OTP step 3: choose a new password.
#[derive(Template, WebTemplate)]
#[template(path = "auth/otp_reset.html")]
pub struct OtpResetTemplate {
    pub nav: Nav,
    pub email: String,
    pub error: Option<String>,
}

// =============================================================================
// Session Helpers
// =============================================================================

async fn otp_email(session: &Session) -> Option<Email> {
    session
        .get::<Email>(session_keys::OTP_EMAIL)
        .await
        .ok()
        .flatten()
}

async fn otp_code(session: &Session) -> Option<String> {
    session
        .get::<String>(session_keys::OTP_CODE)
        .await
        .ok()
        .flatten()
}

async fn clear_otp_state(session: &Session) {
    if let Err(e) = session.remove::<Email>(session_keys::OTP_EMAIL).await {
        tracing::error!("Failed to clear OTP email: {e}");
    }
    if let Err(e) = session.remove::<String>(session_keys::OTP_CODE).await {
        tracing::error!("Failed to clear OTP code: {e}");
    }
}

// =============================================================================
// Reset Link Flow
// =============================================================================

/// Display the forgot password page.
pub async fn forgot_password_page(nav: Nav) -> impl IntoResponse {
    ForgotPasswordTemplate {
        nav,
        email: String::new(),
        error: None,
        success: None,
    }
}

/// Request a reset link.
#[instrument(skip(state, session, nav))]
pub async fn forgot_password(
    State(state): State<AppState>,
    session: Session,
    nav: Nav,
    Form(form): Form<EmailForm>,
) -> Response {
    let Ok(email) = Email::parse(&form.email) else {
        return ForgotPasswordTemplate {
            nav,
            email: form.email,
            error: Some(INVALID_EMAIL.to_string()),
            success: None,
        }
        .into_response();
    };

    let mut jar = load_backend_cookie(&session).await.unwrap_or_default();
    let (error, success) = match state.backend().forgot_password(&email, &mut jar).await {
        Ok(()) => (
            None,
            Some("If an account exists for that email, a reset link is on its way.".to_string()),
        ),
        Err(e) => {
            tracing::info!("Reset link request failed: {e}");
            (
                Some(e.user_message("Failed to send reset link").to_string()),
                None,
            )
        }
    };

    ForgotPasswordTemplate {
        nav,
        email: email.into_inner(),
        error,
        success,
    }
    .into_response()
}

/// Display the reset password page for an emailed token.
pub async fn reset_password_page(nav: Nav, Path(token): Path<String>) -> impl IntoResponse {
    ResetPasswordTemplate {
        nav,
        token,
        error: None,
    }
}

/// Set a new password with an emailed token.
#[instrument(skip_all)]
pub async fn reset_password(
    State(state): State<AppState>,
    session: Session,
    nav: Nav,
    Path(token): Path<String>,
    Form(form): Form<NewPasswordForm>,
) -> Response {
    let Some(password) = form.confirmed() else {
        return ResetPasswordTemplate {
            nav,
            token,
            error: Some(PASSWORD_MISMATCH.to_string()),
        }
        .into_response();
    };

    let mut jar = load_backend_cookie(&session).await.unwrap_or_default();
    match state
        .backend()
        .reset_password(&token, &password, &mut jar)
        .await
    {
        Ok(()) => {
            tracing::info!("Password reset by link");
            Redirect::to(LOGIN_AFTER_RESET).into_response()
        }
        Err(e) => {
            tracing::info!("Password reset rejected: {e}");
            ResetPasswordTemplate {
                nav,
                token,
                error: Some(e.user_message("Failed to reset password").to_string()),
            }
            .into_response()
        }
    }
}

// =============================================================================
// One-Time Code Flow
// =============================================================================

/// Step 1: display the code request form.
pub async fn otp_request_page(nav: Nav) -> impl IntoResponse {
    OtpRequestTemplate {
        nav,
        email: String::new(),
        error: None,
    }
}

/// Step 1: send a code and remember the email.
#[instrument(skip(state, session, nav))]
pub async fn otp_request(
    State(state): State<AppState>,
    session: Session,
    nav: Nav,
    Form(form): Form<EmailForm>,
) -> Response {
    let render_error = |nav: Nav, email: String, error: &str| {
        OtpRequestTemplate {
            nav,
            email,
            error: Some(error.to_string()),
        }
        .into_response()
    };

    let Ok(email) = Email::parse(&form.email) else {
        return render_error(nav, form.email, INVALID_EMAIL);
    };

    let mut jar = load_backend_cookie(&session).await.unwrap_or_default();
    if let Err(e) = state.backend().send_otp(&email, &mut jar).await {
        tracing::info!("OTP request failed: {e}");
        return render_error(nav, email.into_inner(), e.user_message("Failed to send OTP"));
    }

    clear_otp_state(&session).await;
    if let Err(e) = session.insert(session_keys::OTP_EMAIL, &email).await {
        tracing::error!("Failed to store OTP email: {e}");
        return render_error(nav, email.into_inner(), "Failed to send OTP");
    }

    Redirect::to("/verify-otp").into_response()
}

/// Step 2: display the code entry form.
pub async fn otp_verify_page(session: Session, nav: Nav) -> Response {
    let Some(email) = otp_email(&session).await else {
        return Redirect::to(OTP_START).into_response();
    };

    OtpVerifyTemplate {
        nav,
        email: email.into_inner(),
        error: None,
    }
    .into_response()
}

/// Step 2: check the code and remember it.
#[instrument(skip_all)]
pub async fn otp_verify(
    State(state): State<AppState>,
    session: Session,
    nav: Nav,
    Form(form): Form<OtpForm>,
) -> Response {
    let Some(email) = otp_email(&session).await else {
        return Redirect::to(OTP_START).into_response();
    };
    let render_error = |nav: Nav, email: &Email, error: &str| {
        OtpVerifyTemplate {
            nav,
            email: email.to_string(),
            error: Some(error.to_string()),
        }
        .into_response()
    };

    let otp = form.otp.trim();
    if otp.is_empty() {
        return render_error(nav, &email, "Please enter the code from your email");
    }

    let mut jar = load_backend_cookie(&session).await.unwrap_or_default();
    if let Err(e) = state.backend().verify_otp(&email, otp, &mut jar).await {
        tracing::info!("OTP rejected: {e}");
        return render_error(nav, &email, e.user_message("Invalid or expired OTP"));
    }

    if let Err(e) = session.insert(session_keys::OTP_CODE, otp).await {
        tracing::error!("Failed to store OTP code: {e}");
        return render_error(nav, &email, "Invalid or expired OTP");
    }

    Redirect::to("/otp-reset-password").into_response()
}

/// Step 3: display the new password form.
pub async fn otp_reset_page(session: Session, nav: Nav) -> Response {
    let (Some(email), Some(_)) = (otp_email(&session).await, otp_code(&session).await) else {
        return Redirect::to(OTP_START).into_response();
    };

    OtpResetTemplate {
        nav,
        email: email.into_inner(),
        error: None,
    }
    .into_response()
}

/// Step 3: set the new password and end the wizard.
#[instrument(skip_all)]
pub async fn otp_reset(
    State(state): State<AppState>,
    session: Session,
    nav: Nav,
    Form(form): Form<NewPasswordForm>,
) -> Response {
    let (Some(email), Some(otp)) = (otp_email(&session).await, otp_code(&session).await) else {
        return Redirect::to(OTP_START).into_response();
    };
    let render_error = |nav: Nav, email: &Email, error: &str| {
        OtpResetTemplate {
            nav,
            email: email.to_string(),
            error: Some(error.to_string()),
        }
        .into_response()
    };

    let Some(password) = form.confirmed() else {
        return render_error(nav, &email, PASSWORD_MISMATCH);
    };

    let mut jar = load_backend_cookie(&session).await.unwrap_or_default();
    if let Err(e) = state
        .backend()
        .reset_password_otp(&email, &otp, &password, &mut jar)
        .await
    {
        tracing::info!("OTP password reset rejected: {e}");
        return render_error(nav, &email, e.user_message("Failed to reset password"));
    }

    clear_otp_state(&session).await;
    tracing::info!("Password reset by one-time code");
    Redirect::to(LOGIN_AFTER_RESET).into_response()
}
