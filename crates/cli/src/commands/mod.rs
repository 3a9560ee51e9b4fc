//! Command implementations.
//!
//! Every command talks to the backend through [`AdminBackend`] with one
//! administrator login per run.

pub mod products;
pub mod seed;

use std::time::Duration;

use ark_admin::backend::AdminBackend;
use ark_core::http::BackendError;
use ark_core::{BackendCookie, Email};
use secrecy::SecretString;
use thiserror::Error;

/// Errors that can stop a command.
#[derive(Debug, Error)]
pub enum CliError {
    /// Required environment variable is missing.
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(&'static str),

    /// Invalid email.
    #[error("Invalid email: {0}")]
    InvalidEmail(String),

    /// Backend request failed.
    #[error("Backend error: {0}")]
    Backend(#[from] BackendError),

    /// The backend accepted the login but sent no admin profile.
    #[error("Backend login returned no admin profile")]
    NoProfile,

    /// Seed file could not be read.
    #[error("Failed to read {path}: {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },

    /// Seed file is not a YAML list of products.
    #[error("Invalid seed file: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// Seed file parsed but some entries are unusable.
    #[error("{0} validation errors found")]
    Invalid(usize),
}

/// A logged-in backend client.
pub struct AdminSession {
    pub backend: AdminBackend,
    pub jar: BackendCookie,
}

fn required_env(key: &'static str) -> Result<String, CliError> {
    std::env::var(key)
        .ok()
        .filter(|v| !v.trim().is_empty())
        .ok_or(CliError::MissingEnvVar(key))
}

/// Log in with `ARK_ADMIN_EMAIL` and `ARK_ADMIN_PASSWORD` against
/// `BACKEND_API_URL`.
///
/// # Errors
///
/// Returns an error if a variable is missing or the backend refuses the login.
pub async fn connect() -> Result<AdminSession, CliError> {
    dotenvy::dotenv().ok();

    let backend_url = required_env("BACKEND_API_URL")?;
    let email = required_env("ARK_ADMIN_EMAIL")?;
    let password = SecretString::from(required_env("ARK_ADMIN_PASSWORD")?);

    let email = Email::parse(&email).map_err(|_| CliError::InvalidEmail(email))?;
    let backend = AdminBackend::new(backend_url.trim_end_matches('/'), Duration::from_secs(30))?;

    login(backend, &email, &password).await
}

/// Log in once and keep the backend cookie for later calls.
///
/// # Errors
///
/// Returns an error if the backend refuses the login or sends no profile.
pub async fn login(
    backend: AdminBackend,
    email: &Email,
    password: &SecretString,
) -> Result<AdminSession, CliError> {
    let mut jar = BackendCookie::default();
    let admin = backend
        .login(email, password, &mut jar)
        .await?
        .ok_or(CliError::NoProfile)?;

    tracing::info!(admin = %admin.name, "Logged in to backend");
    Ok(AdminSession { backend, jar })
}
