//! Dashboard route handler.

use askama::Template;
use askama_web::WebTemplate;
use axum::response::IntoResponse;
use tracing::instrument;

use super::AdminUserView;
use crate::filters;
use crate::middleware::RequireAdmin;

/// Dashboard template.
#[derive(Template, WebTemplate)]
#[template(path = "dashboard.html")]
pub struct DashboardTemplate {
    pub admin_user: AdminUserView,
    pub current_path: &'static str,
}

/// Dashboard page handler.
#[instrument(skip_all, fields(admin_id = %admin.id))]
pub async fn dashboard(RequireAdmin(admin): RequireAdmin) -> impl IntoResponse {
    DashboardTemplate {
        admin_user: AdminUserView::from(&admin),
        current_path: "/admin/dashboard",
    }
}
