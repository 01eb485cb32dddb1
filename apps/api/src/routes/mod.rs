pub mod health;

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};

use crate::admin::handlers as admin;
use crate::state::AppState;
use crate::wizard::handlers as wizard;

pub fn build_router(state: AppState) -> Router {
    let upload_limit = state.upload_limit;

    Router::new()
        .route("/health", get(health::health_handler))
        // Application form
        .route("/api/v1/form", get(wizard::handle_get_form))
        .route("/api/v1/wizard", post(wizard::handle_start))
        .route("/api/v1/wizard/:id", get(wizard::handle_get_wizard))
        .route("/api/v1/wizard/:id/actions", post(wizard::handle_action))
        .route(
            "/api/v1/wizard/:id/files/:field",
            post(wizard::handle_upload_file).layer(DefaultBodyLimit::max(upload_limit)),
        )
        .route("/api/v1/wizard/:id/submit", post(wizard::handle_submit))
        .route(
            "/api/v1/wizard/:id/confirmation",
            get(wizard::handle_confirmation),
        )
        // Admin dashboard
        .route("/api/v1/admin/login", post(admin::handle_login))
        .route("/api/v1/admin/logout", post(admin::handle_logout))
        .route("/api/v1/admin/dashboard", get(admin::handle_dashboard))
        .route(
            "/api/v1/admin/submissions",
            get(admin::handle_list_submissions),
        )
        .route(
            "/api/v1/admin/submissions/:id",
            get(admin::handle_get_submission),
        )
        .with_state(state)
}
