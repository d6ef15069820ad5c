use axum::{
    Json, Router,
    extract::DefaultBodyLimit,
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post, put},
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::{
    config::Config,
    db::{DbPool, admin_store::AdminStore, quotation_store::QuotationStore},
    error::AppError,
    handlers,
    intake::MAX_PLAN_FILE_BYTES,
    session::SessionStore,
    uploads::PlanFileStore,
};

/// Body cap for the submission form: the plan file limit plus room for the
/// text fields and multipart framing. Oversized plan files still reach the
/// gateway so the client gets the specific size message.
const MAX_REQUEST_BODY_BYTES: usize = MAX_PLAN_FILE_BYTES + 1024 * 1024;

/// Shared state handed to every handler.
#[derive(Clone)]
pub struct AppState {
    pub quotations: QuotationStore,
    pub admins: AdminStore,
    pub sessions: SessionStore,
    pub plan_files: PlanFileStore,
}

impl AppState {
    pub fn new(pool: DbPool, config: &Config) -> std::io::Result<Self> {
        Ok(Self {
            quotations: QuotationStore::new(pool.clone()),
            admins: AdminStore::new(pool),
            sessions: SessionStore::new(config.session_timeout_secs),
            plan_files: PlanFileStore::new(&config.upload_dir)?,
        })
    }
}

/// Assemble the full route table with logging, CORS and body limits.
pub fn build_router(state: AppState) -> Router {
    let public = Router::new().route("/api/quotations", post(handlers::intake::submit_quotation));

    let admin = Router::new()
        .route("/api/admin/login", post(handlers::auth::login))
        .route("/api/admin/logout", post(handlers::auth::logout))
        .route("/api/admin/check-auth", get(handlers::auth::check_auth))
        .route(
            "/api/admin/quotations",
            get(handlers::quotations::list_quotations),
        )
        .route(
            "/api/admin/quotations/{id}",
            get(handlers::quotations::get_quotation)
                .delete(handlers::quotations::delete_quotation),
        )
        .route(
            "/api/admin/quotations/{id}/status",
            put(handlers::quotations::update_status),
        )
        .route(
            "/api/admin/quotations/{id}/note",
            put(handlers::quotations::update_note),
        )
        .route("/api/admin/stats", get(handlers::quotations::stats));

    Router::new()
        .merge(public)
        .merge(admin)
        .route("/health", get(health))
        .fallback(not_found)
        .method_not_allowed_fallback(method_not_allowed)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .layer(DefaultBodyLimit::max(MAX_REQUEST_BODY_BYTES))
        .with_state(state)
}

async fn health() -> impl IntoResponse {
    Json(serde_json::json!({ "status": "ok" }))
}

async fn not_found() -> impl IntoResponse {
    (
        StatusCode::NOT_FOUND,
        Json(serde_json::json!({ "success": false, "message": "Not found" })),
    )
}

async fn method_not_allowed() -> AppError {
    AppError::MethodNotAllowed
}
