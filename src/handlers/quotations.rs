use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
};
use serde::{Deserialize, Serialize};

use crate::{
    app::AppState,
    error::{AppError, Result},
    handlers::MessageResponse,
    intake::sanitize_text,
    models::quotation::{ListQuery, Pagination, Quotation, QuotationStats, QuotationStatus},
    session::AdminContext,
};

/// Raw list-view query parameters as they arrive on the wire
#[derive(Debug, Deserialize)]
pub struct ListParams {
    pub status: Option<String>,
    pub search: Option<String>,
    pub page: Option<i64>,
    pub limit: Option<i64>,
}

/// Response for the paginated list view
#[derive(Debug, Serialize)]
pub struct ListResponse {
    pub success: bool,
    pub data: Vec<Quotation>,
    pub pagination: Pagination,
}

/// Response carrying a single record
#[derive(Debug, Serialize)]
pub struct RecordResponse {
    pub success: bool,
    pub data: Quotation,
}

/// Response for the admin overview numbers
#[derive(Debug, Serialize)]
pub struct StatsResponse {
    pub success: bool,
    pub stats: QuotationStats,
}

/// Status update request body
#[derive(Debug, Deserialize)]
pub struct UpdateStatusRequest {
    pub status: String,
}

/// Note update request body
#[derive(Debug, Deserialize)]
pub struct UpdateNoteRequest {
    pub note: String,
}

/// List quotations with filters and pagination
pub async fn list_quotations(
    State(state): State<AppState>,
    _context: AdminContext,
    Query(params): Query<ListParams>,
) -> Result<impl IntoResponse> {
    let query = ListQuery::from_raw(
        params.status.as_deref(),
        params.search.as_deref(),
        params.page,
        params.limit,
    );
    let page = state.quotations.list(&query).await?;

    Ok((
        StatusCode::OK,
        Json(ListResponse {
            success: true,
            data: page.records,
            pagination: page.pagination,
        }),
    ))
}

/// Get a single quotation by ID
pub async fn get_quotation(
    State(state): State<AppState>,
    _context: AdminContext,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse> {
    let quotation = state.quotations.get(id).await?;

    Ok((
        StatusCode::OK,
        Json(RecordResponse {
            success: true,
            data: quotation,
        }),
    ))
}

/// Move a quotation to another workflow status
pub async fn update_status(
    State(state): State<AppState>,
    context: AdminContext,
    Path(id): Path<i64>,
    Json(request): Json<UpdateStatusRequest>,
) -> Result<impl IntoResponse> {
    let status = QuotationStatus::parse(&sanitize_text(&request.status))
        .ok_or_else(|| AppError::BadRequest("Invalid status".to_string()))?;

    state.quotations.update_status(id, status).await?;
    tracing::info!(
        "Admin '{}' set quotation {} to {}",
        context.session.username,
        id,
        status
    );

    Ok((
        StatusCode::OK,
        Json(MessageResponse::ok("Status updated successfully")),
    ))
}

/// Replace the staff note on a quotation
pub async fn update_note(
    State(state): State<AppState>,
    context: AdminContext,
    Path(id): Path<i64>,
    Json(request): Json<UpdateNoteRequest>,
) -> Result<impl IntoResponse> {
    let note = sanitize_text(&request.note);
    if note.is_empty() {
        return Err(AppError::BadRequest("Note cannot be empty".to_string()));
    }

    state.quotations.update_notes(id, &note).await?;
    tracing::info!(
        "Admin '{}' noted quotation {}",
        context.session.username,
        id
    );

    Ok((
        StatusCode::OK,
        Json(MessageResponse::ok("Note added successfully")),
    ))
}

/// Delete a quotation and its stored plan file
pub async fn delete_quotation(
    State(state): State<AppState>,
    context: AdminContext,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse> {
    let plan_file = state.quotations.delete(id).await?;

    // The row is gone; removing the file is best effort
    if let Some(name) = plan_file {
        state.plan_files.delete(&name).await;
    }
    tracing::info!(
        "Admin '{}' deleted quotation {}",
        context.session.username,
        id
    );

    Ok((
        StatusCode::OK,
        Json(MessageResponse::ok("Quotation deleted successfully")),
    ))
}

/// Aggregate numbers for the admin overview
pub async fn stats(
    State(state): State<AppState>,
    _context: AdminContext,
) -> Result<impl IntoResponse> {
    let stats = state.quotations.stats().await?;

    Ok((
        StatusCode::OK,
        Json(StatsResponse {
            success: true,
            stats,
        }),
    ))
}
