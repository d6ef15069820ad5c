use axum::{
    Json,
    extract::State,
    http::{HeaderMap, StatusCode},
    response::IntoResponse,
};

use crate::{
    app::AppState,
    error::{AppError, Result},
    handlers::MessageResponse,
    intake::sanitize_text,
    models::admin::{AdminUserDto, CheckAuthResponse, LoginRequest, LoginResponse},
    session::{AdminContext, bearer_token},
};

/// Handler for admin login
pub async fn login(
    State(state): State<AppState>,
    Json(request): Json<LoginRequest>,
) -> Result<impl IntoResponse> {
    let username = sanitize_text(&request.username);
    if username.is_empty() || request.password.is_empty() {
        return Err(AppError::BadRequest(
            "Username and password required".to_string(),
        ));
    }

    // Authenticate against the stored hash
    let user = state.admins.authenticate(&username, &request.password).await?;

    // Issue a session token
    let token = state.sessions.create(&user).await;
    tracing::info!("Admin '{}' logged in", user.username);

    Ok((
        StatusCode::OK,
        Json(LoginResponse {
            success: true,
            message: "Login successful".to_string(),
            token,
            user: AdminUserDto::from(user),
        }),
    ))
}

/// Handler for admin logout
pub async fn logout(
    State(state): State<AppState>,
    context: AdminContext,
) -> Result<impl IntoResponse> {
    state.sessions.revoke(&context.token).await;
    tracing::info!("Admin '{}' logged out", context.session.username);

    Ok((
        StatusCode::OK,
        Json(MessageResponse::ok("Logged out successfully")),
    ))
}

/// Session probe used by the review console on load. Never errors; an
/// invalid or absent token just reports unauthenticated.
pub async fn check_auth(State(state): State<AppState>, headers: HeaderMap) -> impl IntoResponse {
    let session = match bearer_token(&headers) {
        Some(token) => state.sessions.validate(token).await,
        None => None,
    };

    match session {
        Some(session) => (
            StatusCode::OK,
            Json(CheckAuthResponse {
                success: true,
                authenticated: true,
                user: Some(AdminUserDto {
                    username: session.username,
                    full_name: session.full_name,
                    email: session.email,
                }),
            }),
        ),
        None => (
            StatusCode::UNAUTHORIZED,
            Json(CheckAuthResponse {
                success: false,
                authenticated: false,
                user: None,
            }),
        ),
    }
}
