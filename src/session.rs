use axum::{
    extract::FromRequestParts,
    http::{HeaderMap, header::AUTHORIZATION, request::Parts},
};
use chrono::{DateTime, Duration, Utc};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::{app::AppState, error::AppError, models::admin::AdminUser};

/// A logged-in admin attached to a bearer token.
#[derive(Debug, Clone)]
pub struct AdminSession {
    pub admin_id: i64,
    pub username: String,
    pub full_name: String,
    pub email: String,
    pub logged_in_at: DateTime<Utc>,
}

/// In-memory session registry. Tokens are opaque, expire a fixed interval
/// after login and do not survive a restart.
#[derive(Clone)]
pub struct SessionStore {
    sessions: Arc<RwLock<HashMap<String, AdminSession>>>,
    timeout: Duration,
}

impl SessionStore {
    pub fn new(timeout_secs: i64) -> Self {
        Self {
            sessions: Arc::new(RwLock::new(HashMap::new())),
            timeout: Duration::seconds(timeout_secs),
        }
    }

    /// Start a session for the given account and return its token.
    pub async fn create(&self, user: &AdminUser) -> String {
        let token = Uuid::new_v4().to_string();
        let session = AdminSession {
            admin_id: user.id,
            username: user.username.clone(),
            full_name: user.full_name.clone(),
            email: user.email.clone(),
            logged_in_at: Utc::now(),
        };
        self.sessions.write().await.insert(token.clone(), session);
        token
    }

    /// Look up a token. Expired sessions are removed on sight.
    pub async fn validate(&self, token: &str) -> Option<AdminSession> {
        let mut sessions = self.sessions.write().await;
        match sessions.get(token) {
            Some(session) if Utc::now() - session.logged_in_at < self.timeout => {
                Some(session.clone())
            }
            Some(_) => {
                sessions.remove(token);
                None
            }
            None => None,
        }
    }

    /// Drop a session. Returns whether the token was active.
    pub async fn revoke(&self, token: &str) -> bool {
        self.sessions.write().await.remove(token).is_some()
    }
}

/// Extractor that gates admin routes on a valid bearer token.
#[derive(Debug, Clone)]
pub struct AdminContext {
    pub session: AdminSession,
    pub token: String,
}

impl FromRequestParts<AppState> for AdminContext {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let token = bearer_token(&parts.headers)
            .ok_or(AppError::Unauthorized)?
            .to_string();
        let session = state
            .sessions
            .validate(&token)
            .await
            .ok_or(AppError::Unauthorized)?;

        Ok(AdminContext { session, token })
    }
}

/// Pull the token out of an `Authorization: Bearer ...` header.
pub fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|token| !token.is_empty())
}
