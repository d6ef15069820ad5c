use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Database admin account. The password is only ever stored as an argon2
/// hash; verification happens against the hash.
#[derive(Debug, Clone, FromRow)]
pub struct AdminUser {
    pub id: i64,
    pub username: String,
    pub password_hash: String,
    pub full_name: String,
    pub email: String,
    pub last_login: Option<DateTime<Utc>>,
}

/// Admin identity as exposed to the review console.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AdminUserDto {
    pub username: String,
    pub full_name: String,
    pub email: String,
}

impl From<&AdminUser> for AdminUserDto {
    fn from(user: &AdminUser) -> Self {
        Self {
            username: user.username.clone(),
            full_name: user.full_name.clone(),
            email: user.email.clone(),
        }
    }
}

impl From<AdminUser> for AdminUserDto {
    fn from(user: AdminUser) -> Self {
        Self::from(&user)
    }
}

/// Login request body.
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

/// Login response: the issued session token plus the admin identity.
#[derive(Debug, Serialize, Deserialize)]
pub struct LoginResponse {
    pub success: bool,
    pub message: String,
    pub token: String,
    pub user: AdminUserDto,
}

/// Response for the session probe used by the review console on load.
#[derive(Debug, Serialize, Deserialize)]
pub struct CheckAuthResponse {
    pub success: bool,
    pub authenticated: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user: Option<AdminUserDto>,
}
