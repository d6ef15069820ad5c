use serde::Serialize;

pub mod auth;
pub mod intake;
pub mod quotations;

/// Plain acknowledgement body shared by the mutation endpoints.
#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub success: bool,
    pub message: String,
}

impl MessageResponse {
    pub fn ok(message: &str) -> Self {
        Self {
            success: true,
            message: message.to_string(),
        }
    }
}
