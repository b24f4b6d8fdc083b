use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use tracing::error;

/// `{success: false, error, message?}` envelope.
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub success: bool,
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub error: String,
    pub message: Option<String>,
}

impl ApiError {
    pub fn method_not_allowed() -> Self {
        Self {
            status: StatusCode::METHOD_NOT_ALLOWED,
            error: "Method not allowed".to_string(),
            message: None,
        }
    }

    pub fn internal(error: &str, cause: impl std::fmt::Display) -> Self {
        Self {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            error: error.to_string(),
            message: Some(sanitize(&cause.to_string())),
        }
    }
}

// Keep upstream error text bounded and printable
fn sanitize(message: &str) -> String {
    message
        .chars()
        .take(1000)
        .filter(|c| !c.is_control())
        .collect()
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        if self.status.is_server_error() {
            error!(
                "Error response: {} - {} ({})",
                self.status,
                self.error,
                self.message.as_deref().unwrap_or("")
            );
        }

        let body = ErrorBody {
            success: false,
            error: self.error,
            message: self.message,
        };
        (self.status, Json(body)).into_response()
    }
}
