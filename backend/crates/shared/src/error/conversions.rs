//! HTTP rendering of [`AppError`]
//!
//! The failure half of the `{success, message, data?}` response envelope.

use super::app_error::AppError;

/// Client-visible message for every 5xx
pub const INTERNAL_ERROR_MESSAGE: &str = "Internal server error";

impl AppError {
    /// `{"success": false, "message": ..., "action"?: ...}`
    pub fn envelope(&self) -> serde_json::Value {
        let message = if self.kind().is_server_error() {
            INTERNAL_ERROR_MESSAGE
        } else {
            self.message()
        };

        let mut body = serde_json::Map::new();
        body.insert("success".into(), false.into());
        body.insert("message".into(), message.into());
        if let Some(action) = self.action() {
            body.insert("action".into(), action.into());
        }
        serde_json::Value::Object(body)
    }
}

#[cfg(feature = "axum")]
impl axum::response::IntoResponse for AppError {
    fn into_response(self) -> axum::response::Response {
        use axum::http::StatusCode;

        let status =
            StatusCode::from_u16(self.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);

        (status, axum::Json(self.envelope())).into_response()
    }
}
