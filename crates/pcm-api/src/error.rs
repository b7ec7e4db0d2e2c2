use axum::Json;
use axum::response::{IntoResponse, Response};
use pcm_service::ServiceError;

pub struct ApiError(ServiceError);

impl From<ServiceError> for ApiError {
    fn from(e: ServiceError) -> Self {
        ApiError(e)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.0.status_code();
        let messages = self.0.validation_messages();
        let body = if messages.is_empty() {
            serde_json::json!({ "message": self.0.to_string() })
        } else {
            serde_json::json!({ "message": self.0.to_string(), "messages": messages })
        };
        (status, Json(body)).into_response()
    }
}
