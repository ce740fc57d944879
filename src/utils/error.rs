use axum::http::{header, HeaderValue, StatusCode};
use axum::response::{IntoResponse, Response};
use serde_json::{json, Value};
use thiserror::Error;

/// Mensagem genérica devolvida ao chamador para qualquer falha interna.
/// Detalhes ficam apenas nos logs.
pub const INTERNAL_ERROR_MESSAGE: &str = "Internal server error";

#[derive(Debug, Error)]
pub enum AppError {
    /// Verbo HTTP diferente de POST
    #[error("Method not allowed")]
    MethodNotAllowed,

    /// Campo obrigatório ausente no body do chamador
    #[error("{0}")]
    ValidationError(String),

    /// Credencial TikTok ausente no ambiente
    #[error("{0}")]
    ConfigError(String),

    /// TikTok respondeu com status não-2xx; `details` é o JSON original
    #[error("{message} (upstream status {status})")]
    UpstreamRejected {
        message: String,
        status: u16,
        details: Value,
    },

    #[error("HTTP error: {0}")]
    HttpError(#[from] reqwest::Error),

    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),
}

impl AppError {
    /// Falhas inesperadas: colapsadas em 500 genérico e registradas em log
    pub fn is_internal(&self) -> bool {
        matches!(self, AppError::HttpError(_) | AppError::JsonError(_))
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::MethodNotAllowed => StatusCode::METHOD_NOT_ALLOWED,
            AppError::ValidationError(_) => StatusCode::BAD_REQUEST,
            AppError::ConfigError(_) => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::UpstreamRejected { .. } => StatusCode::BAD_REQUEST,
            AppError::HttpError(_) | AppError::JsonError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();

        let body = match self {
            AppError::MethodNotAllowed => json!({ "error": "Method not allowed" }),
            AppError::ValidationError(msg) | AppError::ConfigError(msg) => json!({ "error": msg }),
            AppError::UpstreamRejected { message, details, .. } => json!({
                "error": message,
                "details": details
            }),
            AppError::HttpError(_) | AppError::JsonError(_) => {
                json!({ "error": INTERNAL_ERROR_MESSAGE })
            }
        };

        let mut response = (status, axum::Json(body)).into_response();

        if status == StatusCode::METHOD_NOT_ALLOWED {
            response
                .headers_mut()
                .insert(header::ALLOW, HeaderValue::from_static("POST"));
        }

        response
    }
}

pub type AppResult<T> = Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    async fn body_json(response: Response) -> Value {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn test_method_not_allowed_sets_allow_header() {
        let response = AppError::MethodNotAllowed.into_response();

        assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
        assert_eq!(response.headers().get(header::ALLOW).unwrap(), "POST");
        assert_eq!(body_json(response).await, json!({ "error": "Method not allowed" }));
    }

    #[tokio::test]
    async fn test_upstream_rejection_carries_details() {
        let error = AppError::UpstreamRejected {
            message: "Failed to exchange code".to_string(),
            status: 401,
            details: json!({ "error": "invalid_grant" }),
        };

        let response = error.into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(
            body_json(response).await,
            json!({ "error": "Failed to exchange code", "details": { "error": "invalid_grant" } })
        );
    }

    #[tokio::test]
    async fn test_internal_errors_do_not_leak_details() {
        let parse_error = serde_json::from_str::<Value>("{not json").unwrap_err();
        let error = AppError::from(parse_error);
        assert!(error.is_internal());

        let response = error.into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body_json(response).await, json!({ "error": "Internal server error" }));
    }

    #[test]
    fn test_config_error_is_not_internal() {
        let error = AppError::ConfigError("TikTok client credentials not configured".to_string());
        assert!(!error.is_internal());
        assert_eq!(error.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
