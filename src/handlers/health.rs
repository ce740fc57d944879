use axum::{
    extract::State,
    response::Json,
};
use serde_json::{json, Value};
use std::sync::Arc;

use crate::utils::logging::*;
use crate::AppState;

pub const HEALTH_ROUTE: &str = "/health";

/// Liveness: nunca falha por falta de credenciais, apenas informa se estão
/// presentes (sem expor valores).
pub async fn health_check(State(state): State<Arc<AppState>>) -> Json<Value> {
    log_health_check();

    let credentials = state.credentials.load();

    Json(json!({
        "status": "healthy",
        "service": env!("CARGO_PKG_NAME"),
        "version": env!("CARGO_PKG_VERSION"),
        "timestamp": chrono::Utc::now().to_rfc3339(),
        "credentials": {
            "client_credentials": credentials.client_credentials().is_ok(),
            "demo_access_token": credentials.demo_access_token().is_ok()
        }
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::TikTokCredentials;
    use crate::handlers::test_support::{credentials, router, send};
    use axum::http::StatusCode;

    #[tokio::test]
    async fn test_health_reports_configured_credentials() {
        let (response, body) = send(router("http://127.0.0.1:9", credentials()), "GET", HEALTH_ROUTE, None).await;

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body["status"], "healthy");
        assert_eq!(body["service"], "tiktok-publish-proxy");
        assert_eq!(body["credentials"], json!({ "client_credentials": true, "demo_access_token": true }));
    }

    #[tokio::test]
    async fn test_health_stays_up_without_credentials() {
        let (response, body) =
            send(router("http://127.0.0.1:9", TikTokCredentials::default()), "GET", HEALTH_ROUTE, None).await;

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body["credentials"], json!({ "client_credentials": false, "demo_access_token": false }));
    }
}
