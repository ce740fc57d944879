use axum::{
    body::Bytes,
    extract::State,
    http::Method,
    response::{Json, Response},
};
use std::sync::Arc;

use super::{ensure_post, parse_json_body, with_error_boundary};
use crate::tiktok::models::{ExchangeRequest, ExchangeResult, MISSING_EXCHANGE_FIELDS};
use crate::utils::logging::*;
use crate::utils::AppResult;
use crate::AppState;

pub const EXCHANGE_CODE_ROUTE: &str = "/api/tiktok/exchange-code";

/// POST /api/tiktok/exchange-code
///
/// Troca o authorization code do TikTok por um access token e devolve uma
/// projeção reduzida (`access_token`, `open_id`, `expires_in`, `user`).
/// O token não é persistido.
pub async fn handle_exchange_code(
    State(state): State<Arc<AppState>>,
    method: Method,
    body: Bytes,
) -> Response {
    with_error_boundary(EXCHANGE_CODE_ROUTE, &method, exchange_code(&state, &method, &body)).await
}

async fn exchange_code(state: &AppState, method: &Method, body: &Bytes) -> AppResult<Json<ExchangeResult>> {
    ensure_post(method)?;

    let request: ExchangeRequest = parse_json_body(body, MISSING_EXCHANGE_FIELDS)?;
    let (code, redirect_uri) = request.into_parts()?;

    let credentials = state.credentials.load();
    let (client_key, client_secret) = credentials.client_credentials()?;

    let data = state
        .tiktok
        .exchange_code(client_key, client_secret, &code, &redirect_uri)
        .await?;

    let result = ExchangeResult::from_upstream(&data);
    log_info(&format!("🔑 [TikTok] Code trocado para open_id {}",
        result.open_id.as_ref().unwrap_or(&serde_json::Value::Null)));

    Ok(Json(result))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::TikTokCredentials;
    use crate::handlers::test_support::{credentials, router, send, send_preflight, send_raw};
    use crate::tiktok::client::TOKEN_PATH;
    use axum::http::{header, StatusCode};
    use httpmock::{Method::POST, MockServer};
    use serde_json::json;

    fn valid_body() -> serde_json::Value {
        json!({ "code": "abc", "redirect_uri": "https://app.example.com/cb" })
    }

    #[tokio::test]
    async fn test_non_post_methods_are_rejected() {
        for method in ["GET", "PUT", "DELETE", "PATCH"] {
            let (response, body) =
                send(router("http://127.0.0.1:9", credentials()), method, EXCHANGE_CODE_ROUTE, None).await;

            assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED, "method {}", method);
            assert_eq!(response.headers().get(header::ALLOW).unwrap(), "POST");
            assert_eq!(body, json!({ "error": "Method not allowed" }));
        }
    }

    #[tokio::test]
    async fn test_cors_preflight_is_rejected_by_default() {
        let response = send_preflight(router("http://127.0.0.1:9", credentials()), EXCHANGE_CODE_ROUTE).await;

        assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
        assert_eq!(response.headers().get(header::ALLOW).unwrap(), "POST");
        assert!(response.headers().get(header::ACCESS_CONTROL_ALLOW_ORIGIN).is_none());
    }

    #[tokio::test]
    async fn test_missing_fields_return_bad_request() {
        let cases = [
            None,
            Some(json!({})),
            Some(json!({ "code": "abc" })),
            Some(json!({ "redirect_uri": "https://app.example.com/cb" })),
            Some(json!({ "code": "", "redirect_uri": "https://app.example.com/cb" })),
        ];

        for case in cases {
            let (response, body) =
                send(router("http://127.0.0.1:9", credentials()), "POST", EXCHANGE_CODE_ROUTE, case.clone()).await;

            assert_eq!(response.status(), StatusCode::BAD_REQUEST, "body {:?}", case);
            assert_eq!(body, json!({ "error": "Missing code or redirect_uri" }));
        }
    }

    #[tokio::test]
    async fn test_missing_client_credentials() {
        let without_secret = TikTokCredentials {
            client_secret: None,
            ..credentials()
        };

        let (response, body) =
            send(router("http://127.0.0.1:9", without_secret), "POST", EXCHANGE_CODE_ROUTE, Some(valid_body())).await;

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body, json!({ "error": "TikTok client credentials not configured" }));
    }

    #[tokio::test]
    async fn test_successful_exchange_is_projected() {
        let server = MockServer::start_async().await;
        let mock = server.mock_async(|when, then| {
            when.method(POST)
                .path(TOKEN_PATH)
                .x_www_form_urlencoded_tuple("code", "abc")
                .x_www_form_urlencoded_tuple("redirect_uri", "https://app.example.com/cb");
            then.status(200).json_body(json!({
                "access_token": "T",
                "open_id": "U1",
                "expires_in": 3600,
                "refresh_token": "R",
                "scope": "user.info.basic,video.publish"
            }));
        }).await;

        let (response, body) =
            send(router(&server.base_url(), credentials()), "POST", EXCHANGE_CODE_ROUTE, Some(valid_body())).await;

        mock.assert_async().await;
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            body,
            json!({
                "access_token": "T",
                "open_id": "U1",
                "expires_in": 3600,
                "user": { "display_name": "U1" }
            })
        );
    }

    #[tokio::test]
    async fn test_success_values_are_copied_without_type_checks() {
        let server = MockServer::start_async().await;
        server.mock_async(|when, then| {
            when.method(POST).path(TOKEN_PATH);
            then.status(200)
                .json_body(json!({ "access_token": "T", "open_id": "U1", "expires_in": "3600" }));
        }).await;

        let (response, body) =
            send(router(&server.base_url(), credentials()), "POST", EXCHANGE_CODE_ROUTE, Some(valid_body())).await;

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            body,
            json!({
                "access_token": "T",
                "open_id": "U1",
                "expires_in": "3600",
                "user": { "display_name": "U1" }
            })
        );
    }

    #[tokio::test]
    async fn test_upstream_rejection_returns_details() {
        let server = MockServer::start_async().await;
        server.mock_async(|when, then| {
            when.method(POST).path(TOKEN_PATH);
            then.status(401).json_body(json!({ "error": "invalid_grant" }));
        }).await;

        let (response, body) =
            send(router(&server.base_url(), credentials()), "POST", EXCHANGE_CODE_ROUTE, Some(valid_body())).await;

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(
            body,
            json!({ "error": "Failed to exchange code", "details": { "error": "invalid_grant" } })
        );
    }

    #[tokio::test]
    async fn test_unreachable_upstream_is_internal_error() {
        // Porta 9 (discard) sem listener: falha de conexão
        let (response, body) =
            send(router("http://127.0.0.1:9", credentials()), "POST", EXCHANGE_CODE_ROUTE, Some(valid_body())).await;

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body, json!({ "error": "Internal server error" }));
    }

    #[tokio::test]
    async fn test_malformed_body_is_internal_error() {
        let (response, body) =
            send_raw(router("http://127.0.0.1:9", credentials()), EXCHANGE_CODE_ROUTE, "{\"code\": ").await;

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body, json!({ "error": "Internal server error" }));
    }

    #[tokio::test]
    async fn test_repeated_requests_yield_identical_responses() {
        let server = MockServer::start_async().await;
        let mock = server.mock_async(|when, then| {
            when.method(POST).path(TOKEN_PATH);
            then.status(200)
                .json_body(json!({ "access_token": "T", "open_id": "U1", "expires_in": 3600 }));
        }).await;

        let app = router(&server.base_url(), credentials());
        let (first_response, first) = send(app.clone(), "POST", EXCHANGE_CODE_ROUTE, Some(valid_body())).await;
        let (second_response, second) = send(app, "POST", EXCHANGE_CODE_ROUTE, Some(valid_body())).await;

        mock.assert_hits_async(2).await;
        assert_eq!(first_response.status(), second_response.status());
        assert_eq!(first, second);
    }
}
