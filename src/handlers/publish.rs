use axum::{
    body::Bytes,
    extract::State,
    http::Method,
    response::{Json, Response},
};
use serde_json::Value;
use std::sync::Arc;

use super::{ensure_post, parse_json_body, with_error_boundary};
use crate::tiktok::models::{PublishRequest, MISSING_PUBLISH_FIELDS};
use crate::utils::AppResult;
use crate::AppState;

pub const PUBLISH_ROUTE: &str = "/api/tiktok/post";

/// POST /api/tiktok/post
///
/// Publica uma foto (publish-init) usando o token de demo compartilhado e
/// devolve a resposta do TikTok sem alterações.
pub async fn handle_publish(
    State(state): State<Arc<AppState>>,
    method: Method,
    body: Bytes,
) -> Response {
    with_error_boundary(PUBLISH_ROUTE, &method, publish(&state, &method, &body)).await
}

async fn publish(state: &AppState, method: &Method, body: &Bytes) -> AppResult<Json<Value>> {
    ensure_post(method)?;

    let request: PublishRequest = parse_json_body(body, MISSING_PUBLISH_FIELDS)?;
    let payload = request.into_payload()?;

    // TODO: trocar pelo token do usuário logado quando existir armazenamento de tokens por usuário
    let credentials = state.credentials.load();
    let access_token = credentials.demo_access_token()?;

    let data = state.tiktok.init_content_publish(access_token, &payload).await?;

    Ok(Json(data))
}
