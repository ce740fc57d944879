// Handlers HTTP: troca de code, publicação e health check
pub mod exchange_code;
pub mod health;
pub mod publish;

pub use exchange_code::*;
pub use health::*;
pub use publish::*;

use std::future::Future;

use axum::{
    body::Bytes,
    http::Method,
    response::{IntoResponse, Response},
};
use serde::de::DeserializeOwned;
use serde_json::Value;
use tokio::time::Instant;
use tracing::{info_span, Instrument};
use uuid::Uuid;

use crate::utils::logging::*;
use crate::utils::{AppError, AppResult};

/// Os dois endpoints TikTok aceitam apenas POST
pub(crate) fn ensure_post(method: &Method) -> AppResult<()> {
    if method == Method::POST {
        Ok(())
    } else {
        Err(AppError::MethodNotAllowed)
    }
}

/// Desserializa o body JSON do chamador.
///
/// Body vazio, `null` ou não-objeto equivale a `{}` (campos ausentes → 400).
/// JSON malformado é falha de parsing → 500. Campo obrigatório com valor
/// não-string (ex: `"code": 42`) → 400 com a mensagem de campos obrigatórios
/// do handler, pois o schema da requisição tipa esses campos como string.
pub(crate) fn parse_json_body<T: DeserializeOwned>(body: &Bytes, missing_fields: &str) -> AppResult<T> {
    let value: Value = if body.iter().all(u8::is_ascii_whitespace) {
        Value::Null
    } else {
        serde_json::from_slice(body)?
    };

    let object = match value {
        Value::Object(map) => Value::Object(map),
        _ => Value::Object(Default::default()),
    };

    serde_json::from_value(object).map_err(|_| AppError::ValidationError(missing_fields.to_string()))
}

/// Fronteira de erro de cada handler: toda falha vira resposta JSON.
/// Falhas internas são logadas aqui; rejeições do TikTok já foram logadas
/// pelo cliente.
pub(crate) async fn with_error_boundary<T, F>(route: &'static str, method: &Method, handler: F) -> Response
where
    T: IntoResponse,
    F: Future<Output = AppResult<T>>,
{
    let request_id = Uuid::new_v4();
    let span = info_span!("tiktok_request", %request_id, route);

    async move {
        let start_time = Instant::now();
        log_request_received(route, method.as_str());

        let response = match handler.await {
            Ok(body) => body.into_response(),
            Err(err) => {
                if err.is_internal() {
                    log_handler_error(route, &err);
                }
                err.into_response()
            }
        };

        let processing_time = start_time.elapsed().as_millis() as u64;
        log_request_processed(route, response.status().as_u16(), processing_time);

        response
    }
    .instrument(span)
    .await
}
