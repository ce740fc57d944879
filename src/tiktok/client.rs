//! Cliente HTTP para a TikTok Open API
//!
//! Uma única chamada por operação, sem retry. Timeouts são os defaults do
//! reqwest.

use reqwest::{Client, Response};
use serde_json::Value;

use super::models::{PublishPayload, TokenExchangeForm};
use crate::utils::logging::*;
use crate::utils::{mask_secret, AppError, AppResult};

pub const TOKEN_PATH: &str = "/v2/oauth/token/";
pub const PUBLISH_INIT_PATH: &str = "/v2/post/publish/content/init/";

pub const EXCHANGE_FAILED_MESSAGE: &str = "Failed to exchange code";
pub const PUBLISH_FAILED_MESSAGE: &str = "Failed to publish content";

#[derive(Debug, Clone)]
pub struct TikTokClient {
    http_client: Client,
    base_url: String,
}

impl TikTokClient {
    pub fn new(http_client: Client, base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self {
            http_client,
            base_url,
        }
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Trocar authorization code por access token
    ///
    /// # Retorno
    /// - `Ok(Value)`: TikTok respondeu 2xx; JSON sem validação de tipos
    /// - `Err(AppError::UpstreamRejected)`: status não-2xx, com o JSON do TikTok
    /// - `Err(AppError::HttpError | JsonError)`: falha de rede ou body não-JSON
    pub async fn exchange_code(
        &self,
        client_key: &str,
        client_secret: &str,
        code: &str,
        redirect_uri: &str,
    ) -> AppResult<Value> {
        let url = self.endpoint(TOKEN_PATH);
        let form = TokenExchangeForm::authorization_code(client_key, client_secret, code, redirect_uri);

        log_info(&format!("📤 [TikTok] POST {} - client_key: {}, code: {}",
            url, client_key, mask_secret(code)));

        // .form() define Content-Type: application/x-www-form-urlencoded
        let response = self.http_client
            .post(&url)
            .form(&form)
            .send()
            .await?;

        let data = read_json(TOKEN_PATH, response, EXCHANGE_FAILED_MESSAGE).await?;
        if let Some(access_token) = data.get("access_token").and_then(Value::as_str) {
            log_info(&format!("✅ [TikTok] Access token obtido: {}", mask_secret(access_token)));
        }

        Ok(data)
    }

    /// Registrar publicação de foto (publish-init). O JSON de sucesso é
    /// devolvido sem alterações.
    pub async fn init_content_publish(
        &self,
        access_token: &str,
        payload: &PublishPayload,
    ) -> AppResult<Value> {
        let url = self.endpoint(PUBLISH_INIT_PATH);

        log_info(&format!("📤 [TikTok] POST {} - post_mode: {:?}, images: {}",
            url, payload.post_mode, payload.source_info.photo_images.len()));

        // .json() define Content-Type: application/json
        let response = self.http_client
            .post(&url)
            .bearer_auth(access_token)
            .json(payload)
            .send()
            .await?;

        let data = read_json(PUBLISH_INIT_PATH, response, PUBLISH_FAILED_MESSAGE).await?;

        log_info(&format!("✅ [TikTok] Publish-init aceito: {}",
            data.get("data").and_then(|d| d.get("publish_id")).unwrap_or(&Value::Null)));

        Ok(data)
    }
}

/// Lê o body como JSON independente do status; status não-2xx vira
/// `UpstreamRejected` carregando o payload original.
async fn read_json(endpoint: &str, response: Response, failure_message: &str) -> AppResult<Value> {
    let status = response.status();
    let data: Value = response.json().await?;

    if !status.is_success() {
        log_tiktok_api_error(endpoint, status.as_u16(), &data);
        return Err(AppError::UpstreamRejected {
            message: failure_message.to_string(),
            status: status.as_u16(),
            details: data,
        });
    }

    Ok(data)
}
