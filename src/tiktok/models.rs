//! Tipos de request/response dos dois handlers e payloads da Open API

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::utils::{AppError, AppResult};

pub const MISSING_EXCHANGE_FIELDS: &str = "Missing code or redirect_uri";
pub const MISSING_PUBLISH_FIELDS: &str = "Missing productName, mediaUrl, or caption";

// ============================================================================
// Troca de authorization code
// ============================================================================

/// Body enviado pelo frontend para `/api/tiktok/exchange-code`
#[derive(Debug, Default, Deserialize)]
pub struct ExchangeRequest {
    #[serde(default)]
    pub code: Option<String>,
    #[serde(default)]
    pub redirect_uri: Option<String>,
}

impl ExchangeRequest {
    /// Retorna `(code, redirect_uri)`; vazio conta como ausente
    pub fn into_parts(self) -> AppResult<(String, String)> {
        match (required(self.code), required(self.redirect_uri)) {
            (Some(code), Some(redirect_uri)) => Ok((code, redirect_uri)),
            _ => Err(AppError::ValidationError(MISSING_EXCHANGE_FIELDS.to_string())),
        }
    }
}

/// Form `application/x-www-form-urlencoded` do endpoint `/v2/oauth/token/`
#[derive(Debug, Serialize)]
pub struct TokenExchangeForm<'a> {
    pub client_key: &'a str,
    pub client_secret: &'a str,
    pub code: &'a str,
    pub grant_type: &'a str,
    pub redirect_uri: &'a str,
}

impl<'a> TokenExchangeForm<'a> {
    pub fn authorization_code(
        client_key: &'a str,
        client_secret: &'a str,
        code: &'a str,
        redirect_uri: &'a str,
    ) -> Self {
        Self {
            client_key,
            client_secret,
            code,
            grant_type: "authorization_code",
            redirect_uri,
        }
    }
}

/// Projeção da resposta de sucesso do `/v2/oauth/token/`.
///
/// Os valores são copiados do JSON do TikTok como vieram (sem checagem de
/// tipo); campos ausentes são omitidos. Demais campos (refresh_token,
/// scope, ...) são descartados.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExchangeResult {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub access_token: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub open_id: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expires_in: Option<Value>,
    pub user: ExchangeUser,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExchangeUser {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub display_name: Option<Value>,
}

impl ExchangeResult {
    pub fn from_upstream(data: &Value) -> Self {
        let field = |name: &str| data.get(name).cloned();

        // Sem lookup de perfil (user.info.basic): display_name = open_id
        let open_id = field("open_id");

        Self {
            access_token: field("access_token"),
            expires_in: field("expires_in"),
            user: ExchangeUser {
                display_name: open_id.clone(),
            },
            open_id,
        }
    }
}

// ============================================================================
// Publicação de conteúdo (publish-init)
// ============================================================================

/// Body enviado pelo frontend para `/api/tiktok/post`
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PublishRequest {
    #[serde(default)]
    pub product_name: Option<String>,
    #[serde(default)]
    pub media_url: Option<String>,
    #[serde(default)]
    pub caption: Option<String>,
    /// Qualquer tipo JSON é aceito; só a string "DIRECT_POST" tem efeito
    #[serde(default)]
    pub post_mode: Option<Value>,
}

impl PublishRequest {
    pub fn into_payload(self) -> AppResult<PublishPayload> {
        let post_mode = PostMode::from_caller(self.post_mode.as_ref());

        match (
            required(self.product_name),
            required(self.media_url),
            required(self.caption),
        ) {
            (Some(title), Some(media_url), Some(description)) => Ok(PublishPayload {
                post_info: PostInfo {
                    title,
                    description,
                    privacy_level: PrivacyLevel::PublicToEveryone,
                    auto_add_music: true,
                },
                source_info: SourceInfo {
                    source: Source::PullFromUrl,
                    photo_images: vec![media_url],
                },
                post_mode,
                media_type: MediaType::Photo,
            }),
            _ => Err(AppError::ValidationError(MISSING_PUBLISH_FIELDS.to_string())),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PostMode {
    DirectPost,
    InboxDraft,
}

impl PostMode {
    /// Só o literal exato "DIRECT_POST" publica direto; o resto vira rascunho
    pub fn from_caller(value: Option<&Value>) -> Self {
        match value {
            Some(Value::String(mode)) if mode == "DIRECT_POST" => PostMode::DirectPost,
            _ => PostMode::InboxDraft,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PrivacyLevel {
    PublicToEveryone,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Source {
    PullFromUrl,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MediaType {
    Photo,
}

#[derive(Debug, Clone, Serialize)]
pub struct PostInfo {
    pub title: String,
    pub description: String,
    pub privacy_level: PrivacyLevel,
    pub auto_add_music: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct SourceInfo {
    pub source: Source,
    pub photo_images: Vec<String>,
}

/// JSON enviado para `/v2/post/publish/content/init/`
#[derive(Debug, Clone, Serialize)]
pub struct PublishPayload {
    pub post_info: PostInfo,
    pub source_info: SourceInfo,
    pub post_mode: PostMode,
    pub media_type: MediaType,
}

fn required(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty())
}
