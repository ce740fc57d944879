//! Credenciais TikTok
//!
//! Lidas do ambiente a cada invocação (nunca no startup). Ausência é
//! reportada como erro de configuração na própria requisição.

use std::fmt;

use crate::utils::{AppError, AppResult};

pub const CLIENT_KEY_VAR: &str = "TIKTOK_CLIENT_KEY";
pub const CLIENT_SECRET_VAR: &str = "TIKTOK_CLIENT_SECRET";
pub const DEMO_ACCESS_TOKEN_VAR: &str = "TIKTOK_DEMO_ACCESS_TOKEN";

pub const MISSING_CLIENT_CREDENTIALS: &str = "TikTok client credentials not configured";
pub const MISSING_DEMO_ACCESS_TOKEN: &str =
    "TikTok demo access token not configured (TIKTOK_DEMO_ACCESS_TOKEN)";

#[derive(Clone, Default)]
pub struct TikTokCredentials {
    pub client_key: Option<String>,
    pub client_secret: Option<String>,
    /// Token único compartilhado por todos os chamadores (atalho de demo,
    /// no lugar de um lookup por usuário)
    pub demo_access_token: Option<String>,
}

impl TikTokCredentials {
    pub fn from_env() -> Self {
        Self {
            client_key: non_empty_var(CLIENT_KEY_VAR),
            client_secret: non_empty_var(CLIENT_SECRET_VAR),
            demo_access_token: non_empty_var(DEMO_ACCESS_TOKEN_VAR),
        }
    }

    /// `(client_key, client_secret)` para a troca de code
    pub fn client_credentials(&self) -> AppResult<(&str, &str)> {
        match (non_empty(&self.client_key), non_empty(&self.client_secret)) {
            (Some(key), Some(secret)) => Ok((key, secret)),
            _ => Err(AppError::ConfigError(MISSING_CLIENT_CREDENTIALS.to_string())),
        }
    }

    pub fn demo_access_token(&self) -> AppResult<&str> {
        non_empty(&self.demo_access_token)
            .ok_or_else(|| AppError::ConfigError(MISSING_DEMO_ACCESS_TOKEN.to_string()))
    }
}

// Nunca imprimir segredos, nem em Debug
impl fmt::Debug for TikTokCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TikTokCredentials")
            .field("client_key", &self.client_key.is_some())
            .field("client_secret", &self.client_secret.is_some())
            .field("demo_access_token", &self.demo_access_token.is_some())
            .finish()
    }
}

/// De onde os handlers obtêm as credenciais em cada chamada
#[derive(Debug, Clone)]
pub enum CredentialSource {
    /// Variáveis de ambiente do processo, relidas a cada requisição
    Environment,
    /// Valores injetados (testes, embedding)
    Fixed(TikTokCredentials),
}

impl CredentialSource {
    pub fn load(&self) -> TikTokCredentials {
        match self {
            CredentialSource::Environment => TikTokCredentials::from_env(),
            CredentialSource::Fixed(credentials) => credentials.clone(),
        }
    }
}

fn non_empty_var(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|value| !value.is_empty())
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|v| !v.is_empty())
}
