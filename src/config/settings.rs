use serde::{Deserialize, Serialize};
use config::{Config, ConfigError, Environment, File};

pub const DEFAULT_API_BASE_URL: &str = "https://open.tiktokapis.com";

/// Configuração estática do serviço.
///
/// As credenciais TikTok NÃO fazem parte daqui: são lidas a cada requisição
/// via [`super::CredentialSource`].
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Settings {
    pub server: ServerSettings,
    pub tiktok: TikTokSettings,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct ServerSettings {
    pub host: String,
    pub port: u16,
    /// Liga `CorsLayer::permissive()`. Desligado por padrão: com ele ligado,
    /// preflights OPTIONS são respondidos pela camada e não chegam ao handler.
    pub cors_enabled: bool,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct TikTokSettings {
    /// Base da Open API (sobrescrita em testes para apontar para um mock)
    pub api_base_url: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            server: ServerSettings {
                host: "0.0.0.0".to_string(),
                port: 3000,
                cors_enabled: false,
            },
            tiktok: TikTokSettings {
                api_base_url: DEFAULT_API_BASE_URL.to_string(),
            },
        }
    }
}

impl Settings {
    pub fn new() -> Result<Self, ConfigError> {
        let run_mode = std::env::var("RUN_MODE").unwrap_or_else(|_| "development".into());

        let s = Config::builder()
            // Defaults embutidos: o binário sobe mesmo sem arquivos de config
            .set_default("server.host", "0.0.0.0")?
            .set_default("server.port", 3000)?
            .set_default("server.cors_enabled", false)?
            .set_default("tiktok.api_base_url", DEFAULT_API_BASE_URL)?
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name(&format!("config/{}", run_mode)).required(false))
            // Ex: TIKTOK_PROXY__SERVER__PORT=8080
            .add_source(
                Environment::with_prefix("TIKTOK_PROXY")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        s.try_deserialize()
    }
}
