// Proxy TikTok Open API
// Expõe módulos para uso em testes e no binário

pub mod config;
pub mod handlers;
pub mod tiktok;
pub mod utils;

use std::sync::Arc;

use axum::{
    routing::{any, get},
    Router,
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

/// Estado compartilhado entre requisições. Somente leitura: nenhum dado de
/// uma invocação sobrevive para a próxima.
#[derive(Clone)]
pub struct AppState {
    pub settings: config::Settings,
    pub tiktok: tiktok::TikTokClient,
    pub credentials: config::CredentialSource,
}

impl AppState {
    pub fn new(settings: config::Settings, credentials: config::CredentialSource) -> Self {
        let tiktok = tiktok::TikTokClient::new(reqwest::Client::new(), settings.tiktok.api_base_url.clone());

        Self {
            settings,
            tiktok,
            credentials,
        }
    }
}

/// Monta o router com todas as rotas.
///
/// Os endpoints TikTok usam `any`: a verificação de método é do próprio
/// handler, que responde 405 + `Allow: POST` com body JSON.
pub fn app(state: Arc<AppState>) -> Router {
    let mut router = Router::new()
        .route(handlers::HEALTH_ROUTE, get(handlers::health_check))
        .route(handlers::EXCHANGE_CODE_ROUTE, any(handlers::handle_exchange_code))
        .route(handlers::PUBLISH_ROUTE, any(handlers::handle_publish))
        .layer(TraceLayer::new_for_http());

    if state.settings.server.cors_enabled {
        router = router.layer(CorsLayer::permissive());
    }

    router.with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{CredentialSource, Settings, TikTokCredentials};
    use crate::handlers::test_support::send_preflight;
    use axum::http::{header, StatusCode};

    #[tokio::test]
    async fn test_cors_enabled_answers_preflight() {
        let mut settings = Settings::default();
        settings.server.cors_enabled = true;
        let state = AppState::new(settings, CredentialSource::Fixed(TikTokCredentials::default()));

        for route in [handlers::EXCHANGE_CODE_ROUTE, handlers::PUBLISH_ROUTE] {
            let response = send_preflight(app(Arc::new(state.clone())), route).await;

            assert_eq!(response.status(), StatusCode::OK, "route {}", route);
            assert_eq!(response.headers().get(header::ACCESS_CONTROL_ALLOW_ORIGIN).unwrap(), "*");
        }
    }
}
