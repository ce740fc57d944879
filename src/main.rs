//! Proxy HTTP para a TikTok Open API
//!
//! Rotas:
//! - POST /api/tiktok/exchange-code → troca authorization code por access token
//! - POST /api/tiktok/post          → publish-init de foto com token de demo
//! - GET  /health
//!
//! Stateless: credenciais são relidas do ambiente a cada requisição.

use std::sync::Arc;

use anyhow::Context;
use tokio::net::TcpListener;
use tracing_subscriber::EnvFilter;

use tiktok_publish_proxy::config::{CredentialSource, Settings};
use tiktok_publish_proxy::utils::logging::*;
use tiktok_publish_proxy::{app, AppState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // 🔧 Carregar .env (se existir) antes do tracing para respeitar RUST_LOG
    let dotenv_loaded = dotenvy::dotenv().is_ok();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    if dotenv_loaded {
        log_info("✅ Arquivo .env carregado com sucesso");
    } else {
        tracing::debug!("Arquivo .env não encontrado - usando variáveis de ambiente do sistema");
    }

    let settings = Settings::new().context("Failed to load settings")?;

    log_config_loaded(&std::env::var("RUN_MODE").unwrap_or_else(|_| "development".to_string()));
    log_info(&format!("🌐 TikTok API base: {}", settings.tiktok.api_base_url));

    let app_state = Arc::new(AppState::new(settings.clone(), CredentialSource::Environment));
    let router = app(app_state);

    // Em plataformas serverless/containers, PORT tem precedência
    let port = std::env::var("PORT")
        .ok()
        .and_then(|p| p.parse::<u16>().ok())
        .unwrap_or(settings.server.port);

    log_server_startup(port);

    let listener = TcpListener::bind((settings.server.host.as_str(), port))
        .await
        .with_context(|| format!("Failed to bind {}:{}", settings.server.host, port))?;

    log_server_ready(&settings.server.host, port);

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    log_info("🛑 Server shut down gracefully");
    Ok(())
}

/// Signal handler para graceful shutdown
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            log_error(&format!("Failed to install Ctrl+C handler: {}", e));
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                log_error(&format!("Failed to install SIGTERM handler: {}", e));
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    log_warning("Shutdown signal received");
}
