use serde_json::Value;
use tracing::{debug, error, info, warn};

use super::AppError;

pub fn log_request_received(endpoint: &str, method: &str) {
    info!("Request received: {} {}", method, endpoint);
}

pub fn log_request_processed(endpoint: &str, status: u16, duration_ms: u64) {
    info!("Request processed: {} - Status: {} - Duration: {}ms",
          endpoint, status, duration_ms);
}

pub fn log_tiktok_api_error(endpoint: &str, status: u16, details: &Value) {
    error!("TikTok API error: {} - Status: {} - Payload: {}", endpoint, status, details);
}

pub fn log_handler_error(endpoint: &str, err: &AppError) {
    error!("Handler error on {}: {}", endpoint, err);
}

pub fn log_config_loaded(env: &str) {
    info!("Configuration loaded successfully for environment: {}", env);
}

pub fn log_server_startup(port: u16) {
    info!("🚀 TikTok publish proxy starting on port {}", port);
}

pub fn log_server_ready(host: &str, port: u16) {
    info!("✅ Server ready and listening on http://{}:{}", host, port);
}

pub fn log_health_check() {
    debug!("Health check requested");
}

pub fn log_info(message: &str) {
    info!("{}", message);
}

pub fn log_error(message: &str) {
    error!("{}", message);
}

pub fn log_warning(message: &str) {
    warn!("{}", message);
}
