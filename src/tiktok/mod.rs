//! # TikTok Open API
//!
//! Cliente e tipos das duas operações repassadas pelo proxy:
//! - troca de authorization code por access token (`/v2/oauth/token/`)
//! - publish-init de fotos (`/v2/post/publish/content/init/`)

pub mod client;
pub mod models;

pub use client::TikTokClient;
pub use models::{ExchangeRequest, ExchangeResult, PostMode, PublishPayload, PublishRequest};
