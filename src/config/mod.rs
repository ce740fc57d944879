pub mod credentials;
pub mod settings;

pub use credentials::{CredentialSource, TikTokCredentials};
pub use settings::Settings;
