use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;

#[derive(Debug, Deserialize, Clone)]
pub struct CorsConfig {
    pub allow_origins: Vec<String>,
    pub max_age: u64,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub cors: CorsConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct DatabaseConfig {
    pub url: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct AuthConfig {
    pub secret_key: String,
    /// Access token lifetime in minutes.
    pub access_token_ttl_minutes: i64,
    /// Refresh token lifetime in days.
    pub refresh_token_ttl_days: i64,
}

/// Client credentials for one OAuth provider.
#[derive(Debug, Deserialize, Clone)]
pub struct OAuthClientConfig {
    pub client_id: String,
    pub client_secret: String,
}

#[derive(Debug, Deserialize, Clone, Default)]
pub struct OAuthConfig {
    pub google: Option<OAuthClientConfig>,
    pub microsoft: Option<OAuthClientConfig>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct StorageConfig {
    /// Directory for the content-addressed media store.
    pub media_dir: std::path::PathBuf,
    /// Maximum accepted upload size in bytes.
    pub max_upload_size: u64,
}

#[derive(Debug, Deserialize, Clone)]
pub struct AppConfig {
    /// One of `development`, `staging`, `production`. Interactive API docs and
    /// error details are disabled in production.
    pub environment: String,
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub auth: AuthConfig,
    #[serde(default)]
    pub oauth: OAuthConfig,
    pub storage: StorageConfig,
}

impl AppConfig {
    pub fn load() -> Result<Self, ConfigError> {
        let s = Config::builder()
            .set_default("environment", "development")?
            .set_default("server.host", "127.0.0.1")?
            .set_default("server.port", 8000)?
            .set_default("server.cors.allow_origins", vec!["http://localhost:5173"])?
            .set_default("server.cors.max_age", 3600)?
            .set_default("auth.access_token_ttl_minutes", 30)?
            .set_default("auth.refresh_token_ttl_days", 7)?
            .set_default("storage.media_dir", "./media")?
            .set_default("storage.max_upload_size", 10 * 1024 * 1024)?
            // Load from config/config.toml
            .add_source(File::with_name("config/config").required(false))
            // Override from environment (e.g., LAKESIDE__AUTH__SECRET_KEY)
            .add_source(Environment::with_prefix("LAKESIDE").separator("__"))
            .build()?;

        s.try_deserialize()
    }

    pub fn is_production(&self) -> bool {
        self.environment == "production"
    }
}
