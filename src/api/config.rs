use dotenvy::dotenv;
use once_cell::sync::Lazy;
use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("{0} must be set")]
    Missing(&'static str),
    #[error("{name} must be a valid {expected}")]
    Invalid {
        name: &'static str,
        expected: &'static str,
    },
}

/// Settings read once from the environment (and `.env` when present).
#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub jwt_secret: String,
    pub jwt_expiration_minutes: u64,
    pub server_host: String,
    pub server_port: u16,
    pub upload_dir: PathBuf,
    pub mail_api_url: Option<String>,
    pub mail_api_key: Option<String>,
    pub mail_from: String,
    pub cors_allowed_origin: Option<String>,
}

impl Config {
    pub fn new() -> Self {
        CONFIG.clone()
    }

    pub fn from_env() -> Result<Self, ConfigError> {
        dotenv().ok();

        let database_url = required("DATABASE_URL")?;
        let jwt_secret = required("JWT_SECRET")?;
        let jwt_expiration_minutes = parsed("JWT_EXPIRATION_MINUTES", 60, "u64")?;
        let server_host = optional("SERVER_HOST").unwrap_or_else(|| "127.0.0.1".to_string());
        let server_port = parsed("SERVER_PORT", 3000, "port number")?;
        let upload_dir = optional("UPLOAD_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from("storage"));

        Ok(Config {
            database_url,
            jwt_secret,
            jwt_expiration_minutes,
            server_host,
            server_port,
            upload_dir,
            mail_api_url: optional("MAIL_API_URL"),
            mail_api_key: optional("MAIL_API_KEY"),
            mail_from: optional("MAIL_FROM")
                .unwrap_or_else(|| "UDD Merch Hub <no-reply@merch-hub.local>".to_string()),
            cors_allowed_origin: optional("CORS_ALLOWED_ORIGIN"),
        })
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.server_host, self.server_port)
    }
}

impl Default for Config {
    fn default() -> Self {
        Config::new()
    }
}

fn optional(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|v| !v.trim().is_empty())
}

fn required(name: &'static str) -> Result<String, ConfigError> {
    optional(name).ok_or(ConfigError::Missing(name))
}

fn parsed<T: std::str::FromStr>(
    name: &'static str,
    default: T,
    expected: &'static str,
) -> Result<T, ConfigError> {
    match optional(name) {
        Some(raw) => raw
            .parse()
            .map_err(|_| ConfigError::Invalid { name, expected }),
        None => Ok(default),
    }
}

// The binaries call `Config::from_env()` up front, so a bad environment is
// reported there before anything touches this.
static CONFIG: Lazy<Config> = Lazy::new(|| {
    let config = Config::from_env().unwrap_or_else(|e| panic!("invalid configuration: {e}"));

    tracing::info!("Config loaded");

    config
});
