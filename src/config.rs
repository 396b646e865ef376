use serde::Deserialize;

/// Application configuration loaded from environment variables.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    /// Database connection URL for the event store
    /// (e.g. sqlite://canarygate.db, postgres://...)
    pub database_url: String,

    /// Server host (default: 127.0.0.1)
    pub server_host: String,

    /// Server port (default: 8080)
    pub server_port: u16,

    /// Environment: development, production, test
    pub environment: String,

    /// Directory uploaded files are staged into (default: ./uploads)
    pub upload_dir: String,

    /// Max upload file size in bytes (default: 10MB)
    pub max_upload_size: u64,

    /// Brand name shown on every rendered view
    pub brand_name: String,

    /// Slogan shown under the brand name
    pub app_slogan: String,

    /// Hostname to advertise in views; falls back to the request's
    /// forwarded/host header when unset
    pub brand_host: Option<String>,
}

impl Config {
    /// Load configuration from environment variables (with .env support).
    pub fn from_env() -> Result<Self, Box<dyn std::error::Error>> {
        // Load .env file if present (ignore errors if missing)
        let _ = dotenvy::dotenv();

        Ok(Config {
            database_url: std::env::var("DATABASE_URL")
                .unwrap_or_else(|_| "sqlite://canarygate.db?mode=rwc".to_string()),
            server_host: std::env::var("SERVER_HOST").unwrap_or_else(|_| "127.0.0.1".to_string()),
            server_port: std::env::var("SERVER_PORT")
                .unwrap_or_else(|_| "8080".to_string())
                .parse()
                .unwrap_or(8080),
            environment: std::env::var("ENVIRONMENT").unwrap_or_else(|_| "development".to_string()),
            upload_dir: std::env::var("UPLOAD_DIR").unwrap_or_else(|_| "./uploads".to_string()),
            max_upload_size: std::env::var("MAX_UPLOAD_SIZE")
                .unwrap_or_else(|_| "10485760".to_string()) // 10MB
                .parse()
                .unwrap_or(10_485_760),
            brand_name: std::env::var("BRAND_NAME")
                .unwrap_or_else(|_| "Acme NetSecure Appliance".to_string()),
            app_slogan: std::env::var("APP_SLOGAN")
                .unwrap_or_else(|_| "Unified edge security & telemetry".to_string()),
            brand_host: std::env::var("BRAND_HOST").ok(),
        })
    }

    /// Check if running in development mode.
    pub fn is_dev(&self) -> bool {
        self.environment == "development"
    }

    /// Get the full server address.
    pub fn server_addr(&self) -> String {
        format!("{}:{}", self.server_host, self.server_port)
    }
}
