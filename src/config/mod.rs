use anyhow::Context;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub api_server: ServerConfig,
    pub redirect_server: ServerConfig,
    /// Base URL short links are advertised under, normally where the
    /// redirect server is reachable.
    pub public_base_url: String,
    pub auth: AuthConfig,
    pub insights: InsightsConfig,
    pub seed_demo_data: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl ServerConfig {
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthConfig {
    pub admin_email: String,
    pub admin_password: String,
    /// Session signing secret. When unset, a random per-process key is
    /// used and sessions do not survive restarts.
    #[serde(default)]
    pub session_secret: Option<String>,
    pub session_ttl_hours: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InsightsConfig {
    /// Endpoint of the external insights API. When unset, the insights
    /// route reports the feature as unavailable.
    #[serde(default)]
    pub api_url: Option<String>,
    pub timeout_secs: u64,
    pub cache_ttl_secs: u64,
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();

        let api_host = std::env::var("API_HOST").unwrap_or_else(|_| "127.0.0.1".to_string());
        let api_port = std::env::var("API_PORT")
            .unwrap_or_else(|_| "8080".to_string())
            .parse::<u16>()
            .context("API_PORT must be a valid port number")?;

        let redirect_host =
            std::env::var("REDIRECT_HOST").unwrap_or_else(|_| "127.0.0.1".to_string());
        let redirect_port = std::env::var("REDIRECT_PORT")
            .unwrap_or_else(|_| "3000".to_string())
            .parse::<u16>()
            .context("REDIRECT_PORT must be a valid port number")?;

        let public_base_url = std::env::var("PUBLIC_BASE_URL")
            .unwrap_or_else(|_| "http://localhost:3000".to_string());

        let admin_email =
            std::env::var("ADMIN_EMAIL").unwrap_or_else(|_| "admin@linksnap.com".to_string());
        let admin_password =
            std::env::var("ADMIN_PASSWORD").unwrap_or_else(|_| "admin123".to_string());
        let session_secret = std::env::var("SESSION_SECRET").ok();
        let session_ttl_hours = std::env::var("SESSION_TTL_HOURS")
            .unwrap_or_else(|_| "24".to_string())
            .parse::<i64>()
            .context("SESSION_TTL_HOURS must be a number of hours")?;

        let insights_api_url = std::env::var("INSIGHTS_API_URL").ok();
        let insights_timeout_secs = std::env::var("INSIGHTS_TIMEOUT_SECS")
            .unwrap_or_else(|_| "30".to_string())
            .parse::<u64>()
            .context("INSIGHTS_TIMEOUT_SECS must be a number of seconds")?;
        let insights_cache_ttl_secs = std::env::var("INSIGHTS_CACHE_TTL_SECS")
            .unwrap_or_else(|_| "600".to_string())
            .parse::<u64>()
            .context("INSIGHTS_CACHE_TTL_SECS must be a number of seconds")?;

        let seed_demo_data = std::env::var("SEED_DEMO_DATA")
            .map(|v| matches!(v.to_lowercase().as_str(), "true" | "1" | "yes"))
            .unwrap_or(false);

        Ok(Config {
            api_server: ServerConfig {
                host: api_host,
                port: api_port,
            },
            redirect_server: ServerConfig {
                host: redirect_host,
                port: redirect_port,
            },
            public_base_url,
            auth: AuthConfig {
                admin_email,
                admin_password,
                session_secret,
                session_ttl_hours,
            },
            insights: InsightsConfig {
                api_url: insights_api_url,
                timeout_secs: insights_timeout_secs,
                cache_ttl_secs: insights_cache_ttl_secs,
            },
            seed_demo_data,
        })
    }
}
