use std::net::{IpAddr, SocketAddr};
use std::time::Duration;

/// Application configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub server_host: IpAddr,
    pub server_port: u16,
    pub environment: Environment,
    pub log_level: String,
    pub jwt_secret: String,
    pub jwt_access_expiration_secs: u64,
    /// Public URL of the web app, used for CORS and for sign-in links.
    pub app_url: String,
    pub email_from: String,
    /// Mail API key. When absent, sign-in links are logged instead of sent.
    pub resend_api_key: Option<String>,
    pub signin_token_ttl_secs: u64,
    pub signin_rate_limit: RateLimitPolicy,
    pub message_rate_limit: RateLimitPolicy,
}

/// Deployment environment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Environment {
    Development,
    Staging,
    Production,
}

/// How many hits an identifier may make within a window.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RateLimitPolicy {
    pub limit: u32,
    pub window: Duration,
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// Required: `DATABASE_URL`, `JWT_SECRET`
    /// Optional with defaults: `SERVER_HOST`, `SERVER_PORT`, `ENVIRONMENT`, `LOG_LEVEL`,
    /// `JWT_ACCESS_EXPIRATION_SECS`, `APP_URL`, `EMAIL_FROM`, `RESEND_API_KEY`,
    /// `SIGNIN_TOKEN_TTL_SECS`, `SIGNIN_RATE_LIMIT`, `SIGNIN_RATE_WINDOW_SECS`,
    /// `MESSAGE_RATE_LIMIT`, `MESSAGE_RATE_WINDOW_SECS`
    ///
    /// `PORT` overrides `SERVER_PORT` and host defaults to `0.0.0.0` in production.
    ///
    /// # Errors
    ///
    /// Returns an error if a required variable is missing or a numeric / address
    /// variable cannot be parsed.
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();

        let database_url = std::env::var("DATABASE_URL")
            .map_err(|_| anyhow::anyhow!("DATABASE_URL must be set"))?;

        let environment = match std::env::var("ENVIRONMENT")
            .unwrap_or_else(|_| "development".to_string())
            .as_str()
        {
            "production" => Environment::Production,
            "staging" => Environment::Staging,
            _ => Environment::Development,
        };

        let server_port = std::env::var("PORT")
            .or_else(|_| std::env::var("SERVER_PORT"))
            .unwrap_or_else(|_| "3000".to_string())
            .parse::<u16>()
            .map_err(|_| anyhow::anyhow!("SERVER_PORT / PORT must be a valid u16"))?;

        let default_host = if environment == Environment::Production {
            "0.0.0.0"
        } else {
            "127.0.0.1"
        };

        let server_host = std::env::var("SERVER_HOST")
            .unwrap_or_else(|_| default_host.to_string())
            .parse::<IpAddr>()
            .map_err(|_| anyhow::anyhow!("SERVER_HOST must be a valid IP address"))?;

        let log_level = std::env::var("LOG_LEVEL").unwrap_or_else(|_| "info".to_string());

        let jwt_secret =
            std::env::var("JWT_SECRET").map_err(|_| anyhow::anyhow!("JWT_SECRET must be set"))?;

        let app_url =
            std::env::var("APP_URL").unwrap_or_else(|_| "http://localhost:3001".to_string());
        let email_from = std::env::var("EMAIL_FROM")
            .unwrap_or_else(|_| "TableRonde <noreply@tableronde.local>".to_string());
        let resend_api_key = std::env::var("RESEND_API_KEY")
            .ok()
            .filter(|key| !key.trim().is_empty());

        Ok(Self {
            database_url,
            server_host,
            server_port,
            environment,
            log_level,
            jwt_secret,
            jwt_access_expiration_secs: env_u64("JWT_ACCESS_EXPIRATION_SECS", 2_592_000)?,
            app_url,
            email_from,
            resend_api_key,
            signin_token_ttl_secs: env_u64("SIGNIN_TOKEN_TTL_SECS", 600)?,
            signin_rate_limit: RateLimitPolicy {
                limit: env_u32("SIGNIN_RATE_LIMIT", 5)?,
                window: Duration::from_secs(env_u64("SIGNIN_RATE_WINDOW_SECS", 600)?),
            },
            message_rate_limit: RateLimitPolicy {
                limit: env_u32("MESSAGE_RATE_LIMIT", 20)?,
                window: Duration::from_secs(env_u64("MESSAGE_RATE_WINDOW_SECS", 60)?),
            },
        })
    }

    /// Build the socket address for the server to bind to.
    #[must_use]
    pub const fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.server_host, self.server_port)
    }
}

fn env_u64(key: &str, default: u64) -> anyhow::Result<u64> {
    std::env::var(key).map_or(Ok(default), |raw| {
        raw.parse::<u64>()
            .map_err(|_| anyhow::anyhow!("{key} must be a non-negative integer"))
    })
}

fn env_u32(key: &str, default: u32) -> anyhow::Result<u32> {
    std::env::var(key).map_or(Ok(default), |raw| {
        raw.parse::<u32>()
            .map_err(|_| anyhow::anyhow!("{key} must be a non-negative integer"))
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> Config {
        Config {
            database_url: String::new(),
            server_host: IpAddr::from([127, 0, 0, 1]),
            server_port: 3000,
            environment: Environment::Development,
            log_level: "info".to_string(),
            jwt_secret: "secret".to_string(),
            jwt_access_expiration_secs: 60,
            app_url: "http://localhost:3001".to_string(),
            email_from: "TableRonde <noreply@tableronde.local>".to_string(),
            resend_api_key: None,
            signin_token_ttl_secs: 600,
            signin_rate_limit: RateLimitPolicy {
                limit: 5,
                window: Duration::from_secs(600),
            },
            message_rate_limit: RateLimitPolicy {
                limit: 20,
                window: Duration::from_secs(60),
            },
        }
    }

    #[test]
    fn test_socket_addr() {
        let addr = config().socket_addr();
        assert_eq!(addr.port(), 3000);
        assert!(addr.ip().is_loopback());
    }

    #[test]
    fn test_env_number_defaults_when_unset() {
        let value = env_u64("TABLERONDE_TEST_UNSET_VARIABLE", 42).unwrap_or_default();
        assert_eq!(value, 42);
    }
}
