use chrono::Utc;
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::config::Config;

/// JWT claims embedded in access tokens.
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    /// Subject: user ID as a UUID string.
    pub sub: String,
    /// Token type, always `"access"` for tokens accepted by the API.
    pub token_type: String,
    /// Expiration time (Unix timestamp).
    pub exp: i64,
    /// Issued-at time (Unix timestamp).
    pub iat: i64,
    /// Unique JWT identifier.
    pub jti: String,
}

/// Issue an access token for the given user.
///
/// # Errors
///
/// Returns an error if JWT encoding fails.
pub fn generate_access_token(user_id: Uuid, config: &Config) -> anyhow::Result<String> {
    let now = Utc::now();

    #[allow(clippy::cast_possible_wrap)]
    let exp = now.timestamp() + config.jwt_access_expiration_secs as i64;

    let claims = Claims {
        sub: user_id.to_string(),
        token_type: "access".to_string(),
        exp,
        iat: now.timestamp(),
        jti: Uuid::new_v4().to_string(),
    };

    let key = EncodingKey::from_secret(config.jwt_secret.as_bytes());
    encode(&Header::default(), &claims, &key)
        .map_err(|e| anyhow::anyhow!("Failed to encode access token: {e}"))
}

/// Validate an access token and return the user id it was issued for.
///
/// # Errors
///
/// Returns an error if the token is invalid, expired, not an access token,
/// or carries a subject that is not a UUID.
pub fn validate_access_token(token: &str, secret: &str) -> anyhow::Result<Uuid> {
    let key = DecodingKey::from_secret(secret.as_bytes());
    let validation = Validation::default();

    let token_data = decode::<Claims>(token, &key, &validation)
        .map_err(|e| anyhow::anyhow!("Invalid access token: {e}"))?;

    if token_data.claims.token_type != "access" {
        return Err(anyhow::anyhow!("Token is not an access token"));
    }

    token_data
        .claims
        .sub
        .parse()
        .map_err(|_| anyhow::anyhow!("Invalid token subject"))
}

#[cfg(test)]
mod tests {
    use std::net::IpAddr;
    use std::time::Duration;

    use super::*;
    use crate::config::{Environment, RateLimitPolicy};

    fn config(secret: &str) -> Config {
        Config {
            database_url: String::new(),
            server_host: IpAddr::from([127, 0, 0, 1]),
            server_port: 0,
            environment: Environment::Development,
            log_level: "warn".to_string(),
            jwt_secret: secret.to_string(),
            jwt_access_expiration_secs: 900,
            app_url: String::new(),
            email_from: String::new(),
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
    fn issued_token_validates_to_same_user() {
        let user_id = Uuid::new_v4();
        let cfg = config("test-secret-key-for-testing-only-32chars");
        let token = generate_access_token(user_id, &cfg).unwrap_or_default();

        let subject = validate_access_token(&token, &cfg.jwt_secret).ok();
        assert_eq!(subject, Some(user_id));
    }

    #[test]
    fn token_signed_with_other_secret_is_rejected() {
        let cfg = config("first-secret-key-for-testing-only-32");
        let token = generate_access_token(Uuid::new_v4(), &cfg).unwrap_or_default();

        assert!(validate_access_token(&token, "second-secret-key-for-testing-only").is_err());
    }

    #[test]
    fn garbage_is_rejected() {
        assert!(validate_access_token("not-a-jwt", "secret").is_err());
    }
}
