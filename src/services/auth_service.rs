use chrono::{Duration, Utc};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, ModelTrait, QueryFilter, Set,
    TransactionTrait,
};

use crate::auth::{jwt, normalize_email, sign_in_token};
use crate::config::Config;
use crate::dto::auth::AuthResponse;
use crate::dto::user::UserResponse;
use crate::entities::verification_token;
use crate::error::AppError;
use crate::mail::SignInEmail;
use crate::services::UserService;

pub struct AuthService;

impl AuthService {
    /// Store a fresh single-use token for `email` and build the link to send.
    ///
    /// `email` must already be normalized.
    pub async fn create_sign_in_link(
        db: &DatabaseConnection,
        config: &Config,
        email: &str,
    ) -> Result<SignInEmail, AppError> {
        let token = sign_in_token::generate_token();
        let ttl = i64::try_from(config.signin_token_ttl_secs).unwrap_or(i64::MAX);
        let expires = Duration::try_seconds(ttl)
            .and_then(|ttl| Utc::now().checked_add_signed(ttl))
            .ok_or_else(|| AppError::Internal(anyhow::anyhow!("sign-in token TTL out of range")))?
            .fixed_offset();

        verification_token::ActiveModel {
            identifier: Set(email.to_string()),
            token_hash: Set(sign_in_token::hash_token(&token)?),
            expires: Set(expires),
        }
        .insert(db)
        .await
        .map_err(|e| AppError::Persistence(e.into()))?;

        let url = format!(
            "{}/signin/verify?email={}&token={}",
            config.app_url.trim_end_matches('/'),
            urlencoding::encode(email),
            urlencoding::encode(&token),
        );

        Ok(SignInEmail {
            to: email.to_string(),
            url,
            expires_in_secs: config.signin_token_ttl_secs,
        })
    }

    /// Consume a sign-in token and issue an access token for the matching account.
    ///
    /// The account is created on first sign-in. Expired tokens for the email are
    /// removed along the way.
    pub async fn verify_sign_in(
        db: &DatabaseConnection,
        config: &Config,
        email: &str,
        token: &str,
    ) -> Result<AuthResponse, AppError> {
        let email = normalize_email(email);
        let invalid = || AppError::Unauthorized("Invalid or expired sign-in link.".to_string());

        let txn = db.begin().await?;

        let candidates = verification_token::Entity::find()
            .filter(verification_token::Column::Identifier.eq(email.as_str()))
            .all(&txn)
            .await?;

        let now = Utc::now().fixed_offset();
        let mut matched = None;
        for candidate in candidates {
            if candidate.expires <= now {
                candidate.delete(&txn).await?;
                continue;
            }
            if matched.is_none() && sign_in_token::verify_token(token, &candidate.token_hash)? {
                matched = Some(candidate);
            }
        }

        let Some(matched) = matched else {
            txn.commit().await?;
            return Err(invalid());
        };
        matched.delete(&txn).await?;

        let user = UserService::find_or_create_by_email(&txn, &email).await?;
        txn.commit().await?;

        let access_token = jwt::generate_access_token(user.id, config)?;
        tracing::info!(user_id = %user.id, "User signed in");

        Ok(AuthResponse {
            token: access_token,
            user: UserResponse::from(&user),
        })
    }
}
