//! Outbound mail for sign-in links.

use std::fmt::Debug;

use async_trait::async_trait;
use serde_json::json;

const RESEND_API_URL: &str = "https://api.resend.com/emails";

/// A sign-in email ready to be delivered.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignInEmail {
    pub to: String,
    pub url: String,
    /// Lifetime of the link, in seconds.
    pub expires_in_secs: u64,
}

impl SignInEmail {
    #[must_use]
    pub fn subject(&self) -> &'static str {
        "Votre lien de connexion TableRonde"
    }

    /// Human-readable link lifetime, rounded up to whole minutes.
    #[must_use]
    pub fn expiry_text(&self) -> String {
        match self.expires_in_secs.div_ceil(60) {
            0 | 1 => "1 minute".to_string(),
            minutes => format!("{minutes} minutes"),
        }
    }

    #[must_use]
    pub fn html(&self) -> String {
        let url = &self.url;
        let expiry = self.expiry_text();
        format!(
            "<div style=\"font-family: sans-serif; line-height: 1.6;\">\
             <h1>Connexion à TableRonde</h1>\
             <p>Bonjour,</p>\
             <p>Utilisez le lien ci-dessous pour vous connecter. Il expirera dans {expiry}.</p>\
             <p><a href=\"{url}\">Se connecter</a></p>\
             <p>Ou copiez-collez cette URL dans votre navigateur :</p>\
             <p><a href=\"{url}\">{url}</a></p>\
             </div>"
        )
    }
}

/// Delivers sign-in emails.
#[async_trait]
pub trait Mailer: Send + Sync + Debug {
    /// Send a sign-in link.
    ///
    /// # Errors
    ///
    /// Returns an error if the message could not be handed to the provider.
    async fn send_sign_in(&self, email: &SignInEmail) -> anyhow::Result<()>;
}

/// Sends mail through the Resend HTTP API.
#[derive(Debug, Clone)]
pub struct ResendMailer {
    client: reqwest::Client,
    api_key: String,
    from: String,
}

impl ResendMailer {
    #[must_use]
    pub fn new(api_key: String, from: String) -> Self {
        Self {
            client: reqwest::Client::new(),
            api_key,
            from,
        }
    }
}

#[async_trait]
impl Mailer for ResendMailer {
    async fn send_sign_in(&self, email: &SignInEmail) -> anyhow::Result<()> {
        let response = self
            .client
            .post(RESEND_API_URL)
            .bearer_auth(&self.api_key)
            .json(&json!({
                "from": self.from,
                "to": email.to,
                "subject": email.subject(),
                "html": email.html(),
            }))
            .send()
            .await
            .map_err(|e| anyhow::anyhow!("Mail request failed: {e}"))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(anyhow::anyhow!("Mail provider returned {status}: {body}"));
        }

        Ok(())
    }
}

/// Development mailer: writes the link to the log instead of sending it.
#[derive(Debug, Clone, Default)]
pub struct LogMailer;

#[async_trait]
impl Mailer for LogMailer {
    async fn send_sign_in(&self, email: &SignInEmail) -> anyhow::Result<()> {
        tracing::info!(to = %email.to, url = %email.url, "Sign-in link (not sent, no mail API key)");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn html_embeds_link() {
        let email = SignInEmail {
            to: "host@example.com".to_string(),
            url: "http://localhost:3001/signin/verify?token=abc".to_string(),
            expires_in_secs: 600,
        };
        assert!(email.html().contains("http://localhost:3001/signin/verify?token=abc"));
        assert!(email.subject().contains("TableRonde"));
    }

    #[test]
    fn expiry_follows_configured_lifetime() {
        let email = |expires_in_secs| SignInEmail {
            to: "host@example.com".to_string(),
            url: "http://localhost".to_string(),
            expires_in_secs,
        };
        assert!(email(1800).html().contains("Il expirera dans 30 minutes."));
        assert!(email(90).html().contains("Il expirera dans 2 minutes."));
        assert!(email(30).html().contains("Il expirera dans 1 minute."));
    }

    #[tokio::test]
    async fn log_mailer_never_fails() {
        let email = SignInEmail {
            to: "host@example.com".to_string(),
            url: "http://localhost".to_string(),
            expires_in_secs: 600,
        };
        assert!(LogMailer.send_sign_in(&email).await.is_ok());
    }
}
