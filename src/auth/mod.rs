pub mod jwt;
pub mod middleware;
pub mod sign_in_token;

/// Normalize an email used as an identity key: trimmed and lowercased.
#[must_use]
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}
