use argon2::password_hash::SaltString;
use argon2::{Argon2, PasswordHash, PasswordHasher, PasswordVerifier};
use rand::Rng;
use rand::distributions::Alphanumeric;
use rand::rngs::OsRng;

/// Length of the random token sent in sign-in links.
pub const TOKEN_LENGTH: usize = 32;

/// Generate a random alphanumeric sign-in token.
#[must_use]
pub fn generate_token() -> String {
    rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(TOKEN_LENGTH)
        .map(char::from)
        .collect()
}

/// Hash a sign-in token using `Argon2id` so it is never stored in clear.
///
/// # Errors
///
/// Returns an error if hashing fails.
pub fn hash_token(token: &str) -> anyhow::Result<String> {
    let salt = SaltString::generate(&mut OsRng);
    let hash = Argon2::default()
        .hash_password(token.as_bytes(), &salt)
        .map_err(|e| anyhow::anyhow!("Failed to hash sign-in token: {e}"))?;
    Ok(hash.to_string())
}

/// Verify a sign-in token against a stored `Argon2id` hash.
///
/// # Errors
///
/// Returns an error if the hash format is invalid.
pub fn verify_token(token: &str, hash: &str) -> anyhow::Result<bool> {
    let parsed_hash =
        PasswordHash::new(hash).map_err(|e| anyhow::anyhow!("Invalid token hash: {e}"))?;
    Ok(Argon2::default()
        .verify_password(token.as_bytes(), &parsed_hash)
        .is_ok())
}
