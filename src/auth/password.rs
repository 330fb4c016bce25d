use argon2::{
    password_hash::{self, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use rand::rngs::OsRng;
use tracing::error;

/// `password_hash::Error` is not `std::error::Error`, so it is flattened here.
fn hash_failure(op: &'static str, err: password_hash::Error) -> anyhow::Error {
    error!(error = %err, op, "argon2 failure");
    anyhow::anyhow!("argon2 {op}: {err}")
}

/// PHC-format Argon2id hash with a fresh random salt.
pub fn hash_password(plain: &str) -> anyhow::Result<String> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(plain.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| hash_failure("hash", e))
}

/// `Ok(false)` for a wrong password; `Err` only when `stored` is not a PHC hash.
pub fn verify_password(plain: &str, stored: &str) -> anyhow::Result<bool> {
    let parsed = PasswordHash::new(stored).map_err(|e| hash_failure("parse", e))?;
    match Argon2::default().verify_password(plain.as_bytes(), &parsed) {
        Ok(()) => Ok(true),
        Err(password_hash::Error::Password) => Ok(false),
        Err(e) => Err(hash_failure("verify", e)),
    }
}
