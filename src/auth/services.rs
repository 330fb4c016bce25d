use lazy_static::lazy_static;
use regex::Regex;
use sqlx::PgPool;
use thiserror::Error;
use time::OffsetDateTime;
use tracing::{debug, info, warn};

use crate::auth::jwt::JwtKeys;
use crate::auth::password::{hash_password, verify_password};
use crate::auth::repo_types::{Session, User};
use crate::error::ApiError;

pub const MIN_PASSWORD_LEN: usize = 6;

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("{0}")]
    Invalid(&'static str),

    #[error("Password must be at least 6 characters")]
    WeakPassword,

    #[error("Email already registered")]
    DuplicateEmail,

    #[error("Username already taken")]
    DuplicateUsername,

    #[error("Invalid email or password")]
    InvalidCredentials,

    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

impl From<AuthError> for ApiError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::Invalid(_) | AuthError::WeakPassword => ApiError::Validation(err.to_string()),
            AuthError::DuplicateEmail | AuthError::DuplicateUsername => {
                ApiError::Conflict(err.to_string())
            }
            AuthError::InvalidCredentials => ApiError::Unauthorized(err.to_string()),
            AuthError::Internal(e) => ApiError::Internal(e),
        }
    }
}

lazy_static! {
    static ref EMAIL_RE: Regex = Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").unwrap();
    // Verified against when the email is unknown so both failure paths cost the same.
    static ref DUMMY_HASH: String = hash_password("navigo-dummy-password").unwrap_or_default();
}

pub(crate) fn is_valid_email(email: &str) -> bool {
    EMAIL_RE.is_match(email)
}

pub(crate) fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

/// Checks a signup payload without touching the database.
pub fn validate_signup(username: &str, email: &str, password: &str) -> Result<(), AuthError> {
    if username.is_empty() || email.is_empty() || password.is_empty() {
        return Err(AuthError::Invalid("All fields are required"));
    }
    if !is_valid_email(email) {
        return Err(AuthError::Invalid("Invalid email address"));
    }
    if password.chars().count() < MIN_PASSWORD_LEN {
        return Err(AuthError::WeakPassword);
    }
    Ok(())
}

/// Registers a user. Email uniqueness is checked before username uniqueness.
pub async fn register(
    db: &PgPool,
    username: &str,
    email: &str,
    password: &str,
) -> Result<User, AuthError> {
    let username = username.trim();
    let email = normalize_email(email);
    validate_signup(username, &email, password)?;

    if User::find_by_email(db, &email).await?.is_some() {
        warn!(email = %email, "email already registered");
        return Err(AuthError::DuplicateEmail);
    }
    if User::find_by_username(db, username).await?.is_some() {
        warn!(username = %username, "username already taken");
        return Err(AuthError::DuplicateUsername);
    }

    let hash = hash_password(password)?;
    let user = User::create(db, username, &email, &hash)
        .await
        .map_err(duplicate_from_constraint)?;

    info!(user_id = user.id, username = %user.username, "user registered");
    Ok(user)
}

/// Two concurrent signups can both pass the pre-checks; the unique index decides.
fn duplicate_from_constraint(err: sqlx::Error) -> AuthError {
    if let Some(db_err) = err.as_database_error() {
        if db_err.is_unique_violation() {
            return match db_err.constraint() {
                Some(c) if c.contains("username") => AuthError::DuplicateUsername,
                _ => AuthError::DuplicateEmail,
            };
        }
    }
    AuthError::Internal(err.into())
}

/// Verifies credentials, opens a server-side session and signs its token.
pub async fn login(
    db: &PgPool,
    keys: &JwtKeys,
    email: &str,
    password: &str,
) -> Result<(User, String), AuthError> {
    let email = normalize_email(email);
    if email.is_empty() || password.is_empty() {
        return Err(AuthError::Invalid("Email and password are required"));
    }

    let Some(user) = User::find_by_email(db, &email).await? else {
        let _ = verify_password(password, &DUMMY_HASH);
        warn!(email = %email, "login unknown email");
        return Err(AuthError::InvalidCredentials);
    };

    if !verify_password(password, &user.password_hash)? {
        warn!(user_id = user.id, "login invalid password");
        return Err(AuthError::InvalidCredentials);
    }

    let purged = Session::purge_expired(db).await?;
    if purged > 0 {
        debug!(purged, "expired sessions removed");
    }
    let session = Session::create(db, user.id, keys.expires_at(OffsetDateTime::now_utc())).await?;
    let token = keys.sign(&user, &session)?;

    info!(user_id = user.id, session_id = %session.id, "user logged in");
    Ok((user, token))
}

/// Ends the session named by `token`. Invalid tokens are ignored.
pub async fn logout(db: &PgPool, keys: &JwtKeys, token: &str) -> anyhow::Result<()> {
    if let Ok(claims) = keys.verify(token) {
        Session::delete(db, claims.sid).await?;
        info!(user_id = claims.sub, session_id = %claims.sid, "user logged out");
    }
    Ok(())
}
