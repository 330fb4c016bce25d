use axum::{
    extract::{FromRef, State},
    http::HeaderMap,
    response::Redirect,
    routing::{get, post, put},
    Json, Router,
};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use time::Duration;
use tracing::{error, info, instrument};

use crate::{
    auth::{
        dto::{
            LoginRequest, LoginResponse, MessageResponse, PreferencesRequest, ProfileResponse,
            PublicUser, SignupRequest,
        },
        extractors::{session_token, AuthUser},
        jwt::JwtKeys,
        repo_types::User,
        services,
    },
    config::SessionConfig,
    error::{ApiError, ApiJson},
    state::AppState,
};

/// HttpOnly, SameSite=Lax session cookie living as long as the token.
fn session_cookie(cfg: &SessionConfig, token: String, ttl: Duration) -> Cookie<'static> {
    Cookie::build((cfg.cookie_name.clone(), token))
        .path("/")
        .http_only(true)
        .secure(cfg.cookie_secure)
        .same_site(SameSite::Lax)
        .max_age(ttl)
        .build()
}

fn cleared_cookie(cfg: &SessionConfig) -> Cookie<'static> {
    Cookie::build((cfg.cookie_name.clone(), ""))
        .path("/")
        .secure(cfg.cookie_secure)
        .build()
}

pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/signup", post(signup))
        .route("/login", post(login))
        .route("/logout", get(logout))
}

pub fn me_routes() -> Router<AppState> {
    Router::new()
        .route("/api/me", get(get_me).delete(delete_me))
        .route("/api/me/preferences", put(update_preferences))
}

#[instrument(skip(state, payload))]
pub async fn signup(
    State(state): State<AppState>,
    ApiJson(payload): ApiJson<SignupRequest>,
) -> Result<Json<MessageResponse>, ApiError> {
    services::register(&state.db, &payload.username, &payload.email, &payload.password).await?;
    Ok(Json(MessageResponse::ok("Account created successfully")))
}

#[instrument(skip(state, jar, payload))]
pub async fn login(
    State(state): State<AppState>,
    jar: CookieJar,
    ApiJson(payload): ApiJson<LoginRequest>,
) -> Result<(CookieJar, Json<LoginResponse>), ApiError> {
    let keys = JwtKeys::from_ref(&state);
    let (user, token) = services::login(&state.db, &keys, &payload.email, &payload.password).await?;

    let cookie = session_cookie(&state.config.session, token.clone(), keys.ttl);

    Ok((
        jar.add(cookie),
        Json(LoginResponse {
            success: true,
            message: "Login successful".into(),
            user: PublicUser::from(&user),
            token,
        }),
    ))
}

/// Ends the current session (if any) and sends the browser home.
#[instrument(skip(state, jar, headers))]
pub async fn logout(
    State(state): State<AppState>,
    jar: CookieJar,
    headers: HeaderMap,
) -> (CookieJar, Redirect) {
    if let Some(token) = session_token(&headers, &state.config.session.cookie_name) {
        let keys = JwtKeys::from_ref(&state);
        if let Err(e) = services::logout(&state.db, &keys, &token).await {
            error!(error = %e, "logout failed to delete session");
        }
    }
    (
        jar.remove(cleared_cookie(&state.config.session)),
        Redirect::to("/"),
    )
}

#[instrument(skip(state))]
pub async fn get_me(
    State(state): State<AppState>,
    caller: AuthUser,
) -> Result<Json<ProfileResponse>, ApiError> {
    let user = User::find_by_id(&state.db, caller.id)
        .await?
        .ok_or_else(|| ApiError::Unauthorized("User not found".into()))?;
    Ok(Json(ProfileResponse::from(user)))
}

#[instrument(skip(state, payload))]
pub async fn update_preferences(
    State(state): State<AppState>,
    caller: AuthUser,
    ApiJson(payload): ApiJson<PreferencesRequest>,
) -> Result<Json<MessageResponse>, ApiError> {
    let preferences = payload
        .preferences
        .as_deref()
        .map(str::trim)
        .filter(|p| !p.is_empty());
    if !User::update_preferences(&state.db, caller.id, preferences).await? {
        return Err(ApiError::Unauthorized("User not found".into()));
    }
    info!(user_id = caller.id, "preferences updated");
    Ok(Json(MessageResponse::ok("Preferences updated")))
}

/// Deletes the caller's account with all owned bookings, plans and reviews.
#[instrument(skip(state, jar))]
pub async fn delete_me(
    State(state): State<AppState>,
    jar: CookieJar,
    caller: AuthUser,
) -> Result<(CookieJar, Json<MessageResponse>), ApiError> {
    if !User::delete(&state.db, caller.id).await? {
        return Err(ApiError::Unauthorized("User not found".into()));
    }
    info!(user_id = caller.id, "account deleted");
    Ok((
        jar.remove(cleared_cookie(&state.config.session)),
        Json(MessageResponse::ok("Account deleted")),
    ))
}
