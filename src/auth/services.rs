use rand::{distributions::Alphanumeric, rngs::OsRng, Rng};
use sha2::{Digest, Sha256};
use time::{Duration, OffsetDateTime};
use tracing::{info, warn};
use uuid::Uuid;

use super::{
    dto::{LoginRequest, RegisterRequest, ResetPasswordRequest},
    jwt::JwtKeys,
    password::{hash_password, verify_dummy, verify_password},
    repo_types::{NewUser, User},
};
use crate::{
    error::{AppError, AppResult},
    mail::password_reset_mail,
    state::AppState,
    validation::{normalize_email, validate_new_password, validate_username},
};

const RESET_TOKEN_LEN: usize = 48;

pub async fn register(state: &AppState, req: RegisterRequest) -> AppResult<User> {
    let policy = &state.config.policy;
    let username = validate_username(&req.username, policy)?;
    let email = normalize_email(&req.email)?;
    validate_new_password(&req.password, &req.confirm_password, policy)?;

    if state.users.find_by_email(&email).await?.is_some() {
        warn!(email = %email, "email already registered");
        return Err(AppError::Conflict("Email already registered".into()));
    }

    let password_hash = hash_password(&req.password)?;
    // The unique constraints still catch a concurrent registration that slips past the lookup.
    let user = state
        .users
        .create(NewUser {
            username,
            email,
            password_hash,
        })
        .await?;

    info!(user_id = %user.id, "user registered");
    Ok(user)
}

/// Verifies credentials and returns the user together with a freshly signed access token.
pub async fn login(state: &AppState, req: LoginRequest) -> AppResult<(User, String)> {
    let email = normalize_email(&req.email).map_err(|_| AppError::InvalidCredentials)?;

    let Some(user) = state.users.find_by_email(&email).await? else {
        verify_dummy(&req.password);
        warn!(email = %email, "login unknown email");
        return Err(AppError::InvalidCredentials);
    };

    if !verify_password(&req.password, &user.password_hash)? {
        warn!(user_id = %user.id, "login invalid password");
        return Err(AppError::InvalidCredentials);
    }

    let token = JwtKeys::from_config(&state.config.jwt).sign(user.id)?;
    info!(user_id = %user.id, "user logged in");
    Ok((user, token))
}

pub async fn request_password_reset(state: &AppState, email: &str) -> AppResult<()> {
    let email = normalize_email(email)?;
    let user = state
        .users
        .find_by_email(&email)
        .await?
        .ok_or_else(|| AppError::not_found("User"))?;

    let token = generate_reset_token();
    let expires_at =
        OffsetDateTime::now_utc() + Duration::minutes(state.config.reset_token_ttl_minutes);
    state
        .users
        .set_reset_token(user.id, &hash_reset_token(&token), expires_at)
        .await?;

    let link = format!("{}/reset-password/{}", state.config.frontend_url, token);
    state
        .mailer
        .send(password_reset_mail(&user.email, &user.username, &link))
        .await
        .map_err(|e| AppError::Mail(e.to_string()))?;

    info!(user_id = %user.id, "password reset requested");
    Ok(())
}

pub async fn reset_password(state: &AppState, req: ResetPasswordRequest) -> AppResult<Uuid> {
    validate_new_password(&req.password, &req.confirm_password, &state.config.policy)?;

    let token_hash = hash_reset_token(req.token.trim());
    let user = state
        .users
        .find_by_reset_token(&token_hash)
        .await?
        .ok_or(AppError::InvalidResetToken)?;

    if user.reset_token_expired(OffsetDateTime::now_utc()) {
        state.users.clear_reset_token(user.id).await?;
        warn!(user_id = %user.id, "expired reset token presented");
        return Err(AppError::ExpiredResetToken);
    }

    let password_hash = hash_password(&req.password)?;
    if !state
        .users
        .consume_reset_token(&token_hash, &password_hash)
        .await?
    {
        // Lost a race with another reset using the same token.
        return Err(AppError::InvalidResetToken);
    }

    info!(user_id = %user.id, "password reset completed");
    Ok(user.id)
}

pub(crate) fn generate_reset_token() -> String {
    OsRng
        .sample_iter(&Alphanumeric)
        .take(RESET_TOKEN_LEN)
        .map(char::from)
        .collect()
}

pub(crate) fn hash_reset_token(token: &str) -> String {
    format!("{:x}", Sha256::digest(token.as_bytes()))
}
