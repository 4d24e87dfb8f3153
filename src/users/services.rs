use tracing::{info, warn};
use uuid::Uuid;

use super::dto::UpdateUserRequest;
use crate::{
    auth::{
        password::hash_password,
        repo_types::{User, UserChanges},
    },
    error::{AppError, AppResult},
    state::AppState,
    validation::{normalize_email, required_text, validate_new_password, validate_username},
};

const BANNER_MAX_LEN: usize = 2048;

/// Fails with 404 unless `user_id` names a live account.
pub async fn ensure_user_exists(state: &AppState, user_id: Uuid) -> AppResult<User> {
    state
        .users
        .find_by_id(user_id)
        .await?
        .ok_or_else(|| AppError::not_found("User"))
}

fn ensure_self(caller: Uuid, target: Uuid) -> AppResult<()> {
    if caller != target {
        warn!(caller = %caller, target = %target, "attempt to modify another user");
        return Err(AppError::forbidden("Not authorized to modify this user"));
    }
    Ok(())
}

async fn apply(state: &AppState, caller: Uuid, target: Uuid, changes: UserChanges) -> AppResult<()> {
    ensure_self(caller, target)?;
    ensure_user_exists(state, target).await?;
    if changes.is_empty() {
        return Ok(());
    }
    if !state.users.update(target, changes).await? {
        return Err(AppError::not_found("User"));
    }
    info!(user_id = %target, "user updated");
    Ok(())
}

pub async fn update_profile(
    state: &AppState,
    caller: Uuid,
    target: Uuid,
    req: UpdateUserRequest,
) -> AppResult<()> {
    let policy = &state.config.policy;
    let username = req
        .username
        .as_deref()
        .map(|u| validate_username(u, policy))
        .transpose()?;
    let email = req.email.as_deref().map(normalize_email).transpose()?;
    let password_hash = match req.password.as_deref() {
        Some(pw) => {
            let confirm = req.confirm_password.as_deref().unwrap_or_default();
            validate_new_password(pw, confirm, policy)?;
            Some(hash_password(pw)?)
        }
        None => None,
    };

    apply(
        state,
        caller,
        target,
        UserChanges {
            username,
            email,
            password_hash,
            profile_banner: None,
        },
    )
    .await
}

pub async fn update_email(state: &AppState, caller: Uuid, target: Uuid, email: &str) -> AppResult<()> {
    let email = normalize_email(email)?;
    apply(
        state,
        caller,
        target,
        UserChanges {
            email: Some(email),
            ..Default::default()
        },
    )
    .await
}

pub async fn update_password(
    state: &AppState,
    caller: Uuid,
    target: Uuid,
    password: &str,
    confirm_password: &str,
) -> AppResult<()> {
    validate_new_password(password, confirm_password, &state.config.policy)?;
    apply(
        state,
        caller,
        target,
        UserChanges {
            password_hash: Some(hash_password(password)?),
            ..Default::default()
        },
    )
    .await
}

pub async fn update_banner(state: &AppState, caller: Uuid, target: Uuid, banner: &str) -> AppResult<()> {
    let banner = required_text("profile_banner", banner, BANNER_MAX_LEN)?;
    apply(
        state,
        caller,
        target,
        UserChanges {
            profile_banner: Some(banner),
            ..Default::default()
        },
    )
    .await
}

pub async fn delete(state: &AppState, caller: Uuid, target: Uuid) -> AppResult<()> {
    ensure_self(caller, target)?;
    if !state.users.delete(target).await? {
        return Err(AppError::not_found("User"));
    }
    info!(user_id = %target, "user deleted");
    Ok(())
}
