use lazy_static::lazy_static;
use regex::Regex;
use time::{macros::format_description, Date};

use crate::{
    config::PolicyConfig,
    error::{AppError, AppResult},
};

const SPECIAL_CHARACTERS: &str = "!@#$%^&*()-+";

/// Trims and lower-cases an email, rejecting anything that doesn't look like an address.
pub fn normalize_email(raw: &str) -> AppResult<String> {
    lazy_static! {
        static ref EMAIL_RE: Regex =
            Regex::new(r"^[a-zA-Z0-9._%+-]+@[a-zA-Z0-9.-]+\.[a-zA-Z]{2,}$").unwrap();
    }
    let email = raw.trim().to_lowercase();
    if email.len() > 255 || !EMAIL_RE.is_match(&email) {
        return Err(AppError::validation("Invalid email"));
    }
    Ok(email)
}

pub fn validate_username(raw: &str, policy: &PolicyConfig) -> AppResult<String> {
    let username = raw.trim();
    let len = username.chars().count();
    if len < policy.username_min_length || len > policy.username_max_length {
        return Err(AppError::validation(format!(
            "Username must be between {} and {} characters",
            policy.username_min_length, policy.username_max_length
        )));
    }
    Ok(username.to_string())
}

pub fn validate_password(password: &str, policy: &PolicyConfig) -> AppResult<()> {
    let len = password.chars().count();
    if len < policy.password_min_length || len > policy.password_max_length {
        return Err(AppError::validation(format!(
            "Password must be between {} and {} characters",
            policy.password_min_length, policy.password_max_length
        )));
    }
    if !password.chars().any(|c| c.is_ascii_digit()) {
        return Err(AppError::validation("Password must contain at least one digit."));
    }
    if !password.chars().any(char::is_uppercase) {
        return Err(AppError::validation(
            "Password must contain at least one uppercase letter.",
        ));
    }
    if !password.chars().any(char::is_lowercase) {
        return Err(AppError::validation(
            "Password must contain at least one lowercase letter.",
        ));
    }
    if !password.chars().any(|c| SPECIAL_CHARACTERS.contains(c)) {
        return Err(AppError::validation(
            "Password must contain at least one special character.",
        ));
    }
    Ok(())
}

pub fn validate_new_password(
    password: &str,
    confirm_password: &str,
    policy: &PolicyConfig,
) -> AppResult<()> {
    validate_password(password, policy)?;
    if password != confirm_password {
        return Err(AppError::validation("Passwords do not match"));
    }
    Ok(())
}

pub fn required_text(field: &str, value: &str, max_len: usize) -> AppResult<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(AppError::validation(format!("{field} must not be empty")));
    }
    if trimmed.chars().count() > max_len {
        return Err(AppError::validation(format!(
            "{field} must be at most {max_len} characters"
        )));
    }
    Ok(trimmed.to_string())
}

/// Parses a `YYYY-MM-DD` release date.
pub fn parse_release_date(raw: &str) -> AppResult<Date> {
    Date::parse(raw.trim(), format_description!("[year]-[month]-[day]"))
        .map_err(|_| AppError::validation("release_date must be formatted as YYYY-MM-DD"))
}

pub fn validate_runtime(runtime: Option<i32>) -> AppResult<Option<i32>> {
    match runtime {
        Some(minutes) if minutes < 0 => Err(AppError::validation("runtime must not be negative")),
        other => Ok(other),
    }
}

#[cfg(test)]
pub(crate) fn test_policy() -> PolicyConfig {
    PolicyConfig {
        password_min_length: 7,
        password_max_length: 30,
        username_min_length: 5,
        username_max_length: 30,
    }
}
