use std::{ops::RangeInclusive, str::FromStr};

use anyhow::Context;

/// Accepted token lifetimes, in minutes.
const JWT_TTL_RANGE: RangeInclusive<i64> = 1..=43_200;
const RESET_TTL_RANGE: RangeInclusive<i64> = 1..=10_080;

#[derive(Debug, Clone)]
pub struct JwtConfig {
    pub secret: String,
    pub issuer: String,
    pub audience: String,
    pub ttl_minutes: i64,
}

#[derive(Debug, Clone)]
pub struct CookieConfig {
    pub name: String,
    pub secure: bool,
}

#[derive(Debug, Clone)]
pub struct MailConfig {
    pub from: String,
    pub smtp_host: Option<String>,
    pub smtp_port: u16,
    pub smtp_user: Option<String>,
    pub smtp_password: Option<String>,
    pub smtp_use_tls: bool,
}

/// Length bounds applied to registration and profile updates.
#[derive(Debug, Clone)]
pub struct PolicyConfig {
    pub password_min_length: usize,
    pub password_max_length: usize,
    pub username_min_length: usize,
    pub username_max_length: usize,
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub app_name: String,
    pub host: String,
    pub port: u16,
    pub database_url: String,
    pub database_max_connections: u32,
    pub jwt: JwtConfig,
    pub cookie: CookieConfig,
    pub mail: MailConfig,
    pub policy: PolicyConfig,
    pub reset_token_ttl_minutes: i64,
    pub frontend_url: String,
    pub allowed_origins: Vec<String>,
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the config from an arbitrary key lookup so tests don't touch the process env.
    pub fn from_lookup<F>(lookup: F) -> anyhow::Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        let required = |key: &str| get(key).with_context(|| format!("{key} must be set"));

        let debug = parse_flag(&get, "DEBUG", false)?;
        let frontend_url = get("FRONTEND_URL")
            .unwrap_or_else(|| "http://localhost:3000".into())
            .trim_end_matches('/')
            .to_string();
        let allowed_origins = match get("ALLOWED_ORIGINS") {
            Some(list) => list
                .split(',')
                .map(|o| o.trim().to_string())
                .filter(|o| !o.is_empty())
                .collect(),
            None => vec![frontend_url.clone()],
        };

        let smtp_user = get("SMTP_USER");
        let mail = MailConfig {
            from: get("MAIL_FROM")
                .or_else(|| smtp_user.clone())
                .unwrap_or_else(|| "no-reply@scenario.local".into()),
            smtp_host: get("SMTP_HOST"),
            smtp_port: parse_or(&get, "SMTP_PORT", 587)?,
            smtp_user,
            smtp_password: get("SMTP_PASSWORD"),
            smtp_use_tls: parse_flag(&get, "SMTP_USE_TLS", true)?,
        };

        Ok(Self {
            app_name: get("APP_NAME").unwrap_or_else(|| "Scenario API".into()),
            host: get("APP_HOST").unwrap_or_else(|| "0.0.0.0".into()),
            port: parse_or(&get, "APP_PORT", 8080)?,
            database_url: required("DATABASE_URL")?,
            database_max_connections: parse_or(&get, "DATABASE_MAX_CONNECTIONS", 10)?,
            jwt: JwtConfig {
                secret: required("JWT_SECRET")?,
                issuer: get("JWT_ISSUER").unwrap_or_else(|| "scenario".into()),
                audience: get("JWT_AUDIENCE").unwrap_or_else(|| "scenario-users".into()),
                ttl_minutes: parse_in(&get, "JWT_TTL_MINUTES", 60, JWT_TTL_RANGE)?,
            },
            cookie: CookieConfig {
                name: get("AUTH_COOKIE_NAME").unwrap_or_else(|| "access_token".into()),
                secure: !debug,
            },
            mail,
            policy: PolicyConfig {
                password_min_length: parse_or(&get, "PASSWORD_MIN_LENGTH", 7)?,
                password_max_length: parse_or(&get, "PASSWORD_MAX_LENGTH", 30)?,
                username_min_length: parse_or(&get, "USERNAME_MIN_LENGTH", 5)?,
                username_max_length: parse_or(&get, "USERNAME_MAX_LENGTH", 30)?,
            },
            reset_token_ttl_minutes: parse_in(&get, "RESET_TOKEN_TTL_MINUTES", 30, RESET_TTL_RANGE)?,
            frontend_url,
            allowed_origins,
        })
    }

    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

fn parse_or<T, G>(get: &G, key: &str, default: T) -> anyhow::Result<T>
where
    T: FromStr,
    T::Err: std::fmt::Display,
    G: Fn(&str) -> Option<String>,
{
    match get(key) {
        Some(raw) => raw
            .trim()
            .parse::<T>()
            .map_err(|e| anyhow::anyhow!("invalid value for {key} ({raw:?}): {e}")),
        None => Ok(default),
    }
}

fn parse_in<G>(get: &G, key: &str, default: i64, range: RangeInclusive<i64>) -> anyhow::Result<i64>
where
    G: Fn(&str) -> Option<String>,
{
    let value = parse_or(get, key, default)?;
    anyhow::ensure!(
        range.contains(&value),
        "{key} must be between {} and {}, got {value}",
        range.start(),
        range.end()
    );
    Ok(value)
}

/// Accepts the usual dotenv spellings: true/false, 1/0, yes/no, on/off, any case.
fn parse_flag<G>(get: &G, key: &str, default: bool) -> anyhow::Result<bool>
where
    G: Fn(&str) -> Option<String>,
{
    let Some(raw) = get(key) else {
        return Ok(default);
    };
    match raw.trim().to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" | "on" => Ok(true),
        "false" | "0" | "no" | "off" => Ok(false),
        _ => anyhow::bail!("invalid value for {key} ({raw:?}): expected a boolean"),
    }
}
