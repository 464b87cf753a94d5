//! Service configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Required
//! - `SESSION_SECRET` - Session token signing key (min 32 chars)
//!
//! ## Optional
//! - `DATABASE_URL` - `PostgreSQL` connection string; in-memory store when unset
//! - `PORT` - Listen port (default: 8083)
//! - `NATS_URL` - NATS server for order confirmations
//! - `TOKEN_TTL_SECONDS` - Session token lifetime (default: 86400)
//! - `REFRESH_TTL_SECONDS` - Refresh token lifetime (default: 604800)
//! - `NOTIFY_TIMEOUT_SECONDS` - Bound on a confirmation attempt (default: 10)

use secrecy::SecretString;
use std::time::Duration;
use thiserror::Error;

const MIN_SESSION_SECRET_LENGTH: usize = 32;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Signing key and lifetimes for the session issuer.
#[derive(Debug, Clone)]
pub struct SessionConfig {
    pub session_secret: SecretString,
    pub token_ttl_seconds: i64,
    pub refresh_ttl_seconds: i64,
}

impl SessionConfig {
    pub fn new(session_secret: impl Into<String>) -> Self {
        Self {
            session_secret: SecretString::from(session_secret.into()),
            token_ttl_seconds: 24 * 60 * 60,
            refresh_ttl_seconds: 7 * 24 * 60 * 60,
        }
    }
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub database_url: Option<SecretString>,
    pub port: u16,
    pub nats_url: Option<String>,
    pub session: SessionConfig,
    pub notify_timeout: Duration,
}

impl AppConfig {
    /// Load configuration from the process environment, reading `.env` first
    /// if present.
    pub fn from_env() -> Result<Self, ConfigError> {
        let _ = dotenvy::dotenv();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let optional = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let secret = optional("SESSION_SECRET").ok_or_else(|| ConfigError::MissingEnvVar("SESSION_SECRET".into()))?;
        if secret.len() < MIN_SESSION_SECRET_LENGTH {
            return Err(ConfigError::InvalidEnvVar(
                "SESSION_SECRET".into(),
                format!("must be at least {MIN_SESSION_SECRET_LENGTH} characters"),
            ));
        }

        let mut session = SessionConfig::new(secret);
        session.token_ttl_seconds = parse_or(&optional, "TOKEN_TTL_SECONDS", session.token_ttl_seconds)?;
        session.refresh_ttl_seconds = parse_or(&optional, "REFRESH_TTL_SECONDS", session.refresh_ttl_seconds)?;

        Ok(Self {
            database_url: optional("DATABASE_URL").map(SecretString::from),
            port: parse_or(&optional, "PORT", 8083)?,
            nats_url: optional("NATS_URL"),
            session,
            notify_timeout: Duration::from_secs(parse_or(&optional, "NOTIFY_TIMEOUT_SECONDS", 10)?),
        })
    }
}

fn parse_or<T>(lookup: &impl Fn(&str) -> Option<String>, key: &str, default: T) -> Result<T, ConfigError>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    match lookup(key) {
        Some(raw) => raw.trim().parse().map_err(|e: T::Err| ConfigError::InvalidEnvVar(key.into(), e.to_string())),
        None => Ok(default),
    }
}
