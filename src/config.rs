/*
 * Responsibility
 * - Load settings from the environment (DATABASE_URL, CORS allow-list, auth secret)
 * - Validate values up front (missing or malformed settings fail start-up)
 */
use std::fmt;
use std::net::SocketAddr;
use std::str::FromStr;

use axum::http::HeaderValue;

use crate::middleware::cors::OriginPattern;

pub const DEFAULT_PREVIEW_ORIGIN_PATTERN: &str = "https://linkbin-*.vercel.app";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppEnv {
    Development,
    Production,
}

impl AppEnv {
    pub fn from_value(value: Option<&str>) -> Self {
        match value
            .unwrap_or("development")
            .trim()
            .to_ascii_lowercase()
            .as_str()
        {
            "production" | "prod" => Self::Production,
            _ => Self::Development,
        }
    }

    pub fn is_production(&self) -> bool {
        matches!(self, Self::Production)
    }
}

#[derive(Debug, PartialEq, Eq)]
pub enum ConfigError {
    Missing(&'static str),
    Invalid(&'static str),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Missing(key) => write!(f, "missing configuration: {}", key),
            ConfigError::Invalid(key) => write!(f, "invalid configuration: {}", key),
        }
    }
}

impl std::error::Error for ConfigError {}

#[derive(Clone)]
pub struct Config {
    pub addr: SocketAddr,
    pub app_env: AppEnv,

    pub database_url: String,
    pub database_max_connections: u32,
    pub database_run_migrations: bool,

    /// `None` means "use the built-in defaults".
    pub cors_allowed_origins: Option<Vec<HeaderValue>>,
    pub cors_preview_origin: Option<OriginPattern>,

    /// Shared HS256 secret. Without it bearer tokens are decoded but not verified.
    pub auth_jwt_secret: Option<String>,
}

// DATABASE_URL and the secret carry credentials
impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("addr", &self.addr)
            .field("app_env", &self.app_env)
            .field("database_max_connections", &self.database_max_connections)
            .field("database_run_migrations", &self.database_run_migrations)
            .field("cors_allowed_origins", &self.cors_allowed_origins)
            .field("cors_preview_origin", &self.cors_preview_origin)
            .field("verify_tokens", &self.auth_jwt_secret.is_some())
            .finish()
    }
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same parsing as [`Config::from_env`], over an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let port: u16 = match lookup("PORT") {
            Some(v) => v.trim().parse().map_err(|_| ConfigError::Invalid("PORT"))?,
            None => 3000,
        };

        let addr: SocketAddr = SocketAddr::from_str(&format!("0.0.0.0:{}", port))
            .map_err(|_| ConfigError::Invalid("PORT"))?;

        let app_env = AppEnv::from_value(lookup("APP_ENV").as_deref());

        let database_url = lookup("DATABASE_URL")
            .filter(|v| !v.trim().is_empty())
            .ok_or(ConfigError::Missing("DATABASE_URL"))?;

        let database_max_connections = match lookup("DATABASE_MAX_CONNECTIONS") {
            Some(v) => v
                .trim()
                .parse::<u32>()
                .ok()
                .filter(|n| *n > 0)
                .ok_or(ConfigError::Invalid("DATABASE_MAX_CONNECTIONS"))?,
            None => 5,
        };

        let database_run_migrations = match lookup("DATABASE_RUN_MIGRATIONS") {
            Some(v) => parse_bool(&v).ok_or(ConfigError::Invalid("DATABASE_RUN_MIGRATIONS"))?,
            None => false,
        };

        let cors_allowed_origins = match lookup("CORS_ALLOWED_ORIGINS") {
            Some(raw) => {
                let origins = raw
                    .split(',')
                    .map(|s| s.trim().trim_end_matches('/'))
                    .filter(|s| !s.is_empty())
                    .map(HeaderValue::from_str)
                    .collect::<Result<Vec<_>, _>>()
                    .map_err(|_| ConfigError::Invalid("CORS_ALLOWED_ORIGINS"))?;
                Some(origins).filter(|origins| !origins.is_empty())
            }
            None => None,
        };

        let cors_preview_origin = match lookup("CORS_PREVIEW_ORIGIN_PATTERN") {
            Some(v) if v.trim().is_empty() => None,
            Some(v) => Some(
                OriginPattern::parse(v.trim())
                    .map_err(|_| ConfigError::Invalid("CORS_PREVIEW_ORIGIN_PATTERN"))?,
            ),
            None => Some(
                OriginPattern::parse(DEFAULT_PREVIEW_ORIGIN_PATTERN)
                    .map_err(|_| ConfigError::Invalid("CORS_PREVIEW_ORIGIN_PATTERN"))?,
            ),
        };

        let auth_jwt_secret = lookup("AUTH_JWT_SECRET").filter(|s| !s.is_empty());

        Ok(Self {
            addr,
            app_env,
            database_url,
            database_max_connections,
            database_run_migrations,
            cors_allowed_origins,
            cors_preview_origin,
            auth_jwt_secret,
        })
    }
}

fn parse_bool(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}
