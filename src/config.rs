/*
 * Responsibility
 * - Load settings from the environment (.env supported): listen port, users, realm, ...
 * - Validate them (missing or malformed values abort startup)
 */
use std::fmt;
use std::net::SocketAddr;
use std::str::FromStr;
use std::time::Duration;

use basic_auth_gate::UserTable;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppEnv {
    Development,
    Production,
}

impl AppEnv {
    fn parse(value: Option<String>) -> Self {
        match value
            .unwrap_or_else(|| "development".to_string())
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

#[derive(Debug)]
pub enum ConfigError {
    Missing(&'static str),
    Invalid(&'static str),
    Gate(basic_auth_gate::ConfigError),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Missing(key) => write!(f, "missing configuration: {}", key),
            ConfigError::Invalid(key) => write!(f, "invalid configuration: {}", key),
            ConfigError::Gate(e) => write!(f, "invalid basic auth configuration: {}", e),
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::Gate(e) => Some(e),
            _ => None,
        }
    }
}

impl From<basic_auth_gate::ConfigError> for ConfigError {
    fn from(e: basic_auth_gate::ConfigError) -> Self {
        ConfigError::Gate(e)
    }
}

pub struct Config {
    pub addr: SocketAddr,
    pub app_env: AppEnv,

    pub request_timeout: Duration,
    pub body_limit_bytes: usize,

    pub users: UserTable,
    pub realm: Option<String>,
    pub challenge: bool,
    pub allow_empty_credentials: bool,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(var: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let port: u16 = var("PORT").and_then(|s| s.parse().ok()).unwrap_or(3000);

        let addr: SocketAddr = SocketAddr::from_str(&format!("0.0.0.0:{}", port))
            .map_err(|_| ConfigError::Invalid("PORT"))?;

        let app_env = AppEnv::parse(var("APP_ENV"));

        let request_timeout = Duration::from_secs(
            var("REQUEST_TIMEOUT_SECONDS")
                .and_then(|v| v.parse::<u64>().ok())
                .unwrap_or(30),
        );

        let body_limit_bytes = var("BODY_LIMIT_BYTES")
            .and_then(|v| v.parse::<usize>().ok())
            .unwrap_or(1024 * 1024);

        let users: UserTable = var("BASIC_AUTH_USERS")
            .ok_or(ConfigError::Missing("BASIC_AUTH_USERS"))?
            .parse()?;

        let realm = var("BASIC_AUTH_REALM")
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty());

        let challenge = flag(var("BASIC_AUTH_CHALLENGE"), "BASIC_AUTH_CHALLENGE", true)?;

        let allow_empty_credentials =
            flag(var("BASIC_AUTH_ALLOW_EMPTY"), "BASIC_AUTH_ALLOW_EMPTY", false)?;

        Ok(Self {
            addr,
            app_env,
            request_timeout,
            body_limit_bytes,
            users,
            realm,
            challenge,
            allow_empty_credentials,
        })
    }
}

fn flag(value: Option<String>, key: &'static str, default: bool) -> Result<bool, ConfigError> {
    let Some(value) = value else {
        return Ok(default);
    };
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(ConfigError::Invalid(key)),
    }
}
