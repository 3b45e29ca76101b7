//! Runtime configuration read from environment variables.
//!
//! `main` calls `dotenv` first, so a `.env` file in the working directory works too.

use sqlx::postgres::PgConnectOptions;
use std::env;
use std::time::Duration;

/// Failures while reading configuration.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{0} must be set")]
    Missing(&'static str),
    #[error("{name} has an invalid value '{value}'")]
    Invalid { name: &'static str, value: String },
}

pub struct Config {
    /// Environment name; `local` turns on debug logging.
    pub environment: String,
    pub server_host: String,
    pub server_port: u16,
    /// Time a client has to send its request.
    pub request_timeout: Duration,
    /// Keep-alive for idle connections.
    pub idle_timeout: Duration,
    pub database: DatabaseConfig,
    pub jwt: JwtConfig,
}

/// Where the relational store lives.
pub struct DatabaseConfig {
    /// Full connection string; takes precedence over the individual parts.
    pub url: Option<String>,
    pub user: String,
    pub password: String,
    pub host: String,
    pub port: u16,
    pub name: String,
    pub max_connections: u32,
}

pub struct JwtConfig {
    pub secret: String,
    pub token_ttl: chrono::Duration,
    pub bcrypt_cost: u32,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Builds the configuration from any variable source.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |name: &'static str, default: &str| {
            lookup(name).unwrap_or_else(|| default.to_string())
        };
        let required = |name: &'static str| lookup(name).ok_or(ConfigError::Missing(name));

        let url = lookup("DATABASE_URL");
        // credentials are only needed when no full connection string is given
        let (user, password) = if url.is_some() {
            (var("DB_USER", ""), var("DB_PASSWORD", ""))
        } else {
            (required("DB_USER")?, required("DB_PASSWORD")?)
        };

        let token_ttl = parse_duration("TOKEN_TTL", &var("TOKEN_TTL", "24h"))?;
        let token_ttl = chrono::Duration::from_std(token_ttl).map_err(|_| ConfigError::Invalid {
            name: "TOKEN_TTL",
            value: var("TOKEN_TTL", "24h"),
        })?;

        Ok(Self {
            environment: var("ENV", "local"),
            server_host: var("SERVER_HOST", "127.0.0.1"),
            server_port: parse_number("PORT", &var("PORT", "8080"))?,
            request_timeout: parse_duration("TIMEOUT", &var("TIMEOUT", "10s"))?,
            idle_timeout: parse_duration("IDLE_TIMEOUT", &var("IDLE_TIMEOUT", "60s"))?,
            database: DatabaseConfig {
                url,
                user,
                password,
                host: var("DB_HOST", "localhost"),
                port: parse_number("DB_PORT", &var("DB_PORT", "5432"))?,
                name: var("DB_NAME", "todo"),
                max_connections: parse_number(
                    "DB_MAX_CONNECTIONS",
                    &var("DB_MAX_CONNECTIONS", "10"),
                )?,
            },
            jwt: JwtConfig {
                secret: required("JWT_SECRET")?,
                token_ttl,
                bcrypt_cost: parse_number("BCRYPT_COST", &var("BCRYPT_COST", "12"))?,
            },
        })
    }

    pub fn server_url(&self) -> String {
        format!("http://{}:{}", self.server_host, self.server_port)
    }

    pub fn is_local(&self) -> bool {
        self.environment == "local"
    }
}

impl DatabaseConfig {
    /// Connection options for the pool, from `url` if present, else from the parts.
    pub fn connect_options(&self) -> Result<PgConnectOptions, sqlx::Error> {
        match &self.url {
            Some(url) => url.parse(),
            None => Ok(PgConnectOptions::new()
                .host(&self.host)
                .port(self.port)
                .username(&self.user)
                .password(&self.password)
                .database(&self.name)),
        }
    }
}

fn parse_number<T: std::str::FromStr>(name: &'static str, value: &str) -> Result<T, ConfigError> {
    value.trim().parse().map_err(|_| ConfigError::Invalid {
        name,
        value: value.to_string(),
    })
}

/// Parses durations such as `500ms`, `10s`, `1h30m` or `24h`.
fn parse_duration(name: &'static str, value: &str) -> Result<Duration, ConfigError> {
    humantime::parse_duration(value.trim()).map_err(|_| ConfigError::Invalid {
        name,
        value: value.to_string(),
    })
}
