//! Process settings read from the environment once at startup and passed to
//! the components that need them.

use crate::error::ConfigError;
use sqlx::postgres::PgConnectOptions;
use std::str::FromStr;
use std::time::Duration;

#[derive(Clone, Debug)]
pub struct Settings {
    pub project_name: String,
    /// Prefix for resource routes, e.g. `/api/v1`. Empty mounts them at the root.
    pub api_prefix: String,
    pub api_port: u16,
    /// When set, used as-is instead of the `POSTGRES_*` parts.
    pub database_url: Option<String>,
    pub postgres_user: Option<String>,
    pub postgres_password: Option<String>,
    pub postgres_db: Option<String>,
    pub postgres_host: String,
    pub postgres_port: u16,
    pub db_max_connections: u32,
    /// Fixed delay between startup connection attempts.
    pub db_retry_delay: Duration,
    /// `None` retries forever.
    pub db_max_attempts: Option<u32>,
    /// Create the database at startup when it is missing.
    pub db_create_if_missing: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Settings {
            project_name: "contacts-api".into(),
            api_prefix: "/api/v1".into(),
            api_port: 8000,
            database_url: None,
            postgres_user: None,
            postgres_password: None,
            postgres_db: None,
            postgres_host: "localhost".into(),
            postgres_port: 5432,
            db_max_connections: 5,
            db_retry_delay: Duration::from_secs(1),
            db_max_attempts: None,
            db_create_if_missing: true,
        }
    }
}

impl Settings {
    /// Read settings from the process environment. Call `dotenvy::dotenv()` first to pick up `.env`.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Read settings through `lookup`; blank values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |name: &str| {
            lookup(name)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };
        let mut settings = Settings::default();

        if let Some(name) = get("PROJECT_NAME") {
            settings.project_name = name;
        }
        if let Some(prefix) = get("API_V1_STR") {
            settings.api_prefix = normalize_prefix(&prefix)?;
        }
        if let Some(port) = get("API_PORT") {
            settings.api_port = parse_num("API_PORT", &port)?;
        }
        settings.database_url = get("DATABASE_URL");
        settings.postgres_user = get("POSTGRES_USER");
        settings.postgres_password = get("POSTGRES_PASSWORD");
        settings.postgres_db = get("POSTGRES_DB");
        if let Some(host) = get("POSTGRES_HOST") {
            settings.postgres_host = host;
        }
        if let Some(port) = get("POSTGRES_PORT") {
            settings.postgres_port = parse_num("POSTGRES_PORT", &port)?;
        }
        if let Some(n) = get("DB_MAX_CONNECTIONS") {
            settings.db_max_connections = parse_num("DB_MAX_CONNECTIONS", &n)?;
        }
        if let Some(ms) = get("DB_RETRY_DELAY_MS") {
            settings.db_retry_delay = Duration::from_millis(parse_num("DB_RETRY_DELAY_MS", &ms)?);
        }
        if let Some(n) = get("DB_MAX_ATTEMPTS") {
            let n: u32 = parse_num("DB_MAX_ATTEMPTS", &n)?;
            settings.db_max_attempts = (n > 0).then_some(n);
        }
        if let Some(flag) = get("DB_CREATE_IF_MISSING") {
            settings.db_create_if_missing = parse_bool("DB_CREATE_IF_MISSING", &flag)?;
        }

        // Fail at startup rather than on first connect.
        settings.connect_options()?;
        Ok(settings)
    }

    /// Connection options for the application database.
    pub fn connect_options(&self) -> Result<PgConnectOptions, ConfigError> {
        if let Some(url) = &self.database_url {
            return PgConnectOptions::from_str(url).map_err(|e| ConfigError::DatabaseUrl(e.to_string()));
        }
        let user = self.postgres_user.as_deref().ok_or(ConfigError::Missing("POSTGRES_USER"))?;
        let db = self.postgres_db.as_deref().ok_or(ConfigError::Missing("POSTGRES_DB"))?;
        let mut options = PgConnectOptions::new()
            .host(&self.postgres_host)
            .port(self.postgres_port)
            .username(user)
            .database(db);
        if let Some(password) = &self.postgres_password {
            options = options.password(password);
        }
        Ok(options)
    }

    /// Options the startup probe connects with. When the database may still need
    /// creating, the probe targets the server's `postgres` database instead.
    pub fn probe_options(&self) -> Result<PgConnectOptions, ConfigError> {
        let options = self.connect_options()?;
        Ok(if self.db_create_if_missing {
            options.database("postgres")
        } else {
            options
        })
    }
}

fn normalize_prefix(raw: &str) -> Result<String, ConfigError> {
    if !raw.starts_with('/') {
        return Err(ConfigError::Invalid {
            name: "API_V1_STR",
            reason: format!("must start with '/': {}", raw),
        });
    }
    Ok(raw.trim_end_matches('/').to_string())
}

fn parse_num<T>(name: &'static str, value: &str) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    value.parse::<T>().map_err(|e| ConfigError::Invalid {
        name,
        reason: format!("{}: {}", value, e),
    })
}

fn parse_bool(name: &'static str, value: &str) -> Result<bool, ConfigError> {
    match value.to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" => Ok(true),
        "false" | "0" | "no" => Ok(false),
        _ => Err(ConfigError::Invalid {
            name,
            reason: format!("expected a boolean: {}", value),
        }),
    }
}
