//! # Configuration
//!
//! Runtime configuration is read from environment variables:
//!
//! | Variable             | Default | Meaning |
//! |----------------------|---------|---------|
//! | `PORT`               | `8080`  | HTTP listen port |
//! | `DATABASE_URL`       | unset   | Postgres URL; unset means in-memory storage |
//! | `DB_MAX_CONNECTIONS` | `10`    | Connection pool size |
//! | `PAGE_SIZE`          | `10`    | Receivers per list page, `1..=100` |
//! | `LOG_FORMAT`         | `text`  | `text` or `json` |
//!
//! Values that fail to parse fall back to the default with a warning.

use std::str::FromStr;

/// Upper bound accepted for `PAGE_SIZE`.
pub const MAX_PAGE_SIZE: u32 = 100;

/// Output format of the tracing subscriber.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LogFormat {
    #[default]
    Text,
    Json,
}

impl FromStr for LogFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "text" | "" => Ok(Self::Text),
            "json" => Ok(Self::Json),
            other => Err(format!("unknown log format {other:?}")),
        }
    }
}

/// Application configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    pub port: u16,
    pub database_url: Option<String>,
    pub db_max_connections: u32,
    pub page_size: u32,
    pub log_format: LogFormat,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            port: 8080,
            database_url: None,
            db_max_connections: 10,
            page_size: 10,
            log_format: LogFormat::Text,
        }
    }
}

impl AppConfig {
    /// Build configuration from the process environment.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build configuration from an arbitrary variable source.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();

        let page_size = parse_or(&lookup, "PAGE_SIZE", defaults.page_size);
        let page_size = if (1..=MAX_PAGE_SIZE).contains(&page_size) {
            page_size
        } else {
            tracing::warn!(
                page_size,
                max = MAX_PAGE_SIZE,
                "PAGE_SIZE out of range, using default"
            );
            defaults.page_size
        };

        Self {
            port: parse_or(&lookup, "PORT", defaults.port),
            database_url: lookup("DATABASE_URL").filter(|url| !url.trim().is_empty()),
            db_max_connections: parse_or(&lookup, "DB_MAX_CONNECTIONS", defaults.db_max_connections),
            page_size,
            log_format: parse_or(&lookup, "LOG_FORMAT", defaults.log_format),
        }
    }
}

fn parse_or<T>(lookup: &impl Fn(&str) -> Option<String>, key: &str, default: T) -> T
where
    T: FromStr,
{
    match lookup(key) {
        None => default,
        Some(raw) => match raw.trim().parse() {
            Ok(value) => value,
            Err(_) => {
                tracing::warn!(variable = key, value = %raw, "unparseable value, using default");
                default
            }
        },
    }
}

/// Install the global tracing subscriber.
///
/// The filter comes from `RUST_LOG` and defaults to `info`.
pub fn init_tracing(format: LogFormat) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));

    match format {
        LogFormat::Text => tracing_subscriber::fmt().with_env_filter(filter).init(),
        LogFormat::Json => tracing_subscriber::fmt()
            .json()
            .with_env_filter(filter)
            .init(),
    }
}
