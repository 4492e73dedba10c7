use anyhow::{Context, Result, bail};
use axum::http::HeaderValue;
use serde::Deserialize;
use std::fs;
use std::net::SocketAddr;

pub const DEFAULT_BIND: &str = "0.0.0.0:3000";
pub const DEFAULT_METRICS_BIND: &str = "0.0.0.0:9090";
pub const DEFAULT_SQLITE_URL: &str = "sqlite://data.sqlite";
pub const DEFAULT_SQLITE_MAX_CONNECTIONS: u32 = 4;

// Record store configuration sourced from environment variables, with an
// optional YAML override file.
#[derive(Debug, Clone)]
pub struct ApiConfig {
    pub bind_addr: SocketAddr,
    pub metrics_bind: SocketAddr,
    pub storage: StorageBackend,
    pub sqlite: SqliteConfig,
    pub allowed_origins: AllowedOrigins,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StorageBackend {
    Memory,
    Sqlite,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SqliteConfig {
    pub url: String,
    pub max_connections: u32,
}

/// Cross-origin policy for browser callers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AllowedOrigins {
    Any,
    List(Vec<HeaderValue>),
}

#[derive(Debug, Deserialize, Default)]
struct ApiConfigOverride {
    bind_addr: Option<String>,
    metrics_bind: Option<String>,
    storage: Option<StorageBackend>,
    sqlite_url: Option<String>,
    sqlite_max_connections: Option<u32>,
    allowed_origins: Option<Vec<String>>,
}

impl StorageBackend {
    pub fn parse(value: &str) -> Result<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "memory" => Ok(Self::Memory),
            "sqlite" => Ok(Self::Sqlite),
            other => bail!("unknown storage backend: {other}"),
        }
    }
}

impl AllowedOrigins {
    /// Parse `*` or a comma-separated list of origins.
    pub fn parse(value: &str) -> Result<Self> {
        let entries: Vec<&str> = value
            .split(',')
            .map(str::trim)
            .filter(|entry| !entry.is_empty())
            .collect();
        Self::from_entries(&entries)
    }

    pub fn from_entries<S: AsRef<str>>(entries: &[S]) -> Result<Self> {
        if entries.is_empty() || entries.iter().any(|entry| entry.as_ref() == "*") {
            return Ok(Self::Any);
        }
        let origins = entries
            .iter()
            .map(|entry| {
                let origin = entry.as_ref().trim_end_matches('/');
                HeaderValue::from_str(origin).with_context(|| format!("parse origin: {origin}"))
            })
            .collect::<Result<Vec<_>>>()?;
        Ok(Self::List(origins))
    }
}

impl ApiConfig {
    pub fn from_env() -> Result<Self> {
        let bind_addr = match std::env::var("ROSTER_API_BIND") {
            Ok(value) => value,
            Err(_) => match std::env::var("PORT") {
                Ok(port) => format!("0.0.0.0:{port}"),
                Err(_) => DEFAULT_BIND.to_string(),
            },
        }
        .parse()
        .with_context(|| "parse ROSTER_API_BIND")?;
        let metrics_bind = std::env::var("ROSTER_API_METRICS_BIND")
            .unwrap_or_else(|_| DEFAULT_METRICS_BIND.to_string())
            .parse()
            .with_context(|| "parse ROSTER_API_METRICS_BIND")?;
        let storage = match std::env::var("ROSTER_STORAGE_BACKEND") {
            Ok(value) => StorageBackend::parse(&value)?,
            Err(_) => StorageBackend::Sqlite,
        };
        let url =
            std::env::var("ROSTER_SQLITE_URL").unwrap_or_else(|_| DEFAULT_SQLITE_URL.to_string());
        let max_connections = match std::env::var("ROSTER_SQLITE_MAX_CONNECTIONS") {
            Ok(value) => value
                .parse()
                .with_context(|| "parse ROSTER_SQLITE_MAX_CONNECTIONS")?,
            Err(_) => DEFAULT_SQLITE_MAX_CONNECTIONS,
        };
        let allowed_origins = match std::env::var("ROSTER_ALLOWED_ORIGINS") {
            Ok(value) => AllowedOrigins::parse(&value)?,
            Err(_) => AllowedOrigins::Any,
        };
        Ok(Self {
            bind_addr,
            metrics_bind,
            storage,
            sqlite: SqliteConfig {
                url,
                max_connections,
            },
            allowed_origins,
        })
    }

    pub fn from_env_or_yaml() -> Result<Self> {
        let mut config = Self::from_env()?;
        if let Ok(path) = std::env::var("ROSTER_API_CONFIG") {
            let contents = fs::read_to_string(&path)
                .with_context(|| format!("read ROSTER_API_CONFIG: {path}"))?;
            config.apply_yaml(&contents)?;
        }
        Ok(config)
    }

    fn apply_yaml(&mut self, contents: &str) -> Result<()> {
        let override_cfg: ApiConfigOverride =
            serde_yaml::from_str(contents).with_context(|| "parse roster api config yaml")?;
        if let Some(value) = override_cfg.bind_addr {
            self.bind_addr = value.parse().with_context(|| "parse bind_addr")?;
        }
        if let Some(value) = override_cfg.metrics_bind {
            self.metrics_bind = value.parse().with_context(|| "parse metrics_bind")?;
        }
        if let Some(value) = override_cfg.storage {
            self.storage = value;
        }
        if let Some(value) = override_cfg.sqlite_url {
            self.sqlite.url = value;
        }
        if let Some(value) = override_cfg.sqlite_max_connections {
            self.sqlite.max_connections = value;
        }
        if let Some(entries) = override_cfg.allowed_origins {
            self.allowed_origins = AllowedOrigins::from_entries(&entries)?;
        }
        Ok(())
    }
}
