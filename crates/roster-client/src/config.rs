// Client configuration: where the roster API lives.
//
// Resolution order for the base URL, highest first:
//   explicit value (CLI flag) > ROSTER_API_BASE > YAML file > default.
// The YAML file is named by `--config` or ROSTER_CLIENT_CONFIG.
use anyhow::{Context, Result, bail};
use reqwest::Url;
use roster_common::PEOPLE_PATH;
use serde::Deserialize;
use std::fs;

pub const DEFAULT_API_BASE: &str = "http://localhost:3000";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    base_url: String,
}

#[derive(Debug, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
struct ClientConfigOverride {
    base_url: Option<String>,
}

impl ClientConfig {
    pub fn from_env_or_yaml(explicit: Option<&str>, config_path: Option<&str>) -> Result<Self> {
        let mut base = DEFAULT_API_BASE.to_string();

        let override_path = config_path
            .map(|value| value.to_string())
            .or_else(|| std::env::var("ROSTER_CLIENT_CONFIG").ok());
        if let Some(path) = override_path.as_deref() {
            let contents = fs::read_to_string(path)
                .with_context(|| format!("read client config: {path}"))?;
            let override_cfg: ClientConfigOverride =
                serde_yaml::from_str(&contents).context("parse client config yaml")?;
            if let Some(value) = override_cfg.base_url {
                base = value;
            }
        }
        if let Ok(value) = std::env::var("ROSTER_API_BASE")
            && !value.trim().is_empty()
        {
            base = value;
        }
        if let Some(value) = explicit {
            base = value.to_string();
        }
        Self::new(&base)
    }

    /// Validate and normalize a base URL. A trailing slash is dropped.
    pub fn new(base_url: &str) -> Result<Self> {
        let trimmed = base_url.trim().trim_end_matches('/');
        let parsed = Url::parse(trimmed).with_context(|| format!("invalid api base: {trimmed}"))?;
        match parsed.scheme() {
            "http" | "https" => {}
            other => bail!("api base must be http or https, got {other}"),
        }
        if parsed.host_str().is_none() {
            bail!("api base has no host: {trimmed}");
        }
        Ok(Self {
            base_url: trimmed.to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn people_url(&self) -> String {
        format!("{}{}", self.base_url, PEOPLE_PATH)
    }

    pub fn person_url(&self, id: i64) -> String {
        format!("{}{}/{}", self.base_url, PEOPLE_PATH, id)
    }
}
