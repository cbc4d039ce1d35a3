use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

/// Environment variable overriding `api_base_url`.
pub const ENV_API_BASE: &str = "INTERVIEW_API_BASE";
/// Environment variable overriding `session_cookie`.
pub const ENV_SESSION_COOKIE: &str = "INTERVIEW_SESSION_COOKIE";

const DEFAULT_CLIENT_YAML: &str = include_str!("../client.yaml");

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct ClientConfig {
    /// Backend root. All endpoints are resolved relative to it.
    pub api_base_url: String,
    /// Sent verbatim as the `Cookie` header.
    #[serde(default)]
    pub session_cookie: Option<String>,
    /// Unset means the session check waits as long as the backend takes.
    #[serde(default)]
    pub session_check_timeout_secs: Option<u64>,
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
    #[serde(default)]
    pub monitor: MonitorConfig,
    #[serde(default = "default_tick_rate_ms")]
    pub tick_rate_ms: u64,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct MonitorConfig {
    #[serde(default = "default_true")]
    pub enabled: bool,
    /// Placeholder delay before the stream surface is shown.
    #[serde(default = "default_grace_ms")]
    pub grace_ms: u64,
}

impl Default for MonitorConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            grace_ms: default_grace_ms(),
        }
    }
}

impl MonitorConfig {
    pub fn grace(&self) -> Duration {
        Duration::from_millis(self.grace_ms)
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api_base_url: "http://localhost:5000".to_string(),
            session_cookie: None,
            session_check_timeout_secs: None,
            request_timeout_secs: default_request_timeout_secs(),
            monitor: MonitorConfig::default(),
            tick_rate_ms: default_tick_rate_ms(),
        }
    }
}

fn default_request_timeout_secs() -> u64 {
    30
}

fn default_grace_ms() -> u64 {
    1000
}

fn default_tick_rate_ms() -> u64 {
    100
}

fn default_true() -> bool {
    true
}

/// Command-line values that take precedence over files and environment.
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    pub api_base_url: Option<String>,
    pub session_cookie: Option<String>,
    pub disable_monitor: bool,
}

impl ClientConfig {
    /// The configuration compiled into the binary.
    pub fn embedded() -> Result<Self> {
        serde_yaml::from_str(DEFAULT_CLIENT_YAML)
            .context("Failed to parse embedded client.yaml")
    }

    /// Builds the effective configuration.
    ///
    /// Precedence, lowest first: embedded defaults, the user config file
    /// (or `explicit_path` when given), environment variables, then
    /// `overrides`.
    pub fn resolve(
        explicit_path: Option<&Path>,
        user_path: Option<&Path>,
        overrides: &ConfigOverrides,
    ) -> Result<Self> {
        let mut config = match (explicit_path, user_path) {
            (Some(path), _) => Self::read(path)?,
            (None, Some(path)) if path.exists() => Self::read(path)?,
            _ => Self::embedded()?,
        };

        config.apply_env();
        config.apply_overrides(overrides);
        config.validate()?;
        Ok(config)
    }

    fn read(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        serde_yaml::from_str(&content)
            .with_context(|| format!("Failed to parse config file as YAML: {}", path.display()))
    }

    fn apply_env(&mut self) {
        if let Some(base) = non_empty_env(ENV_API_BASE) {
            self.api_base_url = base;
        }
        if let Some(cookie) = non_empty_env(ENV_SESSION_COOKIE) {
            self.session_cookie = Some(cookie);
        }
    }

    fn apply_overrides(&mut self, overrides: &ConfigOverrides) {
        if let Some(base) = &overrides.api_base_url {
            self.api_base_url = base.clone();
        }
        if let Some(cookie) = &overrides.session_cookie {
            self.session_cookie = Some(cookie.clone());
        }
        if overrides.disable_monitor {
            self.monitor.enabled = false;
        }
    }

    /// Checks values and normalizes the base URL.
    fn validate(&mut self) -> Result<()> {
        let trimmed = self.api_base_url.trim().trim_end_matches('/');
        if !(trimmed.starts_with("http://") || trimmed.starts_with("https://")) {
            anyhow::bail!(
                "api_base_url must start with http:// or https://, got '{}'",
                self.api_base_url
            );
        }
        self.api_base_url = trimmed.to_string();

        if self.monitor.grace_ms == 0 {
            anyhow::bail!("monitor.grace_ms must be greater than zero");
        }
        if self.request_timeout_secs == 0 {
            anyhow::bail!("request_timeout_secs must be greater than zero");
        }
        if self.session_check_timeout_secs == Some(0) {
            anyhow::bail!("session_check_timeout_secs must be greater than zero when set");
        }
        if self.tick_rate_ms == 0 {
            anyhow::bail!("tick_rate_ms must be greater than zero");
        }
        if self
            .session_cookie
            .as_deref()
            .is_some_and(|cookie| cookie.trim().is_empty())
        {
            self.session_cookie = None;
        }
        Ok(())
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    pub fn session_check_timeout(&self) -> Option<Duration> {
        self.session_check_timeout_secs.map(Duration::from_secs)
    }

    pub fn tick_rate(&self) -> Duration {
        Duration::from_millis(self.tick_rate_ms)
    }
}

fn non_empty_env(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|value| !value.trim().is_empty())
}

#[cfg(test)]
#[path = "tests/config_tests.rs"]
mod tests;
