use crate::config::ConfigOverrides;
use clap::Parser;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "interview")]
#[command(about = "Terminal client for the cognitive interview assistant")]
#[command(version)]
pub struct Cli {
    /// Client config file (defaults to ~/.interview-coach/config.yaml)
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Backend root URL
    #[arg(long)]
    pub api_base: Option<String>,

    /// Session cookie copied from the browser after signing in
    #[arg(long)]
    pub session_cookie: Option<String>,

    /// Check the session and exit without starting the TUI
    #[arg(long)]
    pub headless: bool,

    /// Never open the camera feed
    #[arg(long)]
    pub no_monitor: bool,
}

impl Cli {
    pub fn overrides(&self) -> ConfigOverrides {
        ConfigOverrides {
            api_base_url: self.api_base.clone(),
            session_cookie: self.session_cookie.clone(),
            disable_monitor: self.no_monitor,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flags_become_overrides() {
        let cli = Cli::parse_from([
            "interview",
            "--api-base",
            "http://coach.local",
            "--session-cookie",
            "session=xyz",
            "--no-monitor",
        ]);
        let overrides = cli.overrides();

        assert_eq!(overrides.api_base_url.as_deref(), Some("http://coach.local"));
        assert_eq!(overrides.session_cookie.as_deref(), Some("session=xyz"));
        assert!(overrides.disable_monitor);
        assert!(!cli.headless);
    }

    #[test]
    fn test_defaults_override_nothing() {
        let cli = Cli::parse_from(["interview", "--headless"]);
        let overrides = cli.overrides();

        assert!(cli.headless);
        assert!(cli.config.is_none());
        assert!(overrides.api_base_url.is_none());
        assert!(!overrides.disable_monitor);
    }
}
