//! Configuration management for jira-report
//!
//! The optional YAML file provides defaults for everything the command line
//! and the prompts do not supply. Once resolved, a run works from an
//! immutable [`Settings`] value.

use std::path::{Path, PathBuf};

use clap::ValueEnum;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// The name of the package, used for config directory naming
const PKG_NAME: &str = "jira-report";

pub const DEFAULT_URL: &str = "https://jira.ixperta.com";
pub const DEFAULT_OUTPUT: &str = "output.xlsx";
pub const SLA_NOTIFICATION_MARKER: &str =
    "_THIS IS AN INTERNAL IXPERTA COMMENT FOR PURPOSE OF SLA NOTIFICATION._";
pub const ATTRIBUTION_PREFIX: &str = "_commented by ";

/// What to do when an issue cannot be fetched
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum ErrorMode {
    /// Abort the whole run on the first failing issue
    #[default]
    FailFast,
    /// Skip the failing issue and report it at the end
    ContinueOnError,
}

impl ErrorMode {
    pub fn label(self) -> &'static str {
        match self {
            ErrorMode::FailFast => "fail-fast",
            ErrorMode::ContinueOnError => "continue-on-error",
        }
    }
}

#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct JiraConfig {
    /// Base URL of the Jira instance
    pub url: Option<String>,
    pub username: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct HttpConfig {
    pub timeout_secs: u64,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self { timeout_secs: 30 }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FilterConfig {
    /// Drop comments flagged internal by the `sd.public.comment` property.
    /// Unset means the user is asked, and internal comments are dropped
    /// when prompting is disabled.
    pub ignore_internal_comments: Option<bool>,
    /// Comments containing any of these are dropped unconditionally
    pub invalidating_texts: Vec<String>,
    /// Bodies starting with this lose their first line
    pub attribution_prefix: String,
}

impl Default for FilterConfig {
    fn default() -> Self {
        Self {
            ignore_internal_comments: None,
            invalidating_texts: vec![SLA_NOTIFICATION_MARKER.to_string()],
            attribution_prefix: ATTRIBUTION_PREFIX.to_string(),
        }
    }
}

impl FilterConfig {
    pub fn ignores_internal(&self) -> bool {
        self.ignore_internal_comments.unwrap_or(true)
    }
}

#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct StylingConfig {
    /// Authors always rendered bold, e.g. customer-side sync accounts
    pub extra_customers: Vec<String>,
    /// Authors never rendered bold, even when they reported an issue
    pub excluded_authors: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct OutputConfig {
    pub path: PathBuf,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from(DEFAULT_OUTPUT),
        }
    }
}

/// Contents of `config.yaml`
#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    pub jira: JiraConfig,
    pub http: HttpConfig,
    pub filter: FilterConfig,
    pub styling: StylingConfig,
    pub output: OutputConfig,
    pub error_mode: ErrorMode,
}

impl Config {
    /// Load the configuration file, falling back to defaults if it is missing
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();

        if !path.exists() {
            tracing::debug!(path = %path.display(), "no configuration file, using defaults");
            return Ok(Self::default());
        }

        let contents = std::fs::read_to_string(path)?;
        let config: Config = serde_yaml::from_str(&contents)?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<()> {
        if self.http.timeout_secs == 0 {
            return Err(Error::Config("http.timeout_secs must be positive".into()));
        }
        if let Some(url) = &self.jira.url {
            validate_url(url)?;
        }
        Ok(())
    }
}

/// Basic-auth credentials attached to every request
#[derive(Clone, PartialEq)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &"***")
            .finish()
    }
}

/// Everything a single run needs, resolved from flags, environment,
/// configuration file and prompts.
#[derive(Debug, Clone)]
pub struct Settings {
    pub base_url: String,
    pub credentials: Credentials,
    pub issue_keys: Vec<String>,
    pub timeout_secs: u64,
    pub filter: FilterConfig,
    pub styling: StylingConfig,
    pub output: PathBuf,
    pub error_mode: ErrorMode,
}

/// Require an http(s) URL and strip any trailing slash
pub fn normalize_url(url: &str) -> Result<String> {
    let url = url.trim();
    validate_url(url)?;
    Ok(url.trim_end_matches('/').to_string())
}

fn validate_url(url: &str) -> Result<()> {
    if url.starts_with("http://") || url.starts_with("https://") {
        Ok(())
    } else {
        Err(Error::Config(format!(
            "Jira URL must start with http:// or https://, got {:?}",
            url
        )))
    }
}

/// Get the configuration directory path (`~/.config/jira-report/`)
pub fn get_config_dir() -> Result<PathBuf> {
    let home = std::env::var("HOME")
        .map_err(|_| Error::Config("HOME environment variable not set".into()))?;
    Ok(PathBuf::from(home).join(".config").join(PKG_NAME))
}

/// Get the default path of the configuration file
pub fn get_config_path() -> Result<PathBuf> {
    Ok(get_config_dir()?.join("config.yaml"))
}
