use std::path::PathBuf;

use clap::Parser;

use crate::config::ErrorMode;

#[derive(Parser, Debug, Default)]
#[clap(author, version, about, long_about = None)]
pub struct Args {
    /// Issue keys to export, in report order (e.g., ABC-1 ABC-2)
    #[clap(value_parser)]
    pub issue_keys: Vec<String>,

    /// Base URL of the Jira instance
    #[clap(short, long, env = "JIRA_URL")]
    pub url: Option<String>,

    /// Jira username
    #[clap(short = 'U', long, env = "JIRA_USER")]
    pub username: Option<String>,

    /// Jira password
    #[clap(short = 'P', long, env = "JIRA_PASSWORD", hide_env_values = true)]
    pub password: Option<String>,

    /// Output spreadsheet path
    #[clap(short, long)]
    pub output: Option<PathBuf>,

    /// Configuration file (defaults to ~/.config/jira-report/config.yaml)
    #[clap(short, long)]
    pub config: Option<PathBuf>,

    /// Keep comments marked internal
    #[clap(long, conflicts_with = "ignore_internal")]
    pub include_internal: bool,

    /// Drop comments marked internal
    #[clap(long)]
    pub ignore_internal: bool,

    /// What to do when an issue cannot be fetched
    #[clap(long, value_enum)]
    pub error_mode: Option<ErrorMode>,

    /// Never prompt; fail if required input is missing
    #[clap(long, default_value_t = false)]
    pub no_prompt: bool,
}

impl Args {
    /// The internal-comment choice given on the command line, if any
    pub fn ignore_internal_comments(&self) -> Option<bool> {
        match (self.ignore_internal, self.include_internal) {
            (true, _) => Some(true),
            (_, true) => Some(false),
            _ => None,
        }
    }
}
