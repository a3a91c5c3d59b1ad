use std::path::PathBuf;

use colored::Colorize;

use crate::cli::Args;
use crate::config::{self, Config, Credentials, Settings};
use crate::error::{Error, Result};
use crate::export::{self, ExportOutcome};
use crate::filter::CommentFilter;
use crate::issue;
use crate::jira::JiraClient;
use crate::ui;
use crate::xlsx;

/// Main application entry point
pub fn run(args: Args) -> Result<()> {
    ui::init_render_config();

    let config = match &args.config {
        Some(path) => Config::load(path)?,
        None => match config::get_config_path() {
            Ok(path) => Config::load(path)?,
            Err(err) => {
                tracing::warn!(error = %err, "no configuration directory, using defaults");
                Config::default()
            }
        },
    };
    let settings = resolve_settings(&args, &config)?;

    tracing::debug!(
        url = %settings.base_url,
        issues = settings.issue_keys.len(),
        error_mode = settings.error_mode.label(),
        "starting export"
    );

    let client = JiraClient::from_settings(&settings)?;
    let filter = CommentFilter::new(&settings.filter);

    let ExportOutcome { report, failures } = export::collect(
        &client,
        &filter,
        &settings.issue_keys,
        settings.error_mode,
        &settings.styling,
    )?;

    let styled = report.assemble();
    xlsx::write(&styled, &settings.output)?;

    println!(
        "{} Exported {} rows from {} issues to {}",
        ">".bright_green(),
        styled.len(),
        report.issue_keys().len(),
        settings.output.display().to_string().bright_cyan()
    );

    if !failures.is_empty() {
        println!(
            "{} {} issues could not be exported:",
            "x".red(),
            failures.len()
        );
        for failure in &failures {
            println!("  {} {}: {}", "x".red(), failure.key, failure.cause);
        }
    }

    Ok(())
}

/// Merge flags, environment, configuration file and prompts, in that order
fn resolve_settings(args: &Args, config: &Config) -> Result<Settings> {
    let interactive = !args.no_prompt;

    let url = match args.url.as_deref().or(config.jira.url.as_deref()) {
        Some(url) => url.to_string(),
        None if interactive => ui::prompt_url()?,
        None => config::DEFAULT_URL.to_string(),
    };
    let base_url = config::normalize_url(&url)?;

    let username = match args.username.as_deref().or(config.jira.username.as_deref()) {
        Some(username) => username.to_string(),
        None if interactive => ui::prompt_username()?,
        None => return Err(missing("username (--username or JIRA_USER)")),
    };

    let password = match &args.password {
        Some(password) => password.clone(),
        None if interactive => ui::prompt_password()?,
        None => return Err(missing("password (--password or JIRA_PASSWORD)")),
    };

    let issue_keys = if !args.issue_keys.is_empty() {
        issue::parse_keys(&args.issue_keys.join(" "))?
    } else if interactive {
        issue::parse_keys(&ui::prompt_issue_keys()?)?
    } else {
        return Err(missing("issue keys"));
    };

    let mut filter = config.filter.clone();
    let ignore_internal = match args
        .ignore_internal_comments()
        .or(filter.ignore_internal_comments)
    {
        Some(choice) => choice,
        None if interactive => ui::prompt_ignore_internal(filter.ignores_internal())?,
        None => filter.ignores_internal(),
    };
    filter.ignore_internal_comments = Some(ignore_internal);

    let output: PathBuf = args
        .output
        .clone()
        .unwrap_or_else(|| config.output.path.clone());

    Ok(Settings {
        base_url,
        credentials: Credentials { username, password },
        issue_keys,
        timeout_secs: config.http.timeout_secs,
        filter,
        styling: config.styling.clone(),
        output,
        error_mode: args.error_mode.unwrap_or(config.error_mode),
    })
}

fn missing(what: &str) -> Error {
    Error::InvalidInput(format!("missing {} and prompting is disabled", what))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ErrorMode;

    fn non_interactive(extra: &[&str]) -> Args {
        use clap::Parser;
        let mut argv = vec!["jira-report", "--no-prompt"];
        argv.extend_from_slice(extra);
        Args::try_parse_from(argv).unwrap()
    }

    #[test]
    fn test_flags_override_config() {
        let mut config = Config::default();
        config.jira.url = Some("https://config.example.com".into());
        config.jira.username = Some("config-user".into());
        config.error_mode = ErrorMode::ContinueOnError;

        let args = non_interactive(&[
            "-u",
            "https://flag.example.com/",
            "-P",
            "secret",
            "--include-internal",
            "--error-mode",
            "fail-fast",
            "ABC-1",
            "ABC-2",
        ]);

        let settings = resolve_settings(&args, &config).unwrap();

        assert_eq!(settings.base_url, "https://flag.example.com");
        assert_eq!(settings.credentials.username, "config-user");
        assert_eq!(settings.credentials.password, "secret");
        assert_eq!(settings.issue_keys, vec!["ABC-1", "ABC-2"]);
        assert!(!settings.filter.ignores_internal());
        assert_eq!(settings.error_mode, ErrorMode::FailFast);
        assert_eq!(settings.output, PathBuf::from("output.xlsx"));
    }

    #[test]
    fn test_defaults_without_prompting() {
        let mut config = Config::default();
        config.jira.username = Some("alice".into());

        let args = non_interactive(&["-P", "secret", "ABC-1"]);
        let settings = resolve_settings(&args, &config).unwrap();

        assert_eq!(settings.base_url, config::DEFAULT_URL);
        assert!(settings.filter.ignores_internal());
        assert_eq!(settings.timeout_secs, 30);
        assert_eq!(settings.error_mode, ErrorMode::FailFast);
    }

    fn interactive(extra: &[&str]) -> Args {
        use clap::Parser;
        let mut argv = vec!["jira-report"];
        argv.extend_from_slice(extra);
        Args::try_parse_from(argv).unwrap()
    }

    #[test]
    fn test_internal_choice_from_config_skips_prompt() {
        let mut config = Config::default();
        config.filter.ignore_internal_comments = Some(false);

        // Every input is known, so no prompt (and no terminal) is needed
        let args = interactive(&[
            "-u",
            "https://jira.example.com",
            "-U",
            "alice",
            "-P",
            "secret",
            "ABC-1",
        ]);
        let settings = resolve_settings(&args, &config).unwrap();

        assert_eq!(settings.filter.ignore_internal_comments, Some(false));
        assert!(!settings.filter.ignores_internal());
    }

    #[test]
    fn test_internal_flag_beats_config() {
        let mut config = Config::default();
        config.filter.ignore_internal_comments = Some(false);

        let args = interactive(&[
            "-u",
            "https://jira.example.com",
            "-U",
            "alice",
            "-P",
            "secret",
            "--ignore-internal",
            "ABC-1",
        ]);
        let settings = resolve_settings(&args, &config).unwrap();

        assert!(settings.filter.ignores_internal());
    }

    #[test]
    fn test_missing_input_without_prompting() {
        let config = Config::default();

        let no_keys = non_interactive(&["-U", "alice", "-P", "secret"]);
        assert!(matches!(
            resolve_settings(&no_keys, &config),
            Err(Error::InvalidInput(_))
        ));

        let no_password = non_interactive(&["-U", "alice", "ABC-1"]);
        assert!(matches!(
            resolve_settings(&no_password, &config),
            Err(Error::InvalidInput(_))
        ));
    }

    #[test]
    fn test_invalid_key_rejected() {
        let args = non_interactive(&["-U", "alice", "-P", "secret", "ABC-1", "oops"]);
        assert!(resolve_settings(&args, &Config::default()).is_err());
    }
}
