use inquire::error::InquireError;
use inquire::ui::{Color, RenderConfig, Styled};
use inquire::validator::Validation;
use inquire::{set_global_render_config, Confirm, CustomUserError, Password, Text};

use crate::config::DEFAULT_URL;
use crate::error::Error;
use crate::issue;

/// Initialize the global render configuration for inquire prompts
pub fn init_render_config() {
    let mut style = RenderConfig::default_colored();
    style.prompt_prefix = Styled::new(">").with_fg(Color::LightGreen);
    set_global_render_config(style);
}

/// Prompt for the Jira base URL, blank meaning the default instance
pub fn prompt_url() -> Result<String, Error> {
    Text::new("Jira base URL:")
        .with_default(DEFAULT_URL)
        .with_validator(url_validator)
        .prompt()
        .map_err(map_inquire_error)
}

pub fn prompt_username() -> Result<String, Error> {
    Text::new("Username:")
        .with_validator(non_empty_validator)
        .prompt()
        .map_err(map_inquire_error)
}

pub fn prompt_password() -> Result<String, Error> {
    Password::new("Password:")
        .without_confirmation()
        .prompt()
        .map_err(map_inquire_error)
}

/// Prompt for space separated issue keys
pub fn prompt_issue_keys() -> Result<String, Error> {
    Text::new("Issue keys (separated by spaces):")
        .with_validator(keys_validator)
        .prompt()
        .map_err(map_inquire_error)
}

pub fn prompt_ignore_internal(default: bool) -> Result<bool, Error> {
    Confirm::new("Leave out internal comments?")
        .with_default(default)
        .prompt()
        .map_err(map_inquire_error)
}

fn url_validator(input: &str) -> Result<Validation, CustomUserError> {
    match crate::config::normalize_url(input) {
        Ok(_) => Ok(Validation::Valid),
        Err(err) => Ok(Validation::Invalid(err.to_string().into())),
    }
}

fn non_empty_validator(input: &str) -> Result<Validation, CustomUserError> {
    if input.trim().is_empty() {
        Ok(Validation::Invalid("Must not be empty".into()))
    } else {
        Ok(Validation::Valid)
    }
}

fn keys_validator(input: &str) -> Result<Validation, CustomUserError> {
    match issue::parse_keys(input) {
        Ok(_) => Ok(Validation::Valid),
        Err(err) => Ok(Validation::Invalid(err.to_string().into())),
    }
}

/// Map inquire errors to our error type
fn map_inquire_error(err: InquireError) -> Error {
    match err {
        InquireError::OperationCanceled | InquireError::OperationInterrupted => Error::Cancelled,
        _ => Error::Prompt(err.to_string()),
    }
}
