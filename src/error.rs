use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Failed to fetch issue {key}: {cause}")]
    IssueFetch { key: String, cause: String },

    #[error("Failed to read visibility of comment {comment_id}: {cause}")]
    CommentVisibility { comment_id: String, cause: String },

    #[error("HTTP client error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON parsing error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Configuration file error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("Spreadsheet error: {0}")]
    Spreadsheet(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("User cancelled operation")]
    Cancelled,

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Prompt error: {0}")]
    Prompt(String),
}

impl From<inquire::error::InquireError> for Error {
    fn from(err: inquire::error::InquireError) -> Self {
        match err {
            inquire::error::InquireError::OperationCanceled => Error::Cancelled,
            inquire::error::InquireError::OperationInterrupted => Error::Cancelled,
            other => Error::Prompt(other.to_string()),
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
