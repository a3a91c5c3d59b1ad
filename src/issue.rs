//! Issue and comment records as the rest of the pipeline sees them.

use chrono::NaiveDateTime;
use lazy_static::lazy_static;
use regex::Regex;

use crate::error::{Error, Result};

lazy_static! {
    static ref KEY_PATTERN: Regex = Regex::new(r"^[A-Za-z][A-Za-z0-9_]*-\d+$").unwrap();
}

/// Layout of the first 19 characters of a Jira timestamp.
const TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%S";

/// A fetched Jira issue
#[derive(Debug, Default, Clone, PartialEq)]
pub struct Issue {
    /// The issue key (e.g., "ABC-1")
    pub key: String,
    /// Browser URL of the issue
    pub url: String,
    pub created: NaiveDateTime,
    pub summary: String,
    pub description: String,
    /// Display name of the reporter, i.e. the customer
    pub reporter: String,
    /// Comments in the order the API returned them
    pub comments: Vec<Comment>,
}

impl Issue {
    /// Creates a new Issue with default values
    pub fn new(key: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            ..Self::default()
        }
    }

    pub fn with_url(mut self, url: impl Into<String>) -> Self {
        self.url = url.into();
        self
    }

    pub fn with_created(mut self, created: NaiveDateTime) -> Self {
        self.created = created;
        self
    }

    pub fn with_summary(mut self, summary: impl Into<String>) -> Self {
        self.summary = summary.into();
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn with_reporter(mut self, reporter: impl Into<String>) -> Self {
        self.reporter = reporter.into();
        self
    }

    pub fn with_comments(mut self, comments: Vec<Comment>) -> Self {
        self.comments = comments;
        self
    }
}

/// A raw comment as returned by the issue endpoint
#[derive(Debug, Default, Clone, PartialEq)]
pub struct Comment {
    pub id: String,
    pub body: String,
    pub created: NaiveDateTime,
    pub author: String,
}

/// Result of the `sd.public.comment` property lookup for one comment
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Visibility {
    Internal,
    Public,
    /// The lookup failed or was skipped
    Unknown,
}

impl From<Option<bool>> for Visibility {
    fn from(internal: Option<bool>) -> Self {
        match internal {
            Some(true) => Visibility::Internal,
            _ => Visibility::Public,
        }
    }
}

/// Who wrote a piece of text, relative to the issue reporter
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    Customer,
    Agent,
}

impl Role {
    /// Customer on an exact, case-sensitive name match with the reporter
    pub fn classify(author: &str, reporter: &str) -> Self {
        if author == reporter {
            Role::Customer
        } else {
            Role::Agent
        }
    }
}

/// A comment that survived filtering, with its text normalized
#[derive(Debug, Clone, PartialEq)]
pub struct AdmissibleComment {
    pub text: String,
    pub created: NaiveDateTime,
    pub author: String,
    pub role: Role,
}

/// Parse a Jira timestamp such as `2023-01-05T10:11:12.000+0100`.
///
/// Only the date and time of day are kept; fractional seconds and the
/// offset are dropped.
pub fn parse_timestamp(raw: &str) -> Result<NaiveDateTime> {
    let head = raw.get(..19).unwrap_or(raw);
    NaiveDateTime::parse_from_str(head, TIMESTAMP_FORMAT)
        .map_err(|e| Error::InvalidInput(format!("bad timestamp {:?}: {}", raw, e)))
}

/// Split whitespace separated issue keys, keeping order and duplicates
pub fn parse_keys(input: &str) -> Result<Vec<String>> {
    let keys: Vec<String> = input.split_whitespace().map(str::to_string).collect();

    if keys.is_empty() {
        return Err(Error::InvalidInput("no issue keys given".into()));
    }

    if let Some(bad) = keys.iter().find(|key| !is_valid_key(key)) {
        return Err(Error::InvalidInput(format!(
            "{} does not look like an issue key (e.g., ABC-123)",
            bad
        )));
    }

    Ok(keys)
}

pub fn is_valid_key(key: &str) -> bool {
    KEY_PATTERN.is_match(key)
}
