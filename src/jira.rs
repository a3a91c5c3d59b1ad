//! Jira REST access
//!
//! Two endpoints are used:
//! - `GET /rest/api/2/issue/{key}` for the issue and its comments
//! - `GET /rest/api/2/comment/{id}/properties/sd.public.comment` for the
//!   Service Desk visibility of a single comment

use std::time::Duration;

use reqwest::blocking::Client;
use reqwest::StatusCode;
use serde::Deserialize;

use crate::config::{Credentials, Settings};
use crate::error::{Error, Result};
use crate::issue::{parse_timestamp, Comment, Issue};

const VISIBILITY_PROPERTY: &str = "sd.public.comment";

/// Where issues come from
pub trait IssueSource {
    /// Fetch one issue with all of its comments
    fn fetch_issue(&self, key: &str) -> Result<Issue>;

    /// Look up the `internal` flag of a comment.
    ///
    /// `Ok(None)` means the comment carries no visibility property.
    fn comment_internal(&self, comment_id: &str) -> Result<Option<bool>>;
}

// Response types for the REST endpoints

#[derive(Deserialize)]
struct IssueResponse {
    fields: IssueFields,
}

#[derive(Deserialize)]
struct IssueFields {
    created: String,
    #[serde(default)]
    summary: Option<String>,
    #[serde(default)]
    description: Option<String>,
    reporter: Person,
    #[serde(default)]
    comment: CommentPage,
}

#[derive(Deserialize)]
struct Person {
    #[serde(alias = "displayName")]
    display_name: String,
}

#[derive(Deserialize, Default)]
struct CommentPage {
    #[serde(default)]
    comments: Vec<RawComment>,
}

#[derive(Deserialize)]
struct RawComment {
    id: String,
    #[serde(default)]
    body: String,
    created: String,
    author: Person,
}

#[derive(Deserialize)]
struct PropertyResponse {
    #[serde(default)]
    value: Option<VisibilityValue>,
}

#[derive(Deserialize)]
struct VisibilityValue {
    #[serde(default)]
    internal: Option<bool>,
}

/// Blocking Jira client using basic auth
pub struct JiraClient {
    http: Client,
    base_url: String,
    credentials: Credentials,
}

impl JiraClient {
    /// Build a client; `base_url` must not end with a slash
    pub fn new(
        base_url: impl Into<String>,
        credentials: Credentials,
        timeout: Duration,
    ) -> Result<Self> {
        let http = Client::builder()
            .timeout(timeout)
            .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            http,
            base_url: base_url.into(),
            credentials,
        })
    }

    pub fn from_settings(settings: &Settings) -> Result<Self> {
        Self::new(
            settings.base_url.clone(),
            settings.credentials.clone(),
            Duration::from_secs(settings.timeout_secs),
        )
    }

    /// Browser URL of an issue
    pub fn browse_url(&self, key: &str) -> String {
        format!("{}/browse/{}", self.base_url, key)
    }

    fn get(&self, url: &str) -> reqwest::Result<reqwest::blocking::Response> {
        tracing::debug!(url, "GET");
        self.http
            .get(url)
            .basic_auth(&self.credentials.username, Some(&self.credentials.password))
            .header(reqwest::header::ACCEPT, "application/json")
            .send()
    }
}

impl IssueSource for JiraClient {
    fn fetch_issue(&self, key: &str) -> Result<Issue> {
        let fetch_error = |cause: String| Error::IssueFetch {
            key: key.to_string(),
            cause,
        };

        let url = format!("{}/rest/api/2/issue/{}", self.base_url, key);
        let response = self.get(&url).map_err(|e| fetch_error(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(fetch_error(format!("server answered {}", status)));
        }

        let body = response.text().map_err(|e| fetch_error(e.to_string()))?;
        let parsed: IssueResponse = serde_json::from_str(&body)
            .map_err(|e| fetch_error(format!("unexpected response: {}", e)))?;

        into_issue(key, self.browse_url(key), parsed.fields)
            .map_err(|e| fetch_error(e.to_string()))
    }

    fn comment_internal(&self, comment_id: &str) -> Result<Option<bool>> {
        let visibility_error = |cause: String| Error::CommentVisibility {
            comment_id: comment_id.to_string(),
            cause,
        };

        let url = format!(
            "{}/rest/api/2/comment/{}/properties/{}",
            self.base_url, comment_id, VISIBILITY_PROPERTY
        );
        let response = self.get(&url).map_err(|e| visibility_error(e.to_string()))?;

        match response.status() {
            StatusCode::NOT_FOUND => return Ok(None),
            status if !status.is_success() => {
                return Err(visibility_error(format!("server answered {}", status)));
            }
            _ => {}
        }

        let body = response.text().map_err(|e| visibility_error(e.to_string()))?;
        let property: PropertyResponse = serde_json::from_str(&body)
            .map_err(|e| visibility_error(format!("unexpected response: {}", e)))?;

        Ok(property.value.and_then(|value| value.internal))
    }
}

fn into_issue(key: &str, url: String, fields: IssueFields) -> Result<Issue> {
    let comments = fields
        .comment
        .comments
        .into_iter()
        .map(|raw| {
            Ok(Comment {
                created: parse_timestamp(&raw.created)?,
                id: raw.id,
                body: raw.body,
                author: raw.author.display_name,
            })
        })
        .collect::<Result<Vec<_>>>()?;

    Ok(Issue::new(key)
        .with_url(url)
        .with_created(parse_timestamp(&fields.created)?)
        .with_summary(fields.summary.unwrap_or_default())
        .with_description(fields.description.unwrap_or_default())
        .with_reporter(fields.reporter.display_name)
        .with_comments(comments))
}
