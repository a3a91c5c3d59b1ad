//! Decides which comments make it into the report.

use crate::config::FilterConfig;
use crate::issue::{AdmissibleComment, Comment, Role, Visibility};

/// Comment filter built once from the run settings
#[derive(Debug, Clone)]
pub struct CommentFilter {
    ignore_internal: bool,
    invalidating_texts: Vec<String>,
    attribution_prefix: String,
}

impl CommentFilter {
    pub fn new(config: &FilterConfig) -> Self {
        Self {
            ignore_internal: config.ignores_internal(),
            invalidating_texts: config.invalidating_texts.clone(),
            attribution_prefix: config.attribution_prefix.clone(),
        }
    }

    /// Whether the visibility of a comment can change the outcome
    pub fn ignores_internal(&self) -> bool {
        self.ignore_internal
    }

    /// Returns the admissible form of `comment`, or `None` if it is dropped.
    ///
    /// An `Unknown` visibility never drops a comment; the invalidating text
    /// check applies regardless of visibility.
    pub fn filter(
        &self,
        comment: &Comment,
        visibility: Visibility,
        reporter: &str,
    ) -> Option<AdmissibleComment> {
        if self.ignore_internal && visibility == Visibility::Internal {
            return None;
        }

        if self.is_invalidated(&comment.body) {
            return None;
        }

        Some(AdmissibleComment {
            text: self.strip_attribution(&comment.body),
            created: comment.created,
            author: comment.author.clone(),
            role: Role::classify(&comment.author, reporter),
        })
    }

    fn is_invalidated(&self, body: &str) -> bool {
        self.invalidating_texts
            .iter()
            .any(|text| !text.is_empty() && body.contains(text.as_str()))
    }

    /// Drop the templated first line ("_commented by ...") if present
    fn strip_attribution(&self, body: &str) -> String {
        if self.attribution_prefix.is_empty() || !body.starts_with(&self.attribution_prefix) {
            return body.to_string();
        }

        match body.split_once('\n') {
            Some((_, rest)) => rest.to_string(),
            None => String::new(),
        }
    }
}
