//! Flattening an issue into report rows.

use std::fmt;

use chrono::NaiveDateTime;

use crate::issue::{AdmissibleComment, Issue, Role};

/// Clickable reference to an issue
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IssueLink {
    pub key: String,
    pub url: String,
}

impl IssueLink {
    pub fn new(key: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            url: url.into(),
        }
    }

    /// Spreadsheet formula (without the leading `=`)
    pub fn formula(&self) -> String {
        format!(
            "HYPERLINK(\"{}\", \"{}\")",
            self.url.replace('"', "\"\""),
            self.key.replace('"', "\"\"")
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RowKind {
    Summary,
    Description,
    Comment,
}

impl RowKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            RowKind::Summary => "summary",
            RowKind::Description => "description",
            RowKind::Comment => "comment",
        }
    }
}

impl fmt::Display for RowKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One line of the report
#[derive(Debug, Clone, PartialEq)]
pub struct ReportRow {
    pub link: IssueLink,
    pub kind: RowKind,
    pub text: String,
    pub date: NaiveDateTime,
    pub author: String,
    /// Summary and description rows always belong to the reporter
    pub role: Role,
}

/// Summary, description, then one row per comment in the given order.
///
/// The first two rows are attributed to the reporter at the issue's
/// creation time.
pub fn build_rows(issue: &Issue, comments: Vec<AdmissibleComment>) -> Vec<ReportRow> {
    let link = IssueLink::new(&issue.key, &issue.url);
    let mut rows = Vec::with_capacity(comments.len() + 2);

    rows.push(ReportRow {
        link: link.clone(),
        kind: RowKind::Summary,
        text: issue.summary.clone(),
        date: issue.created,
        author: issue.reporter.clone(),
        role: Role::Customer,
    });
    rows.push(ReportRow {
        link: link.clone(),
        kind: RowKind::Description,
        text: issue.description.clone(),
        date: issue.created,
        author: issue.reporter.clone(),
        role: Role::Customer,
    });

    rows.extend(comments.into_iter().map(|comment| ReportRow {
        link: link.clone(),
        kind: RowKind::Comment,
        text: comment.text,
        date: comment.created,
        author: comment.author,
        role: comment.role,
    }));

    rows
}
