//! Report accumulation and presentation rules
//!
//! Rows are collected across all issues first; styling is then derived in
//! one pass by [`assemble`], which knows nothing about spreadsheets.

use std::collections::BTreeSet;

use crate::config::StylingConfig;
use crate::issue::{AdmissibleComment, Issue};
use crate::rows::{build_rows, ReportRow, RowKind};

/// ARGB fill of summary rows (orange)
pub const SUMMARY_FILL: &str = "FFFFA500";
/// ARGB font colour of the Issue column (blue)
pub const LINK_COLOR: &str = "FF0000FF";

/// Rows of every processed issue plus what styling needs to know about them
#[derive(Debug, Default, Clone)]
pub struct Report {
    rows: Vec<ReportRow>,
    customers: BTreeSet<String>,
    excluded: BTreeSet<String>,
    issue_keys: Vec<String>,
}

impl Report {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start with the configured extra customers and excluded authors
    pub fn with_styling(styling: &StylingConfig) -> Self {
        Self {
            customers: styling.extra_customers.iter().cloned().collect(),
            excluded: styling.excluded_authors.iter().cloned().collect(),
            ..Self::default()
        }
    }

    /// Append the rows of one issue and remember its reporter as a customer
    pub fn push_issue(&mut self, issue: &Issue, comments: Vec<AdmissibleComment>) {
        self.customers.insert(issue.reporter.clone());
        self.issue_keys.push(issue.key.clone());
        self.rows.extend(build_rows(issue, comments));
    }

    pub fn rows(&self) -> &[ReportRow] {
        &self.rows
    }

    pub fn issue_keys(&self) -> &[String] {
        &self.issue_keys
    }

    /// Names whose rows are rendered bold
    pub fn customer_names(&self) -> BTreeSet<String> {
        self.customers.difference(&self.excluded).cloned().collect()
    }

    pub fn assemble(&self) -> StyledReport {
        assemble(&self.rows, &self.customer_names())
    }
}

/// Presentation of a single row
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct RowStyle {
    /// Whole-row background fill
    pub highlight: bool,
    /// Whole-row bold font
    pub bold: bool,
}

/// Font treatment of the Issue column
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LinkStyle {
    pub color: &'static str,
    pub underline: bool,
}

pub const LINK_STYLE: LinkStyle = LinkStyle {
    color: LINK_COLOR,
    underline: true,
};

#[derive(Debug, Clone, PartialEq)]
pub struct StyledRow {
    pub row: ReportRow,
    pub style: RowStyle,
}

/// Rows annotated with how they should be drawn
#[derive(Debug, Clone, PartialEq)]
pub struct StyledReport {
    pub rows: Vec<StyledRow>,
    pub link_style: LinkStyle,
}

impl StyledReport {
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

pub fn row_style(row: &ReportRow, customers: &BTreeSet<String>) -> RowStyle {
    RowStyle {
        highlight: row.kind == RowKind::Summary,
        bold: customers.contains(&row.author),
    }
}

/// Apply the presentation rules to `rows`.
///
/// Each row's style depends only on that row and `customers`, so the result
/// is the same however often and in whatever order it is computed.
pub fn assemble(rows: &[ReportRow], customers: &BTreeSet<String>) -> StyledReport {
    StyledReport {
        rows: rows
            .iter()
            .map(|row| StyledRow {
                row: row.clone(),
                style: row_style(row, customers),
            })
            .collect(),
        link_style: LINK_STYLE,
    }
}
