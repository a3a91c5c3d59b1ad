//! Fetch, filter and flatten every requested issue into a [`Report`].

use colored::Colorize;

use crate::config::{ErrorMode, StylingConfig};
use crate::error::{Error, Result};
use crate::filter::CommentFilter;
use crate::issue::{AdmissibleComment, Issue, Visibility};
use crate::jira::IssueSource;
use crate::report::Report;

/// An issue left out of the report under [`ErrorMode::ContinueOnError`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IssueFailure {
    pub key: String,
    pub cause: String,
}

#[derive(Debug)]
pub struct ExportOutcome {
    pub report: Report,
    pub failures: Vec<IssueFailure>,
}

/// Process `keys` in order, appending each issue to one report.
pub fn collect(
    source: &dyn IssueSource,
    filter: &CommentFilter,
    keys: &[String],
    error_mode: ErrorMode,
    styling: &StylingConfig,
) -> Result<ExportOutcome> {
    let mut report = Report::with_styling(styling);
    let mut failures = Vec::new();

    for key in keys {
        println!("{} Issue: {}", ">".bright_green(), key.bright_cyan());

        let issue = match source.fetch_issue(key) {
            Ok(issue) => issue,
            Err(err) => match error_mode {
                ErrorMode::FailFast => return Err(err),
                ErrorMode::ContinueOnError => {
                    tracing::warn!(key = %key, error = %err, "skipping issue");
                    println!("{} {} skipped: {}", "x".red(), key, err);
                    failures.push(IssueFailure {
                        key: key.clone(),
                        cause: failure_cause(err),
                    });
                    continue;
                }
            },
        };

        let comments = admissible_comments(source, filter, &issue);
        report.push_issue(&issue, comments);
    }

    Ok(ExportOutcome { report, failures })
}

fn admissible_comments(
    source: &dyn IssueSource,
    filter: &CommentFilter,
    issue: &Issue,
) -> Vec<AdmissibleComment> {
    let mut admissible = Vec::with_capacity(issue.comments.len());

    for comment in &issue.comments {
        let visibility = if filter.ignores_internal() {
            lookup_visibility(source, &comment.id)
        } else {
            Visibility::Unknown
        };

        match filter.filter(comment, visibility, &issue.reporter) {
            Some(kept) => {
                println!("  {} comment {} by {}", "+".bright_green(), comment.id, comment.author);
                admissible.push(kept);
            }
            None => {
                println!("  {} comment {} by {}", "-".yellow(), comment.id, comment.author);
            }
        }
    }

    admissible
}

fn lookup_visibility(source: &dyn IssueSource, comment_id: &str) -> Visibility {
    match source.comment_internal(comment_id) {
        Ok(internal) => Visibility::from(internal),
        Err(err) => {
            tracing::warn!(comment_id, error = %err, "visibility unknown, keeping comment");
            Visibility::Unknown
        }
    }
}

fn failure_cause(err: Error) -> String {
    match err {
        Error::IssueFetch { cause, .. } => cause,
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::collections::HashMap;

    use crate::config::{FilterConfig, SLA_NOTIFICATION_MARKER};
    use crate::issue::{parse_timestamp, Comment, Role};
    use crate::rows::RowKind;

    /// In-memory issue source that records every visibility lookup
    #[derive(Default)]
    struct FakeSource {
        issues: HashMap<String, Issue>,
        internal: HashMap<String, bool>,
        broken_visibility: Vec<String>,
        lookups: RefCell<Vec<String>>,
    }

    impl FakeSource {
        fn with_issue(mut self, issue: Issue) -> Self {
            self.issues.insert(issue.key.clone(), issue);
            self
        }

        fn with_internal(mut self, comment_id: &str, internal: bool) -> Self {
            self.internal.insert(comment_id.into(), internal);
            self
        }
    }

    impl IssueSource for FakeSource {
        fn fetch_issue(&self, key: &str) -> Result<Issue> {
            self.issues.get(key).cloned().ok_or_else(|| Error::IssueFetch {
                key: key.to_string(),
                cause: "server answered 404 Not Found".into(),
            })
        }

        fn comment_internal(&self, comment_id: &str) -> Result<Option<bool>> {
            self.lookups.borrow_mut().push(comment_id.to_string());
            if self.broken_visibility.iter().any(|id| id == comment_id) {
                return Err(Error::CommentVisibility {
                    comment_id: comment_id.into(),
                    cause: "connection reset".into(),
                });
            }
            Ok(self.internal.get(comment_id).copied())
        }
    }

    fn comment(id: &str, author: &str, body: &str) -> Comment {
        Comment {
            id: id.into(),
            body: body.into(),
            created: parse_timestamp("2023-01-06T12:00:00").unwrap(),
            author: author.into(),
        }
    }

    fn issue(key: &str, reporter: &str, comments: Vec<Comment>) -> Issue {
        Issue::new(key)
            .with_url(format!("https://jira.example.com/browse/{}", key))
            .with_created(parse_timestamp("2023-01-05T10:11:12").unwrap())
            .with_summary("summary")
            .with_description("description")
            .with_reporter(reporter)
            .with_comments(comments)
    }

    fn keys(keys: &[&str]) -> Vec<String> {
        keys.iter().map(|k| k.to_string()).collect()
    }

    fn default_filter() -> CommentFilter {
        CommentFilter::new(&FilterConfig::default())
    }

    #[test]
    fn test_scenario_abc_1() {
        let source = FakeSource::default()
            .with_issue(issue(
                "ABC-1",
                "Alice",
                vec![
                    comment("1", "Alice", "thanks"),
                    comment("2", "Bob", "_commented by Bob\ninternal note"),
                ],
            ))
            .with_internal("2", true);

        let outcome = collect(
            &source,
            &default_filter(),
            &keys(&["ABC-1"]),
            ErrorMode::FailFast,
            &StylingConfig::default(),
        )
        .unwrap();

        let rows = outcome.report.rows();
        assert_eq!(rows.len(), 3);
        assert_eq!(rows[0].kind, RowKind::Summary);
        assert_eq!(rows[1].kind, RowKind::Description);
        assert_eq!(rows[2].kind, RowKind::Comment);
        assert_eq!(rows[2].text, "thanks");
        assert_eq!(rows[2].author, "Alice");
        assert!(outcome.failures.is_empty());
    }

    #[test]
    fn test_row_count_is_comments_plus_two() {
        let comments: Vec<Comment> = (0..5)
            .map(|i| comment(&i.to_string(), "Bob", &format!("reply {}", i)))
            .collect();
        let source = FakeSource::default().with_issue(issue("ABC-7", "Alice", comments));

        let outcome = collect(
            &source,
            &default_filter(),
            &keys(&["ABC-7"]),
            ErrorMode::FailFast,
            &StylingConfig::default(),
        )
        .unwrap();

        let texts: Vec<&str> = outcome.report.rows()[2..].iter().map(|r| r.text.as_str()).collect();
        assert_eq!(outcome.report.rows().len(), 7);
        assert_eq!(texts, vec!["reply 0", "reply 1", "reply 2", "reply 3", "reply 4"]);
    }

    #[test]
    fn test_sla_notice_excluded_even_when_internal_allowed() {
        let source = FakeSource::default().with_issue(issue(
            "ABC-1",
            "Alice",
            vec![
                comment("1", "Bot", SLA_NOTIFICATION_MARKER),
                comment("2", "Bob", "hello"),
            ],
        ));
        let filter = CommentFilter::new(&FilterConfig {
            ignore_internal_comments: Some(false),
            ..FilterConfig::default()
        });

        let outcome = collect(
            &source,
            &filter,
            &keys(&["ABC-1"]),
            ErrorMode::FailFast,
            &StylingConfig::default(),
        )
        .unwrap();

        assert_eq!(outcome.report.rows().len(), 3);
        assert_eq!(outcome.report.rows()[2].text, "hello");
        // Visibility cannot matter, so it is never looked up
        assert!(source.lookups.borrow().is_empty());
    }

    #[test]
    fn test_failed_visibility_lookup_keeps_comment() {
        let mut source = FakeSource::default().with_issue(issue(
            "ABC-1",
            "Alice",
            vec![comment("1", "Bob", "still here")],
        ));
        source.broken_visibility.push("1".into());

        let outcome = collect(
            &source,
            &default_filter(),
            &keys(&["ABC-1"]),
            ErrorMode::FailFast,
            &StylingConfig::default(),
        )
        .unwrap();

        assert_eq!(outcome.report.rows().len(), 3);
        assert_eq!(outcome.report.rows()[2].text, "still here");
        assert_eq!(*source.lookups.borrow(), vec!["1".to_string()]);
    }

    #[test]
    fn test_fail_fast_aborts_on_first_bad_issue() {
        let source = FakeSource::default().with_issue(issue("ABC-1", "Alice", vec![]));

        let result = collect(
            &source,
            &default_filter(),
            &keys(&["ABC-1", "ABC-404", "ABC-1"]),
            ErrorMode::FailFast,
            &StylingConfig::default(),
        );

        match result {
            Err(Error::IssueFetch { key, .. }) => assert_eq!(key, "ABC-404"),
            other => panic!("expected fetch error, got {:?}", other.map(|o| o.failures)),
        }
    }

    #[test]
    fn test_continue_on_error_skips_and_records() {
        let source = FakeSource::default()
            .with_issue(issue("ABC-1", "Alice", vec![comment("1", "Alice", "a")]))
            .with_issue(issue("ABC-3", "Carol", vec![]));

        let outcome = collect(
            &source,
            &default_filter(),
            &keys(&["ABC-1", "ABC-404", "ABC-3"]),
            ErrorMode::ContinueOnError,
            &StylingConfig::default(),
        )
        .unwrap();

        assert_eq!(outcome.report.issue_keys(), ["ABC-1", "ABC-3"]);
        assert_eq!(outcome.report.rows().len(), 3 + 2);
        assert_eq!(
            outcome.failures,
            vec![IssueFailure {
                key: "ABC-404".into(),
                cause: "server answered 404 Not Found".into(),
            }]
        );
    }

    #[test]
    fn test_roles_follow_reporter() {
        let source = FakeSource::default().with_issue(issue(
            "ABC-1",
            "Alice",
            vec![comment("1", "Alice", "me"), comment("2", "Bob", "agent")],
        ));
        let filter = default_filter();
        let issue = source.fetch_issue("ABC-1").unwrap();

        let roles: Vec<Role> = admissible_comments(&source, &filter, &issue)
            .into_iter()
            .map(|c| c.role)
            .collect();
        assert_eq!(roles, vec![Role::Customer, Role::Agent]);
    }
}
