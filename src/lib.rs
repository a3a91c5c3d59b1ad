//! # jira-report
//!
//! Export Jira tickets and their customer-visible comments into a styled
//! spreadsheet.

pub mod app;
pub mod cli;
pub mod config;
pub mod error;
pub mod export;
pub mod filter;
pub mod issue;
pub mod jira;
pub mod report;
pub mod rows;
pub mod ui;
pub mod xlsx;

// Re-export commonly used types
pub use config::{Config, Settings};
pub use error::{Error, Result};
pub use issue::{AdmissibleComment, Comment, Issue};
pub use report::{Report, StyledReport};
