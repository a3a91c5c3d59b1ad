use std::process;

use clap::Parser;
use colored::Colorize;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

use jira_report::cli::Args;
use jira_report::{app, Error};

fn main() {
    init_tracing();

    let args = Args::parse();

    match app::run(args) {
        Ok(()) => {}
        Err(Error::Cancelled) => process::exit(1),
        Err(err) => {
            println!("{} {}", "x".red(), err);
            process::exit(1);
        }
    }
}

fn init_tracing() {
    let env_filter = EnvFilter::builder()
        .with_default_directive(LevelFilter::WARN.into())
        .from_env_lossy();

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .compact()
        .init();
}
