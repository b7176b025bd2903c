use std::path::PathBuf;

use clap::Parser;
use portal_core::SortKey;

mod platform;

/// Browse the job board, apply to jobs and review your applications.
#[derive(Debug, Parser)]
#[command(name = "portal", version)]
pub struct Cli {
    /// Free-text keyword.
    #[arg(long)]
    keyword: Option<String>,
    /// Employment type, e.g. FULL_TIME.
    #[arg(long = "type")]
    job_type: Option<String>,
    #[arg(long)]
    location: Option<String>,
    /// Salary bucket such as `50000-70000` or `100000+`.
    #[arg(long)]
    salary: Option<String>,
    /// Experience bucket in years such as `2-5` or `10+`.
    #[arg(long)]
    experience: Option<String>,
    /// newest, salary-desc, salary-asc or title.
    #[arg(long)]
    sort: Option<SortKey>,
    /// Apply to this job once the board has loaded. Repeatable.
    #[arg(long = "apply", value_name = "JOB_ID")]
    apply: Vec<String>,
    /// Configuration file; defaults to ./portal.ron when present.
    #[arg(long)]
    config: Option<PathBuf>,
    /// Log at debug level regardless of the configured level.
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> anyhow::Result<()> {
    platform::run_app(Cli::parse())
}
