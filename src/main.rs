mod activity;
mod commands;
mod config;
mod display;
mod error;
mod github;
mod output;
mod progress;

use clap::Parser;
use commands::export::ExportArgs;

#[derive(Parser)]
#[command(
    name = "gh-activity",
    version,
    about = "Export your GitHub activity (commits/PRs/issues/etc.) per organization"
)]
pub struct Cli {
    /// Start date (YYYY-MM-DD). Default: rolling last 365 days
    #[arg(long = "from", value_name = "DATE")]
    date_from: Option<String>,

    /// End date (YYYY-MM-DD). Default: today
    #[arg(long = "to", value_name = "DATE")]
    date_to: Option<String>,

    /// Restrict to specific org(s). Can be used multiple times
    #[arg(long = "org", value_name = "ORG")]
    orgs: Vec<String>,

    /// Output file prefix (default: github_activity)
    #[arg(long, value_name = "PREFIX")]
    out: Option<String>,

    /// Show verbose output (requests, rate limits, debug info)
    #[arg(long)]
    verbose: bool,
}

fn init_tracing(verbose: bool) {
    let level = if verbose { "debug" } else { "warn" };
    let filter = tracing_subscriber::EnvFilter::try_from_env("GH_ACTIVITY_LOG")
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(level));

    if let Err(e) = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(|| progress::LogWriter)
        .try_init()
    {
        display::warn(&format!("failed to initialize logging: {e}"));
    }
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let args = ExportArgs {
        from: cli.date_from,
        to: cli.date_to,
        orgs: cli.orgs,
        out: cli.out,
        verbose: cli.verbose,
    };

    if let Err(e) = commands::export::run(&args).await {
        display::error(&e.to_string());
        std::process::exit(e.exit_code());
    }
}
