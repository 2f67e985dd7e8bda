use anyhow::{Context as _, Result};
use chrono::NaiveDate;
use clap::Parser;
use std::io::Write as _;
use tracing::info;
use tracing_subscriber::EnvFilter;
use weekrev_core::{MailConfig, build_report};
use weekrev_rt::{RtClient, RtConfig};
use weekrev_sdk::WeekWindow;

#[derive(Parser, Debug)]
#[command(
    name = "weekrev",
    version,
    about = "Week-in-review ticket report, emitted as a MIME email on stdout"
)]
struct Cli {
    /// Report on the seven days ending on this date (defaults to today)
    #[arg(long, short = 'd', value_name = "YYYY-MM-DD")]
    date: Option<NaiveDate>,
}

fn main() -> Result<()> {
    init_logging();
    let cli = Cli::parse();

    let window = match cli.date {
        Some(end) => WeekWindow::ending(end),
        None => WeekWindow::current(),
    };
    info!(start = %window.start(), end = %window.end(), "building report");

    let mail = MailConfig::from_env()?;
    let client = RtClient::new(RtConfig::from_env()?)?;

    let message = build_report(&client, &window, &mail)?;

    std::io::stdout()
        .lock()
        .write_all(&message.formatted())
        .context("failed to write message to stdout")?;

    Ok(())
}

fn init_logging() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();
}
