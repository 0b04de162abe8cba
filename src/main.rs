use std::io::{self, Write};
use std::process::ExitCode;

use clap::{CommandFactory, Parser};
use rand::rngs::OsRng;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use feed_digest::cli::Cli;
use feed_digest::config::Config;
use feed_digest::error::Error;
use feed_digest::{digest, sources};

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    // Initialize logging; stdout is reserved for the page
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| cli.log_filter().into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .init();

    match run(&cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            if let Some(Error::Usage) = e.downcast_ref::<Error>() {
                eprintln!("{}", Cli::command().render_usage());
                return ExitCode::from(2);
            }
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: &Cli) -> anyhow::Result<()> {
    // Load configuration
    let mut config = match &cli.config {
        Some(path) => Config::load(path)?,
        None => Config::default(),
    };
    cli.apply(&mut config);
    config.validate()?;

    let sources = sources::collect(&cli.sources, cli.input.as_deref(), &config.feeds)?;

    let stdout = io::stdout();
    let mut out = stdout.lock();
    let summary = digest::run(&config, &sources, &mut OsRng, &mut out).await?;
    out.flush()?;

    info!(
        "Wrote {} items from {} feeds ({} sources failed)",
        summary.items,
        summary.feeds,
        summary.failures.len()
    );

    Ok(())
}
