//! hashctl Entry Point
//!
//! Uses `anyhow` for startup and command errors. The outcome of a
//! verification is reported through the exit status.

mod cli;

use std::io::{self, Write};
use std::process::ExitCode;

use anyhow::Context;
use auth::AuthConfig;
use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use cli::{Cli, CommandRunner};

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    // Load .env file
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    // Initialize tracing (stderr, so stdout carries only the result)
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "hashctl=info,auth=info,hasher=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .init();

    let config = AuthConfig::from_env().context("invalid password hashing configuration")?;

    tracing::debug!(
        algorithm = %config.hasher.algorithm,
        cost = %config.hasher.cost,
        peppered = config.pepper().is_some(),
        "Loaded hashing configuration"
    );

    let runner = CommandRunner::new(config);
    let outcome = runner.run(cli.command, io::stdin().lock()).await?;

    if outcome.is_failure() {
        tracing::error!(reason = %outcome.message, "Stored hash is malformed");
        eprintln!("{}", outcome.message);
    } else {
        let mut stdout = io::stdout().lock();
        writeln!(stdout, "{}", outcome.message).context("failed to write output")?;
    }

    Ok(ExitCode::from(outcome.exit_code))
}
