//! Music Courier - request albums from a music catalog and drive a
//! library-management service into acquiring them.
//!
//! The interesting part lives in [`sync`]: the downstream service's add and
//! refresh operations are fire-and-forget, so getting a requested album to
//! "monitored, search triggered" takes a small orchestration workflow with
//! a bounded convergence wait and a full audit trail.

pub mod audit;
pub mod cli;
pub mod config;
pub mod downstream;
pub mod error;
pub mod sync;

use clap::Parser;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = cli::Cli::parse();

    tracing_subscriber::registry()
        .with(fmt::layer().with_target(true))
        .with(EnvFilter::from_default_env().add_directive("music_courier=info".parse()?))
        .init();

    cli::run_command(&args).await
}
