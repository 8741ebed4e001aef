#![forbid(unsafe_code)]

use anyhow::Result;
use clap::Parser;
use tracing::Level;
use tracing_subscriber::FmtSubscriber;
use tracing_subscriber::fmt::format::{DefaultFields, Format};

use macros_manager::cli::{self, Args};
use macros_manager::config::{self, Config};

fn subscriber(level: Level) -> FmtSubscriber<DefaultFields, Format, tracing_subscriber::filter::LevelFilter, fn() -> std::io::Stderr> {
    FmtSubscriber::builder()
        .with_max_level(level)
        .with_writer(std::io::stderr as fn() -> std::io::Stderr)
        .finish()
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let args = Args::parse();

    // Config loading logs (default file written, values clamped) before its
    // own log_level is known
    let bootstrap = subscriber(config::resolve_level(config::env_level().as_deref(), "info"));
    let config = tracing::subscriber::with_default(bootstrap, || match &args.config {
        Some(path) => Config::load_from(path),
        None => Config::load(),
    })?;

    tracing::subscriber::set_global_default(subscriber(config.tracing_level()))?;

    cli::run(args, config).await
}
