#![forbid(unsafe_code)]
#![cfg_attr(docsrs, feature(doc_cfg))]
#![doc = include_str!("../README.md")]

mod command;
mod config;

use std::process;

use anyhow::Context;
use stowage_object::ObjectStorage;

use crate::config::Cli;

// Tracing target constants
pub const TRACING_TARGET_STARTUP: &str = "stowage_cli::startup";
pub const TRACING_TARGET_CONFIG: &str = "stowage_cli::config";
pub const TRACING_TARGET_COMMAND: &str = "stowage_cli::command";

#[tokio::main]
async fn main() {
    let Err(error) = run().await else {
        process::exit(0);
    };

    if tracing::enabled!(tracing::Level::ERROR) {
        let message = format!("{error:#}");
        tracing::error!(
            target: TRACING_TARGET_COMMAND,
            error = %message,
            "command failed"
        );
    } else {
        eprintln!("Error: {error:#}");
    }

    process::exit(1);
}

/// Main application entry point.
async fn run() -> anyhow::Result<()> {
    let cli = Cli::init();

    Cli::init_tracing();
    cli.log();

    let config = cli.storage.storage_config().await?;
    let storage = ObjectStorage::connect(cli.storage.bucket.clone(), config)
        .await
        .with_context(|| format!("failed to connect to bucket `{}`", cli.storage.bucket))?;

    if let Some(line) = command::execute(&storage, cli.command).await? {
        println!("{line}");
    }

    Ok(())
}
