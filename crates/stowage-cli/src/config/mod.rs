//! CLI configuration management.
//!
//! ```text
//! Cli
//! ├── storage: StorageArgs   # Bucket, provider, credentials, switches
//! └── command: Command       # put | get | exists | rm
//! ```
//!
//! All storage options can be provided via CLI arguments or environment
//! variables. Use `--help` to see all available options.
//!
//! # Example
//!
//! ```bash
//! stowage --bucket media --endpoint http://localhost:9000 put images/a.png ./a.png
//!
//! # Or via environment variables
//! STOWAGE_BUCKET=media AWS_ENDPOINT_URL=http://localhost:9000 stowage exists images/a.png
//! ```

mod storage;

use std::path::PathBuf;
use std::process;

use clap::{Parser, Subcommand};
pub use storage::StorageArgs;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

use crate::TRACING_TARGET_STARTUP;

/// Complete CLI configuration.
#[derive(Debug, Clone, Parser)]
#[command(name = "stowage")]
#[command(about = "Read and write objects in a cloud storage bucket")]
#[command(version)]
pub struct Cli {
    /// Storage connection configuration.
    #[clap(flatten)]
    pub storage: StorageArgs,

    /// Operation to perform.
    #[command(subcommand)]
    pub command: Command,
}

/// Object operations.
#[derive(Debug, Clone, Subcommand)]
pub enum Command {
    /// Upload a local file under KEY.
    Put {
        /// Object key.
        key: String,
        /// Local file to upload.
        file: PathBuf,
    },
    /// Download the object at KEY.
    Get {
        /// Object key.
        key: String,
        /// Write to this file instead of stdout.
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Print whether an object exists at KEY.
    Exists {
        /// Object key.
        key: String,
    },
    /// Delete the object at KEY (requires --allow-remove).
    #[command(name = "rm")]
    Remove {
        /// Object key.
        key: String,
    },
}

impl Cli {
    /// Loads environment variables from .env file (if enabled) and parses CLI arguments.
    pub fn init() -> Self {
        Self::load_dotenv();
        Self::parse()
    }

    /// Loads environment variables from .env file if the dotenv feature is enabled.
    #[cfg(feature = "dotenv")]
    fn load_dotenv() {
        if let Err(err) = dotenvy::dotenv()
            && !err.not_found()
        {
            eprintln!("Warning: failed to load .env file: {err}");
        }
    }

    /// No-op when dotenv feature is disabled.
    #[cfg(not(feature = "dotenv"))]
    fn load_dotenv() {}

    /// Initializes tracing with environment-based filtering.
    ///
    /// Logs go to stderr so `get` can stream object bytes to stdout.
    pub fn init_tracing() {
        let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .init();
    }

    /// Logs configuration (no sensitive information).
    pub fn log(&self) {
        tracing::debug!(
            target: TRACING_TARGET_STARTUP,
            version = env!("CARGO_PKG_VERSION"),
            pid = process::id(),
            features = ?Self::enabled_features(),
            "build information"
        );
        self.storage.log();
    }

    /// Returns a list of enabled compile-time features.
    fn enabled_features() -> Vec<&'static str> {
        [cfg!(feature = "dotenv").then_some("dotenv")]
            .into_iter()
            .flatten()
            .collect()
    }
}
