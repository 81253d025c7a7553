//! Storage connection configuration.

use std::path::PathBuf;

use anyhow::{Context, Result as AnyhowResult, anyhow};
use clap::{Args, ValueEnum};
use stowage_object::ProviderConfig;
use stowage_object::StorageConfig;
use stowage_object::providers::{
    AzureCredentials, GcsCredentials, MemoryCredentials, S3Credentials,
};

use crate::TRACING_TARGET_CONFIG;

/// Provider kinds selectable from the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ProviderKind {
    /// AWS S3 or an S3-compatible service.
    S3,
    /// Azure Blob Storage.
    Azure,
    /// Google Cloud Storage.
    Gcs,
    /// In-process store, discarded on exit.
    Memory,
}

/// Storage connection configuration.
///
/// # Environment Variables
///
/// - `STOWAGE_BUCKET` - Bucket (or Azure container) name
/// - `STOWAGE_PROVIDER` - One of `s3`, `azure`, `gcs`, `memory` (default: s3)
/// - `STOWAGE_CONFIG` - JSON configuration file; replaces the provider flags
/// - `AWS_REGION`, `AWS_ENDPOINT_URL`, `AWS_ACCESS_KEY_ID`,
///   `AWS_SECRET_ACCESS_KEY`, `AWS_SESSION_TOKEN` - S3 settings
/// - `AZURE_STORAGE_ACCOUNT_NAME`, `AZURE_STORAGE_ACCOUNT_KEY` - Azure settings
/// - `GOOGLE_SERVICE_ACCOUNT` - Path to a GCS service account key file
#[derive(Debug, Clone, Args)]
#[must_use = "config does nothing unless you use it"]
pub struct StorageArgs {
    /// Bucket (or Azure container) to operate on.
    #[arg(long, env = "STOWAGE_BUCKET")]
    pub bucket: String,

    /// Object storage provider.
    #[arg(long, env = "STOWAGE_PROVIDER", value_enum, default_value = "s3")]
    pub provider: ProviderKind,

    /// JSON storage configuration file.
    ///
    /// When set, provider flags below are ignored.
    #[arg(long, env = "STOWAGE_CONFIG")]
    pub config: Option<PathBuf>,

    /// S3 region.
    #[arg(long, env = "AWS_REGION", default_value = "us-east-1")]
    pub region: String,

    /// Endpoint override (e.g. `http://localhost:9000` for MinIO).
    ///
    /// Applies to the s3, azure and gcs providers.
    #[arg(long, env = "AWS_ENDPOINT_URL")]
    pub endpoint: Option<String>,

    /// S3 access key id.
    #[arg(long, env = "AWS_ACCESS_KEY_ID")]
    pub access_key_id: Option<String>,

    /// S3 secret access key.
    #[arg(long, env = "AWS_SECRET_ACCESS_KEY", hide_env_values = true)]
    pub secret_access_key: Option<String>,

    /// S3 session token for temporary credentials.
    #[arg(long, env = "AWS_SESSION_TOKEN", hide_env_values = true)]
    pub session_token: Option<String>,

    /// Azure storage account name.
    #[arg(long, env = "AZURE_STORAGE_ACCOUNT_NAME")]
    pub azure_account: Option<String>,

    /// Azure storage account key.
    #[arg(long, env = "AZURE_STORAGE_ACCOUNT_KEY", hide_env_values = true)]
    pub azure_access_key: Option<String>,

    /// Path to a GCS service account key file.
    #[arg(long, env = "GOOGLE_SERVICE_ACCOUNT")]
    pub gcs_service_account_key: Option<PathBuf>,

    /// Upload payloads without sniffing their content type.
    #[arg(long)]
    pub no_classify: bool,

    /// Allow `rm` to delete objects.
    #[arg(long, env = "STOWAGE_ALLOW_REMOVE")]
    pub allow_remove: bool,
}

impl StorageArgs {
    /// Builds the provider section from the individual flags.
    fn provider_config(&self) -> AnyhowResult<ProviderConfig> {
        let provider = match self.provider {
            ProviderKind::S3 => ProviderConfig::S3(S3Credentials {
                region: self.region.clone(),
                endpoint: self.endpoint.clone(),
                access_key_id: self.access_key_id.clone(),
                secret_access_key: self.secret_access_key.clone(),
                session_token: self.session_token.clone(),
            }),
            ProviderKind::Azure => ProviderConfig::Azure(AzureCredentials {
                account_name: self
                    .azure_account
                    .clone()
                    .ok_or_else(|| anyhow!("--azure-account is required for the azure provider"))?,
                access_key: self.azure_access_key.clone(),
                sas_token: None,
                endpoint: self.endpoint.clone(),
            }),
            ProviderKind::Gcs => ProviderConfig::Gcs(GcsCredentials {
                service_account_path: self
                    .gcs_service_account_key
                    .as_ref()
                    .map(|p| p.display().to_string()),
                service_account_key: None,
                endpoint: self.endpoint.clone(),
            }),
            ProviderKind::Memory => ProviderConfig::Memory(MemoryCredentials::default()),
        };
        Ok(provider)
    }

    /// Resolves the storage configuration.
    ///
    /// A configuration file takes precedence over provider flags; the
    /// `--no-classify` and `--allow-remove` switches apply on top of either.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration file cannot be read or parsed,
    /// or a required provider flag is missing.
    pub async fn storage_config(&self) -> AnyhowResult<StorageConfig> {
        let mut config = match &self.config {
            Some(path) => {
                let json = tokio::fs::read_to_string(path)
                    .await
                    .with_context(|| format!("failed to read {}", path.display()))?;
                StorageConfig::from_json(&json)
                    .with_context(|| format!("invalid configuration in {}", path.display()))?
            }
            None => StorageConfig::new(self.provider_config()?),
        };

        if self.no_classify {
            config.classify_content_type = false;
        }
        if self.allow_remove {
            config.allow_remove = true;
        }

        Ok(config)
    }

    /// Logs the configuration without credentials.
    pub fn log(&self) {
        tracing::info!(
            target: TRACING_TARGET_CONFIG,
            bucket = %self.bucket,
            provider = ?self.provider,
            config_file = ?self.config,
            endpoint = ?self.endpoint,
            classify = !self.no_classify,
            allow_remove = self.allow_remove,
            "storage configuration"
        );
    }
}
