//! Command execution against a connected storage.

use std::path::Path;

use anyhow::Context;
use bytes::Bytes;
use stowage_object::ObjectStorage;
use tokio::io::AsyncWriteExt;

use crate::TRACING_TARGET_COMMAND;
use crate::config::Command;

/// Runs `command` and returns the text to print on stdout, if any.
///
/// Object bytes from `get` without `--output` are written to stdout directly.
pub async fn execute(storage: &ObjectStorage, command: Command) -> anyhow::Result<Option<String>> {
    match command {
        Command::Put { key, file } => {
            put(storage, &key, &file).await?;
            Ok(None)
        }
        Command::Get { key, output } => {
            let data = storage
                .read(&key)
                .await
                .with_context(|| format!("failed to read `{key}`"))?;
            match output {
                Some(path) => write_file(&path, &data).await?,
                None => write_stdout(&data).await?,
            }
            Ok(None)
        }
        Command::Exists { key } => {
            let exists = storage
                .exists(&key)
                .await
                .with_context(|| format!("failed to probe `{key}`"))?;
            Ok(Some(exists.to_string()))
        }
        Command::Remove { key } => {
            storage
                .remove(&key)
                .await
                .with_context(|| format!("failed to remove `{key}`"))?;
            tracing::info!(target: TRACING_TARGET_COMMAND, key = %key, "object removed");
            Ok(None)
        }
    }
}

async fn put(storage: &ObjectStorage, key: &str, file: &Path) -> anyhow::Result<()> {
    let data = tokio::fs::read(file)
        .await
        .with_context(|| format!("failed to read {}", file.display()))?;
    let size = data.len();

    storage
        .write(key, data)
        .await
        .with_context(|| format!("failed to write `{key}`"))?;

    tracing::info!(target: TRACING_TARGET_COMMAND, key, size, "object written");
    Ok(())
}

async fn write_file(path: &Path, data: &Bytes) -> anyhow::Result<()> {
    tokio::fs::write(path, data)
        .await
        .with_context(|| format!("failed to write {}", path.display()))?;
    tracing::info!(
        target: TRACING_TARGET_COMMAND,
        path = %path.display(),
        size = data.len(),
        "object saved"
    );
    Ok(())
}

async fn write_stdout(data: &Bytes) -> anyhow::Result<()> {
    let mut stdout = tokio::io::stdout();
    stdout.write_all(data).await.context("failed to write to stdout")?;
    stdout.flush().await.context("failed to flush stdout")?;
    Ok(())
}
