// src/commands/download.rs
//! Artifact download command

use anyhow::{Context, Result};
use std::path::PathBuf;
use tracing::info;
use tufie::{ConfigStore, DownloadRequest, Downloader, Overrides, TufUpdater, Workspace};

/// Options for `download`
pub struct DownloadArgs {
    pub artifact: String,
    pub root: Option<String>,
    pub metadata_url: Option<String>,
    pub artifact_url: Option<String>,
    pub directory_prefix: Option<PathBuf>,
    pub artifact_hash: bool,
    pub repository: Option<String>,
}

/// Download an artifact through the TUF updater
pub fn cmd_download(store: &ConfigStore, workspace: &Workspace, args: DownloadArgs) -> Result<()> {
    info!("Downloading artifact: {}", args.artifact);

    // An explicit root is resolved now and travels in transport form, like a configured one
    let trusted_root = match &args.root {
        Some(source) => {
            let root = tufie::trust::fetch_root(source)
                .with_context(|| format!("Failed to load trusted root from '{}'", source))?;
            Some(tufie::trust::encode(&root))
        }
        None => None,
    };

    let output_dir = match args.directory_prefix {
        Some(dir) => dir,
        None => std::env::current_dir().context("Failed to determine the current directory")?,
    };

    let request = DownloadRequest {
        target: args.artifact,
        repository: args.repository,
        overrides: Overrides {
            metadata_url: args.metadata_url,
            artifact_url: args.artifact_url,
            trusted_root,
            hash_prefix: args.artifact_hash.then_some(true),
        },
        output_dir,
    };

    let path = Downloader::new(workspace, TufUpdater::new()).download(store.config(), &request)?;

    println!("\nArtifact {} download completed.", request.target);
    println!("Saved to: {}", path.display());
    Ok(())
}
