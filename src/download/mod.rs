// src/download/mod.rs

//! Artifact download orchestration
//!
//! One download runs through these steps:
//! 1. Resolve parameters: the selected profile (explicit or default), with
//!    any explicit override replacing the profile's value field by field
//! 2. Validate: every missing required field is reported in one error
//! 3. Provision `<base>/metadata/<fingerprint>` for the metadata URL
//! 4. Write the decoded trusted root to `root.json` there, replacing any
//!    earlier copy
//! 5. Hand off to the [`Updater`]; its failure names the stage that failed

mod updater;

pub use updater::{TufUpdater, UpdateRequest, UpdateStage, Updater, UpdaterError};

use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

use crate::config::Configuration;
use crate::error::{Error, MissingParameter, Result};
use crate::hash::fingerprint;
use crate::trust::{self, ROOT_FILE};
use crate::workspace::Workspace;

/// Values given at call time that take precedence over the profile
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Overrides {
    pub metadata_url: Option<String>,
    pub artifact_url: Option<String>,
    /// Base64 transport form of the trusted root
    pub trusted_root: Option<String>,
    pub hash_prefix: Option<bool>,
}

/// Parameters after profile selection and overrides
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedParameters {
    /// Profile the values started from, if any
    pub repository: Option<String>,
    pub metadata_url: String,
    pub artifact_url: String,
    pub trusted_root: String,
    pub hash_prefix: bool,
}

/// A single artifact download
#[derive(Debug, Clone)]
pub struct DownloadRequest {
    pub target: String,
    /// Profile to use instead of the default
    pub repository: Option<String>,
    pub overrides: Overrides,
    pub output_dir: PathBuf,
}

/// Merge the selected profile with explicit overrides and validate
///
/// An explicitly named profile must exist. Without one the default profile
/// is used when it exists; otherwise resolution starts from nothing.
pub fn resolve_parameters(
    config: &Configuration,
    repository: Option<&str>,
    overrides: &Overrides,
) -> Result<ResolvedParameters> {
    let profile = match repository {
        Some(name) => Some(config.get(name)?),
        None => config.default_profile(),
    };

    let mut params = match profile {
        Some(profile) => ResolvedParameters {
            repository: Some(profile.name.clone()),
            metadata_url: profile.metadata_url.clone(),
            artifact_url: profile.artifact_base_url.clone(),
            trusted_root: profile.trusted_root.clone(),
            hash_prefix: profile.hash_prefix,
        },
        None => ResolvedParameters {
            repository: None,
            metadata_url: String::new(),
            artifact_url: String::new(),
            trusted_root: String::new(),
            hash_prefix: false,
        },
    };

    if let Some(url) = non_empty(&overrides.metadata_url) {
        params.metadata_url = url.to_string();
    }
    if let Some(url) = non_empty(&overrides.artifact_url) {
        params.artifact_url = url.to_string();
    }
    if let Some(root) = non_empty(&overrides.trusted_root) {
        params.trusted_root = root.to_string();
    }
    if let Some(hash_prefix) = overrides.hash_prefix {
        params.hash_prefix = hash_prefix;
    }

    let mut missing = Vec::new();
    if params.trusted_root.is_empty() {
        missing.push(MissingParameter::TrustedRoot);
    }
    if params.metadata_url.is_empty() {
        missing.push(MissingParameter::MetadataUrl);
    }
    if params.artifact_url.is_empty() {
        missing.push(MissingParameter::ArtifactUrl);
    }
    if !missing.is_empty() {
        return Err(Error::MissingParameters(missing));
    }

    Ok(params)
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|v| !v.is_empty())
}

/// Decode a trusted root and write it to `<dir>/root.json`
///
/// Always overwrites: the configured root wins over anything the updater
/// persisted during earlier refreshes.
pub fn materialize_root(metadata_dir: &Path, trusted_root: &str) -> Result<PathBuf> {
    let root = trust::decode(trusted_root)?;
    let path = metadata_dir.join(ROOT_FILE);
    fs::write(&path, root)?;
    debug!("Wrote trusted root to {}", path.display());
    Ok(path)
}

/// Runs downloads against a workspace with a given updater
pub struct Downloader<'a, U> {
    workspace: &'a Workspace,
    updater: U,
}

impl<'a, U: Updater> Downloader<'a, U> {
    pub fn new(workspace: &'a Workspace, updater: U) -> Self {
        Self { workspace, updater }
    }

    /// Resolve, validate, provision, materialize and delegate
    pub fn download(&self, config: &Configuration, request: &DownloadRequest) -> Result<PathBuf> {
        let params =
            resolve_parameters(config, request.repository.as_deref(), &request.overrides)?;
        self.download_resolved(&params, &request.target, &request.output_dir)
    }

    /// Run the steps after parameter resolution
    pub fn download_resolved(
        &self,
        params: &ResolvedParameters,
        target: &str,
        output_dir: &Path,
    ) -> Result<PathBuf> {
        if let Some(name) = &params.repository {
            debug!("Using repository '{}'", name);
        }

        let metadata_dir = self
            .workspace
            .provision_repository_dir(&fingerprint(&params.metadata_url))?;
        materialize_root(&metadata_dir, &params.trusted_root)?;

        let request = UpdateRequest {
            metadata_dir: &metadata_dir,
            target,
            metadata_url: &params.metadata_url,
            artifact_url: &params.artifact_url,
            output_dir,
            hash_prefix: params.hash_prefix,
        };
        let path = self.updater.download_target(&request)?;

        info!("Artifact {} available at {}", target, path.display());
        Ok(path)
    }
}
