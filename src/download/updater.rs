// src/download/updater.rs

//! The TUF updater collaborator
//!
//! The orchestrator hands one [`UpdateRequest`] to an [`Updater`] and gets
//! back either the artifact's local path or the first stage that failed.
//! [`TufUpdater`] is the production implementation on top of `tough`.

use std::fmt;
use std::fs::{self, File};
use std::path::{Path, PathBuf};
use thiserror::Error;
use tough::schema::Target;
use tough::{Prefix, RepositoryLoader, TargetName};
use tracing::{debug, info};
use url::Url;

use crate::hash::sha256_file;
use crate::trust::ROOT_FILE;

/// Everything the updater needs for one artifact
#[derive(Debug, Clone, Copy)]
pub struct UpdateRequest<'a> {
    /// Per-source metadata directory containing `root.json`
    pub metadata_dir: &'a Path,
    /// Target path as listed in targets metadata
    pub target: &'a str,
    pub metadata_url: &'a str,
    pub artifact_url: &'a str,
    /// Directory the artifact is saved into
    pub output_dir: &'a Path,
    /// Prefix the saved file name with the target's SHA-256
    pub hash_prefix: bool,
}

/// Stages of an update, in execution order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpdateStage {
    Refresh,
    TargetLookup,
    CacheLookup,
    Download,
}

impl UpdateStage {
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Refresh => "refresh",
            Self::TargetLookup => "target-lookup",
            Self::CacheLookup => "cache-lookup",
            Self::Download => "download",
        }
    }
}

impl fmt::Display for UpdateStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Failure reported by an updater
#[derive(Error, Debug)]
pub enum UpdaterError {
    #[error("failed to refresh trusted metadata: {0}")]
    RefreshFailed(String),

    #[error("target {0} not found")]
    TargetNotFound(String),

    #[error("failed while finding a cached target: {0}")]
    CacheLookupFailed(String),

    #[error("failed to download target file: {0}")]
    DownloadFailed(String),
}

impl UpdaterError {
    /// Stage that produced this failure
    pub fn stage(&self) -> UpdateStage {
        match self {
            Self::RefreshFailed(_) => UpdateStage::Refresh,
            Self::TargetNotFound(_) => UpdateStage::TargetLookup,
            Self::CacheLookupFailed(_) => UpdateStage::CacheLookup,
            Self::DownloadFailed(_) => UpdateStage::Download,
        }
    }
}

/// Refreshes trusted metadata and fetches a verified artifact
pub trait Updater {
    /// Refresh, look up, check the cache, download. Stops at the first failure.
    fn download_target(&self, request: &UpdateRequest<'_>) -> Result<PathBuf, UpdaterError>;
}

impl<U: Updater + ?Sized> Updater for &U {
    fn download_target(&self, request: &UpdateRequest<'_>) -> Result<PathBuf, UpdaterError> {
        (**self).download_target(request)
    }
}

/// Updater backed by the `tough` TUF client
///
/// The metadata directory doubles as tough's datastore, so metadata cached
/// from earlier refreshes sits next to `root.json`.
#[derive(Debug, Default, Clone, Copy)]
pub struct TufUpdater;

impl TufUpdater {
    pub fn new() -> Self {
        Self
    }

    fn refresh(&self, request: &UpdateRequest<'_>) -> Result<tough::Repository, UpdaterError> {
        let root_path = request.metadata_dir.join(ROOT_FILE);
        let root = File::open(&root_path).map_err(|e| {
            UpdaterError::RefreshFailed(format!("cannot read {}: {e}", root_path.display()))
        })?;
        let metadata_url = base_url(request.metadata_url).map_err(UpdaterError::RefreshFailed)?;
        let targets_url = base_url(request.artifact_url).map_err(UpdaterError::RefreshFailed)?;

        debug!("Refreshing metadata from {}", metadata_url);
        RepositoryLoader::new(root, metadata_url, targets_url)
            .datastore(request.metadata_dir.to_path_buf())
            .load()
            .map_err(|e| UpdaterError::RefreshFailed(e.to_string()))
    }
}

impl Updater for TufUpdater {
    fn download_target(&self, request: &UpdateRequest<'_>) -> Result<PathBuf, UpdaterError> {
        let repository = self.refresh(request)?;

        let name = TargetName::new(request.target)
            .map_err(|e| UpdaterError::TargetNotFound(format!("{} ({e})", request.target)))?;
        let target = repository
            .targets()
            .signed
            .find_target(&name)
            .map_err(|_| UpdaterError::TargetNotFound(request.target.to_string()))?;

        let dest = request
            .output_dir
            .join(local_file_name(name.resolved(), target, request.hash_prefix));

        if is_cached(&dest, target)? {
            info!("Target is already present: {}", dest.display());
            return Ok(dest);
        }

        fs::create_dir_all(request.output_dir).map_err(|e| {
            UpdaterError::DownloadFailed(format!("{}: {e}", request.output_dir.display()))
        })?;

        let prefix = if request.hash_prefix {
            Prefix::Digest
        } else {
            Prefix::None
        };
        repository
            .save_target(&name, request.output_dir, prefix)
            .map_err(|e| UpdaterError::DownloadFailed(format!("{} - {e}", request.target)))?;

        info!("Successfully downloaded target {} to {}", request.target, dest.display());
        Ok(dest)
    }
}

/// Parse a base URL, adding the trailing slash URL joining relies on
fn base_url(raw: &str) -> Result<Url, String> {
    let normalized = if raw.ends_with('/') {
        raw.to_string()
    } else {
        format!("{raw}/")
    };
    Url::parse(&normalized).map_err(|e| format!("invalid URL '{raw}': {e}"))
}

/// Path a target is saved under, relative to the output directory
///
/// Matches `Repository::save_target`: with `Prefix::Digest` the hex digest
/// prefixes the whole resolved name, so `dir/file.txt` lands at
/// `<sha256>.dir/file.txt`.
fn local_file_name(resolved: &str, target: &Target, hash_prefix: bool) -> PathBuf {
    if !hash_prefix {
        return PathBuf::from(resolved);
    }

    PathBuf::from(format!(
        "{}.{}",
        hex::encode(&target.hashes.sha256),
        resolved
    ))
}

/// Whether `dest` already holds exactly the bytes the target describes
fn is_cached(dest: &Path, target: &Target) -> Result<bool, UpdaterError> {
    if !dest.is_file() {
        return Ok(false);
    }

    let (digest, length) = sha256_file(dest)
        .map_err(|e| UpdaterError::CacheLookupFailed(format!("{}: {e}", dest.display())))?;
    let expected: &[u8] = target.hashes.sha256.as_ref();
    Ok(length == target.length && digest.as_slice() == expected)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stage_names() {
        assert_eq!(UpdateStage::Refresh.to_string(), "refresh");
        assert_eq!(UpdateStage::TargetLookup.to_string(), "target-lookup");
        assert_eq!(UpdateStage::CacheLookup.to_string(), "cache-lookup");
        assert_eq!(UpdateStage::Download.to_string(), "download");
    }

    #[test]
    fn test_error_stages() {
        assert_eq!(
            UpdaterError::RefreshFailed(String::new()).stage(),
            UpdateStage::Refresh
        );
        assert_eq!(
            UpdaterError::CacheLookupFailed(String::new()).stage(),
            UpdateStage::CacheLookup
        );
        assert_eq!(
            UpdaterError::DownloadFailed(String::new()).stage(),
            UpdateStage::Download
        );
    }

    #[test]
    fn test_base_url_adds_trailing_slash() {
        assert_eq!(
            base_url("https://metadata.rstuf.org").unwrap().as_str(),
            "https://metadata.rstuf.org/"
        );
        assert_eq!(
            base_url("https://rstuf.org/artifacts/").unwrap().as_str(),
            "https://rstuf.org/artifacts/"
        );
        assert!(base_url("not a url").is_err());
    }

    // sha256("123")
    const DIGEST_123: &str = "a665a45920422f9d417e4867efdc4fb8a04a1f3fff1fa07e998e86f7f7a27ae3";

    fn target(length: u64, sha256: &str) -> Target {
        serde_json::from_value(serde_json::json!({
            "length": length,
            "hashes": { "sha256": sha256 },
        }))
        .unwrap()
    }

    #[test]
    fn test_local_file_name() {
        let target = target(3, DIGEST_123);

        let flat = TargetName::new("file.txt").unwrap();
        assert_eq!(
            local_file_name(flat.resolved(), &target, false),
            PathBuf::from("file.txt")
        );
        assert_eq!(
            local_file_name(flat.resolved(), &target, true),
            PathBuf::from(format!("{DIGEST_123}.file.txt"))
        );

        let nested = TargetName::new("dir/file.txt").unwrap();
        assert_eq!(
            local_file_name(nested.resolved(), &target, false),
            PathBuf::from("dir/file.txt")
        );
        assert_eq!(
            local_file_name(nested.resolved(), &target, true),
            PathBuf::from(format!("{DIGEST_123}.dir/file.txt"))
        );
    }

    #[test]
    fn test_is_cached_matching_file() {
        let temp = tempfile::tempdir().unwrap();
        let dest = temp.path().join("file.txt");
        fs::write(&dest, b"123").unwrap();

        assert!(is_cached(&dest, &target(3, DIGEST_123)).unwrap());
    }

    #[test]
    fn test_is_cached_wrong_length() {
        let temp = tempfile::tempdir().unwrap();
        let dest = temp.path().join("file.txt");
        fs::write(&dest, b"123").unwrap();

        assert!(!is_cached(&dest, &target(4, DIGEST_123)).unwrap());
    }

    #[test]
    fn test_is_cached_wrong_digest() {
        let temp = tempfile::tempdir().unwrap();
        let dest = temp.path().join("file.txt");
        fs::write(&dest, b"124").unwrap();

        assert!(!is_cached(&dest, &target(3, DIGEST_123)).unwrap());
    }

    #[test]
    fn test_is_cached_missing_file() {
        let temp = tempfile::tempdir().unwrap();
        let dest = temp.path().join("absent.txt");

        assert!(!is_cached(&dest, &target(3, DIGEST_123)).unwrap());
    }

    #[test]
    fn test_refresh_without_root_fails_at_refresh() {
        let temp = tempfile::tempdir().unwrap();
        let request = UpdateRequest {
            metadata_dir: temp.path(),
            target: "file.txt",
            metadata_url: "http://127.0.0.1:9",
            artifact_url: "http://127.0.0.1:9",
            output_dir: temp.path(),
            hash_prefix: false,
        };
        let err = TufUpdater::new().download_target(&request).unwrap_err();
        assert_eq!(err.stage(), UpdateStage::Refresh);
    }
}
