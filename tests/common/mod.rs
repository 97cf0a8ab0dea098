// tests/common/mod.rs

//! Shared test utilities and helpers for integration tests.

#![allow(dead_code)]

use std::cell::RefCell;
use std::path::{Path, PathBuf};
use tempfile::TempDir;
use tufie::{ConfigStore, FixedHome, RepositoryProfile, UpdateRequest, Updater, UpdaterError, Workspace};

/// Path of the sample trusted root shipped with the tests
pub fn fixture_root_path() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures/test-root.json")
}

/// Create an isolated home directory with an initialized workspace and an
/// empty configuration store at the default location.
///
/// Returns (TempDir, Workspace, ConfigStore) - keep the TempDir alive to prevent cleanup.
pub fn setup_workspace() -> (TempDir, Workspace, ConfigStore) {
    let home = tempfile::tempdir().unwrap();
    let workspace = Workspace::from_home(&FixedHome(home.path().to_path_buf())).unwrap();
    workspace.initialize().unwrap();
    let store = ConfigStore::open(workspace.config_path()).unwrap();
    (home, workspace, store)
}

/// A profile whose trusted root is the fixture root
pub fn sample_profile(name: &str, metadata_url: &str, artifact_url: &str) -> RepositoryProfile {
    let root = tufie::trust::fetch_root(fixture_root_path().to_str().unwrap()).unwrap();
    RepositoryProfile::new(name, metadata_url, artifact_url, tufie::trust::encode(&root))
}

/// One recorded updater invocation
#[derive(Debug, Clone)]
pub struct RecordedCall {
    pub metadata_dir: PathBuf,
    pub root_json: Vec<u8>,
    pub target: String,
    pub metadata_url: String,
    pub artifact_url: String,
    pub output_dir: PathBuf,
    pub hash_prefix: bool,
}

/// Updater double: records each request and writes a placeholder artifact
#[derive(Default)]
pub struct FakeUpdater {
    pub calls: RefCell<Vec<RecordedCall>>,
    pub missing_targets: Vec<String>,
}

impl Updater for FakeUpdater {
    fn download_target(&self, request: &UpdateRequest<'_>) -> Result<PathBuf, UpdaterError> {
        let root_json = std::fs::read(request.metadata_dir.join("root.json"))
            .map_err(|e| UpdaterError::RefreshFailed(e.to_string()))?;

        self.calls.borrow_mut().push(RecordedCall {
            metadata_dir: request.metadata_dir.to_path_buf(),
            root_json,
            target: request.target.to_string(),
            metadata_url: request.metadata_url.to_string(),
            artifact_url: request.artifact_url.to_string(),
            output_dir: request.output_dir.to_path_buf(),
            hash_prefix: request.hash_prefix,
        });

        if self.missing_targets.iter().any(|t| t == request.target) {
            return Err(UpdaterError::TargetNotFound(request.target.to_string()));
        }

        std::fs::create_dir_all(request.output_dir)
            .map_err(|e| UpdaterError::DownloadFailed(e.to_string()))?;
        let path = request.output_dir.join(request.target);
        std::fs::write(&path, b"artifact")
            .map_err(|e| UpdaterError::DownloadFailed(e.to_string()))?;
        Ok(path)
    }
}
