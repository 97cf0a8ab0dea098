// src/workspace.rs

//! Local workspace layout
//!
//! ```text
//! ~/.tufie/
//! ├── config.yml
//! └── metadata/
//!     └── <sha256 of metadata URL>/
//!         ├── root.json
//!         └── ... (metadata cached by the updater)
//! ```
//!
//! The base directory is resolved once, through a [`HomeDir`] capability,
//! and the resulting [`Workspace`] is passed to whatever needs it.

use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

use crate::error::{Error, Result};

/// Name of the workspace directory under the user home
pub const BASE_DIR_NAME: &str = ".tufie";

/// Subdirectory holding one directory per metadata source
pub const METADATA_DIR_NAME: &str = "metadata";

/// Configuration file names, in lookup order. New files use the first.
pub const CONFIG_FILE_NAMES: [&str; 2] = ["config.yml", "config.yaml"];

/// Source of the user home directory
pub trait HomeDir {
    /// Home directory of the current user, if it can be determined
    fn home_dir(&self) -> Option<PathBuf>;
}

/// Home directory as reported by the operating system
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemHome;

impl HomeDir for SystemHome {
    fn home_dir(&self) -> Option<PathBuf> {
        dirs::home_dir()
    }
}

/// A fixed home directory
#[derive(Debug, Clone)]
pub struct FixedHome(pub PathBuf);

impl HomeDir for FixedHome {
    fn home_dir(&self) -> Option<PathBuf> {
        Some(self.0.clone())
    }
}

/// Resolve `<home>/.tufie`
pub fn base_directory(home: &dyn HomeDir) -> Result<PathBuf> {
    let home = home.home_dir().ok_or(Error::HomeDirUnavailable)?;
    Ok(home.join(BASE_DIR_NAME))
}

/// The on-disk workspace rooted at the base directory
#[derive(Debug, Clone)]
pub struct Workspace {
    base: PathBuf,
}

impl Workspace {
    /// Workspace under the given user's home directory
    pub fn from_home(home: &dyn HomeDir) -> Result<Self> {
        Ok(Self::at(base_directory(home)?))
    }

    /// Workspace rooted at an explicit base directory
    pub fn at(base: impl Into<PathBuf>) -> Self {
        Self { base: base.into() }
    }

    pub fn base_dir(&self) -> &Path {
        &self.base
    }

    pub fn metadata_dir(&self) -> PathBuf {
        self.base.join(METADATA_DIR_NAME)
    }

    /// Directory for the metadata source with this fingerprint
    pub fn repository_dir(&self, fingerprint: &str) -> PathBuf {
        self.metadata_dir().join(fingerprint)
    }

    /// Default configuration file location
    ///
    /// Returns the first existing file from [`CONFIG_FILE_NAMES`], or the
    /// first name when neither exists.
    pub fn config_path(&self) -> PathBuf {
        CONFIG_FILE_NAMES
            .iter()
            .map(|name| self.base.join(name))
            .find(|path| path.is_file())
            .unwrap_or_else(|| self.base.join(CONFIG_FILE_NAMES[0]))
    }

    /// Ensure `<base>/metadata` exists
    pub fn initialize(&self) -> Result<()> {
        create_dir_all(&self.metadata_dir())
    }

    /// Ensure `<base>/metadata/<fingerprint>` exists and return it
    ///
    /// If `metadata` vanished since initialization, or something other than
    /// a directory now sits at that path, it is recreated first.
    pub fn provision_repository_dir(&self, fingerprint: &str) -> Result<PathBuf> {
        let metadata_dir = self.metadata_dir();

        match fs::metadata(&metadata_dir) {
            Ok(meta) if meta.is_dir() => {}
            Ok(_) => {
                warn!(
                    "{} is not a directory, recreating it",
                    metadata_dir.display()
                );
                fs::remove_file(&metadata_dir).map_err(|source| Error::DirectoryError {
                    path: metadata_dir.clone(),
                    source,
                })?;
                self.initialize()?;
            }
            Err(_) => self.initialize()?,
        }

        let repo_dir = metadata_dir.join(fingerprint);
        create_dir_all(&repo_dir)?;
        debug!("Provisioned repository directory {}", repo_dir.display());
        Ok(repo_dir)
    }
}

fn create_dir_all(path: &Path) -> Result<()> {
    fs::create_dir_all(path).map_err(|source| Error::DirectoryError {
        path: path.to_path_buf(),
        source,
    })
}
