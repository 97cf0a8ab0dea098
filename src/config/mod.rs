// src/config/mod.rs

//! Repository profile configuration
//!
//! A [`Configuration`] holds the named [`RepositoryProfile`]s and the name
//! of the default one. Invariant: when a default is set it names an
//! existing profile (files edited by hand may break this; such a default is
//! logged on load and otherwise ignored).
//!
//! [`ConfigStore`] binds a configuration to its file. Every mutation is
//! applied to a copy, the copy is written out atomically, and only then does
//! it replace the in-memory state, so a failed write changes nothing.
//! There is no locking between processes: concurrent writers race and the
//! last rename wins.

mod document;

use std::collections::BTreeMap;
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;
use tracing::{debug, info, warn};

use crate::error::{Error, Result};

/// A named repository: where metadata and artifacts live, and what to trust
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepositoryProfile {
    pub name: String,
    pub metadata_url: String,
    pub artifact_base_url: String,
    /// Base64 transport form of the trusted root
    pub trusted_root: String,
    /// Prefix downloaded artifact file names with their content hash
    pub hash_prefix: bool,
}

impl RepositoryProfile {
    pub fn new(
        name: impl Into<String>,
        metadata_url: impl Into<String>,
        artifact_base_url: impl Into<String>,
        trusted_root: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            metadata_url: metadata_url.into(),
            artifact_base_url: artifact_base_url.into(),
            trusted_root: trusted_root.into(),
            hash_prefix: false,
        }
    }

    pub fn with_hash_prefix(mut self, hash_prefix: bool) -> Self {
        self.hash_prefix = hash_prefix;
        self
    }

    /// Check that every required field is present
    pub fn validate(&self) -> Result<()> {
        let required = [
            ("name", &self.name),
            ("metadata URL", &self.metadata_url),
            ("artifact base URL", &self.artifact_base_url),
            ("trusted root", &self.trusted_root),
        ];
        for (field, value) in required {
            if value.trim().is_empty() {
                return Err(Error::InvalidProfile(format!("{field} must not be empty")));
            }
        }
        Ok(())
    }
}

/// Result of [`Configuration::set_default`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SetDefault {
    /// The profile was already the default
    Unchanged,
    Updated,
}

/// How removing a profile affected the default
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DefaultChange {
    /// The removed profile was not the default
    Unchanged,
    /// The default moved to this remaining profile
    Reassigned(String),
    /// No profiles remain, so there is no default
    Cleared,
}

/// Repository profiles and the default selection
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Configuration {
    default_repository: Option<String>,
    repositories: BTreeMap<String, RepositoryProfile>,
}

impl Configuration {
    pub fn is_empty(&self) -> bool {
        self.repositories.is_empty()
    }

    /// Name of the default profile, if one is selected
    pub fn default_name(&self) -> Option<&str> {
        self.default_repository.as_deref()
    }

    /// The default profile, if one is selected and exists
    pub fn default_profile(&self) -> Option<&RepositoryProfile> {
        self.default_name()
            .and_then(|name| self.repositories.get(name))
    }

    /// All profiles
    pub fn list(&self) -> Vec<&RepositoryProfile> {
        self.repositories.values().collect()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.repositories.contains_key(name)
    }

    pub fn get(&self, name: &str) -> Result<&RepositoryProfile> {
        self.repositories
            .get(name)
            .ok_or_else(|| Error::NotFound(name.to_string()))
    }

    /// Insert a new profile
    ///
    /// The profile becomes the default when `make_default` is set or when no
    /// configured profile is the default yet. A default naming a missing
    /// profile counts as unset.
    pub fn add(&mut self, profile: RepositoryProfile, make_default: bool) -> Result<()> {
        profile.validate()?;
        if self.contains(&profile.name) {
            return Err(Error::AlreadyExists(profile.name));
        }

        if make_default || self.default_profile().is_none() {
            self.default_repository = Some(profile.name.clone());
        }
        self.repositories.insert(profile.name.clone(), profile);
        Ok(())
    }

    pub fn set_default(&mut self, name: &str) -> Result<SetDefault> {
        if !self.contains(name) {
            return Err(Error::NotFound(name.to_string()));
        }
        if self.default_name() == Some(name) {
            return Ok(SetDefault::Unchanged);
        }
        self.default_repository = Some(name.to_string());
        Ok(SetDefault::Updated)
    }

    /// Delete a profile, reassigning the default if it was removed
    ///
    /// The new default is the lexicographically first remaining name.
    pub fn remove(&mut self, name: &str) -> Result<DefaultChange> {
        if self.repositories.remove(name).is_none() {
            return Err(Error::NotFound(name.to_string()));
        }

        if self.default_name() != Some(name) {
            return Ok(DefaultChange::Unchanged);
        }

        match self.repositories.keys().next() {
            Some(next) => {
                let next = next.clone();
                self.default_repository = Some(next.clone());
                Ok(DefaultChange::Reassigned(next))
            }
            None => {
                self.default_repository = None;
                Ok(DefaultChange::Cleared)
            }
        }
    }
}

/// A configuration bound to its file
#[derive(Debug)]
pub struct ConfigStore {
    path: PathBuf,
    config: Configuration,
}

impl ConfigStore {
    /// Load the configuration at `path`
    ///
    /// A missing file yields an empty configuration.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let config = Self::load(&path)?;
        Ok(Self { path, config })
    }

    /// Read a configuration file without binding to it
    pub fn load(path: &Path) -> Result<Configuration> {
        let text = match fs::read_to_string(path) {
            Ok(text) => text,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                debug!("No configuration at {}, starting empty", path.display());
                return Ok(Configuration::default());
            }
            Err(e) => return Err(Error::Io(e)),
        };

        let config = document::parse(&text, path)?;
        info!("Config file used: {}", path.display());

        if let Some(name) = config.default_name() {
            if !config.contains(name) {
                warn!("Default repository '{}' is not configured", name);
            }
        }
        Ok(config)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn config(&self) -> &Configuration {
        &self.config
    }

    pub fn list(&self) -> Vec<&RepositoryProfile> {
        self.config.list()
    }

    pub fn get(&self, name: &str) -> Result<&RepositoryProfile> {
        self.config.get(name)
    }

    /// Add a profile and persist
    pub fn add(&mut self, profile: RepositoryProfile, make_default: bool) -> Result<()> {
        let name = profile.name.clone();
        self.update(|config| config.add(profile, make_default))?;
        info!("Added repository: {}", name);
        Ok(())
    }

    /// Select the default profile, persisting only if it changed
    pub fn set_default(&mut self, name: &str) -> Result<SetDefault> {
        let mut next = self.config.clone();
        let outcome = next.set_default(name)?;
        if outcome == SetDefault::Updated {
            self.save(&next)?;
            self.config = next;
            info!("Default repository set to '{}'", name);
        }
        Ok(outcome)
    }

    /// Remove a profile and persist
    pub fn remove(&mut self, name: &str) -> Result<DefaultChange> {
        let change = self.update(|config| config.remove(name))?;
        info!("Removed repository: {}", name);
        Ok(change)
    }

    fn update<T>(&mut self, apply: impl FnOnce(&mut Configuration) -> Result<T>) -> Result<T> {
        let mut next = self.config.clone();
        let outcome = apply(&mut next)?;
        self.save(&next)?;
        self.config = next;
        Ok(outcome)
    }

    /// Write the whole configuration: temp file in the same directory, then rename
    fn save(&self, config: &Configuration) -> Result<()> {
        let contents = document::render(config, &self.path)?;

        let parent = match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };
        fs::create_dir_all(parent).map_err(|source| Error::DirectoryError {
            path: parent.to_path_buf(),
            source,
        })?;

        let mut temp = NamedTempFile::new_in(parent)?;
        temp.write_all(contents.as_bytes())?;
        temp.as_file().sync_all()?;
        temp.persist(&self.path).map_err(|e| e.error)?;

        debug!("Wrote configuration to {}", self.path.display());
        Ok(())
    }
}
