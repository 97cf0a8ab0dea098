// src/error.rs

//! Error types for TUFie
//!
//! All library operations return [`Result`]. Each variant belongs to one of
//! the [`ErrorCategory`] groups so command handlers can tell user mistakes
//! apart from environment and trust failures.

use std::fmt;
use std::io;
use std::path::PathBuf;
use thiserror::Error;

use crate::download::UpdaterError;

/// Result type for TUFie operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors produced by the configuration store, workspace, codec and orchestrator
#[derive(Error, Debug)]
pub enum Error {
    /// No repository profile with this name
    #[error("No repository '{0}'")]
    NotFound(String),

    /// A repository profile with this name is already configured
    #[error("Repository '{0}' already exists")]
    AlreadyExists(String),

    /// Profile fields failed validation before insertion
    #[error("Invalid repository profile: {0}")]
    InvalidProfile(String),

    /// Required download parameters that were neither configured nor given
    #[error("{}", MissingList(.0))]
    MissingParameters(Vec<MissingParameter>),

    /// The user home directory could not be determined
    #[error("Unable to determine the user home directory")]
    HomeDirUnavailable,

    /// A workspace directory could not be created
    #[error("Failed to create directory {}: {source}", .path.display())]
    DirectoryError {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// Filesystem failure outside directory provisioning
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// Trusted root transport string is not valid base64 or JSON
    #[error("Invalid trusted root encoding: {0}")]
    DecodeError(String),

    /// Trusted root source could not be read
    #[error("Failed to fetch trusted root from '{source_uri}': {reason}")]
    FetchError { source_uri: String, reason: String },

    /// Trusted root document is malformed
    #[error("Malformed trusted root: {0}")]
    ParseError(String),

    /// Configuration file could not be parsed or serialized
    #[error("Invalid configuration file {}: {reason}", .path.display())]
    ConfigFormat { path: PathBuf, reason: String },

    /// The updater collaborator failed
    #[error("Failed at stage '{stage}': {0}", stage = .0.stage())]
    Updater(#[from] UpdaterError),
}

/// Broad error classes used for reporting
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    /// Missing or contradictory parameters, unknown or duplicate names
    UserInput,
    /// Home directory, permission and I/O failures
    Environment,
    /// Malformed trusted root material
    TrustMaterial,
    /// Failures reported by the updater collaborator
    Collaborator,
}

impl Error {
    /// Classify this error
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::NotFound(_)
            | Self::AlreadyExists(_)
            | Self::InvalidProfile(_)
            | Self::MissingParameters(_) => ErrorCategory::UserInput,
            Self::HomeDirUnavailable
            | Self::DirectoryError { .. }
            | Self::Io(_)
            | Self::ConfigFormat { .. } => ErrorCategory::Environment,
            Self::DecodeError(_) | Self::FetchError { .. } | Self::ParseError(_) => {
                ErrorCategory::TrustMaterial
            }
            Self::Updater(_) => ErrorCategory::Collaborator,
        }
    }
}

/// A required download parameter
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MissingParameter {
    TrustedRoot,
    MetadataUrl,
    ArtifactUrl,
}

impl MissingParameter {
    /// Command-line flag that supplies this parameter
    pub const fn flag(&self) -> &'static str {
        match self {
            Self::TrustedRoot => "--root",
            Self::MetadataUrl => "--metadata-url",
            Self::ArtifactUrl => "--artifact-url",
        }
    }
}

impl fmt::Display for MissingParameter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} is required when no repository is configured", self.flag())
    }
}

struct MissingList<'a>(&'a [MissingParameter]);

impl fmt::Display for MissingList<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Missing required parameters:")?;
        for param in self.0 {
            writeln!(f, "  {param}")?;
        }
        write!(f, "Use --help for more details")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_parameters_lists_every_flag() {
        let err = Error::MissingParameters(vec![
            MissingParameter::TrustedRoot,
            MissingParameter::MetadataUrl,
            MissingParameter::ArtifactUrl,
        ]);
        let message = err.to_string();
        assert!(message.contains("--root"));
        assert!(message.contains("--metadata-url"));
        assert!(message.contains("--artifact-url"));
        assert_eq!(err.category(), ErrorCategory::UserInput);
    }

    #[test]
    fn test_updater_error_names_stage() {
        let err = Error::from(UpdaterError::TargetNotFound("file.txt".to_string()));
        assert!(err.to_string().contains("target-lookup"));
        assert_eq!(err.category(), ErrorCategory::Collaborator);
    }

    #[test]
    fn test_categories() {
        assert_eq!(
            Error::NotFound("x".to_string()).category(),
            ErrorCategory::UserInput
        );
        assert_eq!(Error::HomeDirUnavailable.category(), ErrorCategory::Environment);
        assert_eq!(
            Error::DecodeError("bad".to_string()).category(),
            ErrorCategory::TrustMaterial
        );
    }
}
