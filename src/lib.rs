// src/lib.rs

//! TUFie
//!
//! Command line client for The Update Framework (TUF). Users keep named
//! repository profiles (metadata URL, artifact base URL, trusted root) and
//! download artifacts whose integrity is checked against TUF metadata
//! seeded by that root, trusted on first use.
//!
//! # Architecture
//!
//! - [`trust`]: base64 transport codec for trusted roots, and fetching them
//! - [`workspace`]: `~/.tufie` layout, one metadata directory per source
//! - [`config`]: the profile store persisted as YAML
//! - [`download`]: parameter resolution and delegation to a TUF updater

pub mod config;
pub mod download;
mod error;
pub mod hash;
pub mod trust;
pub mod workspace;

pub use config::{ConfigStore, Configuration, DefaultChange, RepositoryProfile, SetDefault};
pub use download::{
    DownloadRequest, Downloader, Overrides, ResolvedParameters, TufUpdater, UpdateRequest,
    UpdateStage, Updater, UpdaterError,
};
pub use error::{Error, ErrorCategory, MissingParameter, Result};
pub use hash::fingerprint;
pub use workspace::{FixedHome, HomeDir, SystemHome, Workspace};
