// src/cli/mod.rs
//! CLI definitions for TUFie
//!
//! This module contains all command-line interface definitions using clap.
//! The actual command implementations are in the `commands` module.
//!
//! - `download` - Download an artifact verified through TUF metadata
//! - `repository` - Manage named repository profiles
//! - `completions` - Generate shell completions

use clap::{Parser, Subcommand};
use clap_complete::Shell;
use std::path::PathBuf;

mod repository;

pub use repository::{RepositoryArgs, RepositoryCommands};

#[derive(Parser)]
#[command(name = "tufie")]
#[command(author = "TUFie Contributors")]
#[command(version)]
#[command(about = "TUF Command Line Interface", long_about = "The Update Framework (TUF) Command Line Interface")]
pub struct Cli {
    /// Config file (default: ~/.tufie/config.yml)
    #[arg(short, long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Download artifact from content url using TUF metadata repository
    Download {
        /// Artifact path as listed in the repository's targets metadata
        #[arg(value_name = "ARTIFACT")]
        artifact: String,

        /// Trusted root metadata (URL or local path)
        #[arg(short, long)]
        root: Option<String>,

        /// Metadata URL
        #[arg(short, long)]
        metadata_url: Option<String>,

        /// Content artifact base URL
        #[arg(short, long)]
        artifact_url: Option<String>,

        /// Save artifact to PREFIX/.. (default: current directory)
        #[arg(short = 'P', long, value_name = "PREFIX")]
        directory_prefix: Option<PathBuf>,

        /// Add hash prefix to artifact
        #[arg(long)]
        artifact_hash: bool,

        /// Use this repository instead of the default one
        #[arg(long, value_name = "NAME")]
        repository: Option<String>,
    },

    /// Manage TUF repository configurations
    Repository(RepositoryArgs),

    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}
