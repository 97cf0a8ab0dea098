// src/cli/repository.rs
//! Repository profile commands

use clap::{Args, Subcommand};

/// `repository [NAME]` shows a profile; subcommands manage them
#[derive(Args)]
#[command(args_conflicts_with_subcommands = true)]
pub struct RepositoryArgs {
    /// Repository to show (default: the default repository)
    #[arg(value_name = "REPOSITORY NAME")]
    pub name: Option<String>,

    #[command(subcommand)]
    pub command: Option<RepositoryCommands>,
}

#[derive(Subcommand)]
pub enum RepositoryCommands {
    /// List all repositories
    List,

    /// Set the default repository
    Set {
        /// Repository name
        name: String,
    },

    /// Add a new repository
    Add {
        /// Repository name
        #[arg(short, long)]
        name: String,

        /// Trusted root metadata (URL or local path)
        #[arg(short, long)]
        root: String,

        /// Metadata URL
        #[arg(short, long)]
        metadata_url: String,

        /// Content artifact base URL
        #[arg(short, long)]
        artifact_url: String,

        /// Set repository as default
        #[arg(short, long)]
        default: bool,

        /// Add hash prefix to artifact
        #[arg(long)]
        artifact_hash: bool,
    },

    /// Remove a repository
    Remove {
        /// Repository name
        name: String,
    },
}
