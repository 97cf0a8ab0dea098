// src/main.rs

use anyhow::{Context, Result};
use clap::{CommandFactory, Parser};
use std::io;
use tracing::debug;
use tufie::{ConfigStore, SystemHome, Workspace};

mod cli;
mod commands;

use cli::{Cli, Commands, RepositoryCommands};

fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_writer(io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_level)),
        )
        .init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    if let Commands::Completions { shell } = cli.command {
        clap_complete::generate(shell, &mut Cli::command(), "tufie", &mut io::stdout());
        return Ok(());
    }

    let workspace = Workspace::from_home(&SystemHome)?;
    workspace
        .initialize()
        .context("Failed to initialize the TUFie workspace")?;

    let config_path = cli.config.unwrap_or_else(|| workspace.config_path());
    debug!("Using configuration path {}", config_path.display());
    let mut store = ConfigStore::open(config_path)?;

    match cli.command {
        Commands::Download {
            artifact,
            root,
            metadata_url,
            artifact_url,
            directory_prefix,
            artifact_hash,
            repository,
        } => commands::cmd_download(
            &store,
            &workspace,
            commands::DownloadArgs {
                artifact,
                root,
                metadata_url,
                artifact_url,
                directory_prefix,
                artifact_hash,
                repository,
            },
        ),

        Commands::Repository(args) => match args.command {
            None => commands::cmd_repository_show(&store, args.name.as_deref()),
            Some(RepositoryCommands::List) => commands::cmd_repository_list(&store),
            Some(RepositoryCommands::Set { name }) => {
                commands::cmd_repository_set(&mut store, &name)
            }
            Some(RepositoryCommands::Add {
                name,
                root,
                metadata_url,
                artifact_url,
                default,
                artifact_hash,
            }) => commands::cmd_repository_add(
                &mut store,
                commands::AddRepositoryArgs {
                    name,
                    root,
                    metadata_url,
                    artifact_url,
                    make_default: default,
                    artifact_hash,
                },
            ),
            Some(RepositoryCommands::Remove { name }) => {
                commands::cmd_repository_remove(&mut store, &name)
            }
        },

        Commands::Completions { .. } => Ok(()),
    }
}
