// src/commands/repository.rs
//! Repository profile commands

use anyhow::{Context, Result};
use tracing::info;
use tufie::{ConfigStore, DefaultChange, Error, RepositoryProfile, SetDefault};

/// Options for `repository add`
pub struct AddRepositoryArgs {
    pub name: String,
    pub root: String,
    pub metadata_url: String,
    pub artifact_url: String,
    pub make_default: bool,
    pub artifact_hash: bool,
}

fn print_repository(profile: &RepositoryProfile) {
    println!("\nRepository: {}", profile.name);
    println!("Artifact Base URL: {}", profile.artifact_base_url);
    println!("Metadata Base URL: {}", profile.metadata_url);
    println!(
        "Artifact hash prefix: {}",
        if profile.hash_prefix { "yes" } else { "no" }
    );
}

/// Show one repository, or the default one
pub fn cmd_repository_show(store: &ConfigStore, name: Option<&str>) -> Result<()> {
    let name = match name.or(store.config().default_name()) {
        Some(name) => name,
        None => {
            println!("Default repository not configured");
            return Ok(());
        }
    };

    let profile = store.get(name)?;
    print_repository(profile);
    Ok(())
}

/// List every repository
pub fn cmd_repository_list(store: &ConfigStore) -> Result<()> {
    info!("Listing repositories");
    println!(
        "\nDefault repository: {}",
        store.config().default_name().unwrap_or("")
    );
    for profile in store.list() {
        print_repository(profile);
    }
    Ok(())
}

/// Set the default repository
pub fn cmd_repository_set(store: &mut ConfigStore, name: &str) -> Result<()> {
    match store.set_default(name) {
        Ok(SetDefault::Unchanged) => {
            println!("\nNo changes. Current default repository is '{}'.", name);
            Ok(())
        }
        Ok(SetDefault::Updated) => {
            println!("\nUpdated default repository to '{}'.", name);
            Ok(())
        }
        Err(Error::NotFound(_)) => {
            cmd_repository_list(store)?;
            anyhow::bail!(
                "Repository '{}' doesn't exist. Use one of the repositories above.",
                name
            )
        }
        Err(e) => Err(e.into()),
    }
}

/// Add a repository, fetching its trusted root first
pub fn cmd_repository_add(store: &mut ConfigStore, args: AddRepositoryArgs) -> Result<()> {
    info!("Adding repository: {} ({})", args.name, args.metadata_url);

    let root = tufie::trust::fetch_root(&args.root)
        .with_context(|| format!("Failed to load trusted root for '{}'", args.name))?;

    let profile = RepositoryProfile::new(
        &args.name,
        args.metadata_url,
        args.artifact_url,
        tufie::trust::encode(&root),
    )
    .with_hash_prefix(args.artifact_hash);

    store.add(profile, args.make_default)?;

    println!("\nRepository '{}' added.", args.name);
    if store.config().default_name() == Some(args.name.as_str()) {
        println!("Default repository: {}", args.name);
    }
    Ok(())
}

/// Remove a repository
pub fn cmd_repository_remove(store: &mut ConfigStore, name: &str) -> Result<()> {
    info!("Removing repository: {}", name);
    let change = store.remove(name)?;

    println!("\nRepository '{}' removed.", name);
    match change {
        DefaultChange::Unchanged => {}
        DefaultChange::Reassigned(next) => println!("New default repository: {}", next),
        DefaultChange::Cleared => println!("No default repository configured."),
    }
    Ok(())
}
