// src/commands/mod.rs
//! Command handlers for the TUFie CLI

mod download;
mod repository;

pub use download::{cmd_download, DownloadArgs};
pub use repository::{
    cmd_repository_add, cmd_repository_list, cmd_repository_remove, cmd_repository_set,
    cmd_repository_show, AddRepositoryArgs,
};
