// build.rs

use clap::{Arg, ArgAction, Command};
use clap_mangen::Man;
use std::env;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// Common argument: trusted root location
fn root_arg() -> Arg {
    Arg::new("root")
        .short('r')
        .long("root")
        .value_name("ROOT")
        .help("Trusted Root metadata (URL or local path)")
}

/// Common argument: metadata URL
fn metadata_url_arg() -> Arg {
    Arg::new("metadata_url")
        .short('m')
        .long("metadata-url")
        .value_name("URL")
        .help("Metadata URL")
}

/// Common argument: artifact base URL
fn artifact_url_arg() -> Arg {
    Arg::new("artifact_url")
        .short('a')
        .long("artifact-url")
        .value_name("URL")
        .help("Content artifact base URL")
}

fn artifact_hash_arg() -> Arg {
    Arg::new("artifact_hash")
        .long("artifact-hash")
        .action(ArgAction::SetTrue)
        .help("Add hash prefix to artifact")
}

fn build_cli() -> Command {
    Command::new("tufie")
        .version(env!("CARGO_PKG_VERSION"))
        .author("TUFie Contributors")
        .about("The Update Framework (TUF) Command Line Interface")
        .arg(
            Arg::new("config")
                .short('c')
                .long("config")
                .value_name("PATH")
                .help("Config file (default: ~/.tufie/config.yml)"),
        )
        .arg(
            Arg::new("verbose")
                .short('v')
                .long("verbose")
                .action(ArgAction::SetTrue)
                .help("Enable debug logging"),
        )
        .subcommand(
            Command::new("download")
                .about("Download artifact from content url using TUF metadata repository")
                .arg(Arg::new("artifact").required(true).value_name("ARTIFACT"))
                .arg(root_arg())
                .arg(metadata_url_arg())
                .arg(artifact_url_arg())
                .arg(
                    Arg::new("directory_prefix")
                        .short('P')
                        .long("directory-prefix")
                        .value_name("PREFIX")
                        .help("Save artifact to PREFIX/.. (default: current directory)"),
                )
                .arg(artifact_hash_arg())
                .arg(
                    Arg::new("repository")
                        .long("repository")
                        .value_name("NAME")
                        .help("Use this repository instead of the default one"),
                ),
        )
        .subcommand(
            Command::new("repository")
                .about("Manage TUF repository configurations")
                .arg(Arg::new("name").value_name("REPOSITORY NAME"))
                .subcommand(Command::new("list").about("List all repositories"))
                .subcommand(
                    Command::new("set")
                        .about("Set the default repository")
                        .arg(Arg::new("name").required(true)),
                )
                .subcommand(
                    Command::new("add")
                        .about("Add a new repository")
                        .arg(
                            Arg::new("name")
                                .short('n')
                                .long("name")
                                .required(true)
                                .help("Repository name"),
                        )
                        .arg(root_arg().required(true))
                        .arg(metadata_url_arg().required(true))
                        .arg(artifact_url_arg().required(true))
                        .arg(
                            Arg::new("default")
                                .short('d')
                                .long("default")
                                .action(ArgAction::SetTrue)
                                .help("Set repository as default"),
                        )
                        .arg(artifact_hash_arg()),
                )
                .subcommand(
                    Command::new("remove")
                        .about("Remove a repository")
                        .arg(Arg::new("name").required(true)),
                ),
        )
        .subcommand(
            Command::new("completions")
                .about("Generate shell completions")
                .arg(Arg::new("shell").required(true)),
        )
}

fn write_man_page(out_dir: &Path) -> io::Result<PathBuf> {
    fs::create_dir_all(out_dir)?;
    let mut page = Vec::new();
    Man::new(build_cli()).render(&mut page)?;
    let path = out_dir.join("tufie.1");
    fs::write(&path, page)?;
    Ok(path)
}

fn main() {
    println!("cargo:rerun-if-changed=build.rs");

    let Some(manifest_dir) = env::var_os("CARGO_MANIFEST_DIR") else {
        println!("cargo:warning=skipping man page: CARGO_MANIFEST_DIR unset");
        return;
    };

    if let Err(e) = write_man_page(&Path::new(&manifest_dir).join("man")) {
        println!("cargo:warning=skipping man page: {e}");
    }
}
