use std::{path::PathBuf, process::ExitCode};

use anyhow::Context;
use clap::{ArgAction, Parser, Subcommand};
use clap_verbosity_flag::WarnLevel;
use directories::ProjectDirs;
use kvfs::FsError;

use crate::init_config::CmdConfig;

mod cmd;
mod config;
mod init_config;

#[derive(Parser)]
#[command(version, about, long_about = None)]
struct Cli {
    /// identity scope the command operates in
    #[arg(short, long, value_name = "ID", default_value = "local")]
    scope: String,

    /// config file to use instead of ~/.config/kvfs/config.toml
    #[arg(long, value_name = "FILE", global = true)]
    config: Option<PathBuf>,

    #[command(flatten)]
    verbosity: clap_verbosity_flag::Verbosity<WarnLevel>,

    #[command(subcommand)]
    cmd: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Modify the kvfs config file
    Config {
        #[command(subcommand)]
        cmd: CmdConfig,
    },
    /// Write a whole file, creating its parent directory
    Write {
        path: String,
        /// Local file to take the content from
        #[arg(long, value_name = "FILE", conflicts_with = "data")]
        from: Option<PathBuf>,
        /// Literal content; stdin is read when neither --from nor --data is given
        #[arg(long, value_name = "STRING")]
        data: Option<String>,
    },
    /// Print a file, or save it with --out
    Read {
        path: String,
        #[arg(long, value_name = "FILE")]
        out: Option<PathBuf>,
    },
    /// Create a directory and its parent
    Mkdir {
        path: String,
        /// Create every missing ancestor
        #[arg(short, long, action = ArgAction::SetTrue)]
        parents: bool,
    },
    /// Delete a file or a directory with everything below it
    Rm { path: String },
    /// Copy a file or directory subtree
    Cp { src: String, dest: String },
    /// Move a file or directory subtree
    Mv { src: String, dest: String },
    /// List the immediate children of a directory
    Ls {
        #[arg(default_value = "/")]
        path: String,
        /// Also print sizes and modification times
        #[arg(long, action = ArgAction::SetTrue)]
        long: bool,
    },
    /// Show metadata for a file or directory
    Stat { path: String },
}

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    let cli = Cli::parse();
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_max_level(cli.verbosity)
        .init();

    // - Config under: ~/.config/kvfs/config.toml
    // - Data under:   ~/.local/share/kvfs/
    let dirs =
        ProjectDirs::from("", "", "kvfs").context("failed to determine config directory path")?;
    let config_file = cli
        .config
        .clone()
        .unwrap_or_else(|| dirs.config_dir().join("config.toml"));
    let data_dir = dirs.data_dir();

    match cmd::run_command(&cli.scope, config_file, data_dir, cli.cmd).await {
        Ok(()) => Ok(ExitCode::SUCCESS),
        Err(err) => match err.downcast_ref::<FsError>() {
            Some(fs_err) if fs_err.is_usage() => {
                eprintln!("error: {fs_err}");
                Ok(ExitCode::from(2))
            }
            Some(fs_err) if fs_err.is_not_found() => {
                eprintln!("error: {fs_err}");
                Ok(ExitCode::from(3))
            }
            _ => Err(err),
        },
    }
}
