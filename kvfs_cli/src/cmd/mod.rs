use std::{
    path::{Path, PathBuf},
    sync::Arc,
};

use anyhow::Result;
use kvfs::KvFs;
use kvfs_core::KvStore;
use kvfs_store_memory::MemoryStore;
use kvfs_store_redb::RedbStore;

use crate::config::{CliConfig, CliConfigStore};

mod content;
mod edit;
mod listing;

pub use content::{run_read, run_write};
pub use edit::{run_cp, run_mkdir, run_mv, run_rm};
pub use listing::{run_ls, run_stat};

pub async fn run_command(
    scope: &str,
    config_file: PathBuf,
    data_dir: &Path,
    cmd: crate::Commands,
) -> Result<()> {
    let fs = match cmd {
        crate::Commands::Config { cmd } => return cmd.run(config_file, data_dir),
        _ => {
            let config = CliConfig::load_or_default(&config_file, data_dir)?;
            open_fs(&config)?.scope(scope)
        }
    };

    match cmd {
        crate::Commands::Config { .. } => Ok(()),
        crate::Commands::Write { path, from, data } => run_write(&fs, &path, from, data).await,
        crate::Commands::Read { path, out } => run_read(&fs, &path, out).await,
        crate::Commands::Mkdir { path, parents } => run_mkdir(&fs, &path, parents).await,
        crate::Commands::Rm { path } => run_rm(&fs, &path).await,
        crate::Commands::Cp { src, dest } => run_cp(&fs, &src, &dest).await,
        crate::Commands::Mv { src, dest } => run_mv(&fs, &src, &dest).await,
        crate::Commands::Ls { path, long } => run_ls(&fs, &path, long).await,
        crate::Commands::Stat { path } => run_stat(&fs, &path).await,
    }
}

fn open_fs(config: &CliConfig) -> Result<KvFs> {
    let store: Arc<dyn KvStore> = match &config.store {
        CliConfigStore::Redb(redb) => Arc::new(RedbStore::create(redb)?),
        CliConfigStore::Memory => Arc::new(MemoryStore::new()),
    };
    Ok(KvFs::new(store, config.fs.clone()))
}

