use std::path::Path;

use anyhow::Context;
use kvfs::FsConfig;
use kvfs_store_redb::RedbStoreConfig;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CliConfig {
    pub store: CliConfigStore,
    #[serde(default)]
    pub fs: FsConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "type")]
#[serde(rename_all = "snake_case")]
pub enum CliConfigStore {
    Redb(RedbStoreConfig),
    /// Lives only as long as one command; useful for dry runs.
    Memory,
}

impl CliConfig {
    /// Config used when no file exists yet: a redb store under `data_dir`.
    pub fn with_data_dir(data_dir: &Path) -> Self {
        Self {
            store: CliConfigStore::Redb(RedbStoreConfig {
                path: data_dir.join("store").to_string_lossy().into_owned(),
            }),
            fs: FsConfig::default(),
        }
    }

    pub fn load_or_default(config_file: &Path, data_dir: &Path) -> anyhow::Result<Self> {
        if !config_file.exists() {
            return Ok(Self::with_data_dir(data_dir));
        }
        let contents = std::fs::read_to_string(config_file)
            .with_context(|| format!("failed to read config file {config_file:?}"))?;
        toml::from_str(&contents)
            .with_context(|| format!("could not parse config file {config_file:?}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_full_file() {
        let config: CliConfig = toml::from_str(
            r#"
[store]
type = "redb"
path = "/var/lib/kvfs"

[fs]
namespace = "files"
max_file_size = 1048576
"#,
        )
        .unwrap();

        assert_eq!(
            config.store,
            CliConfigStore::Redb(RedbStoreConfig {
                path: "/var/lib/kvfs".into()
            })
        );
        assert_eq!(config.fs.namespace, "files");
        assert_eq!(config.fs.max_file_size, Some(1_048_576));
    }

    #[test]
    fn fs_section_is_optional() {
        let config: CliConfig = toml::from_str("[store]\ntype = \"memory\"\n").unwrap();
        assert_eq!(config.store, CliConfigStore::Memory);
        assert_eq!(config.fs, FsConfig::default());
    }
}
