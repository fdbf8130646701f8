use crate::store::DEFAULT_TASKS_FILE;
use config::builder::DefaultState;
use config::{ConfigBuilder, ConfigError};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Base name of the optional config file looked up in the working directory
/// (`task-cli.toml`, `task-cli.yaml`, `task-cli.json`, ...).
pub const CONFIG_FILE_NAME: &str = "task-cli";
pub const ENV_PREFIX: &str = "TASK_CLI";

#[derive(Clone, Debug, Deserialize, Serialize, PartialEq)]
pub struct Config {
    pub tasks_file: PathBuf,
}

impl Config {
    /// Loads configuration from the optional config file in the working
    /// directory, then from `TASK_CLI_*` environment variables.
    pub fn new() -> anyhow::Result<Self> {
        let settings = Self::defaults()?
            .add_source(config::File::with_name(CONFIG_FILE_NAME).required(false))
            .add_source(config::Environment::with_prefix(ENV_PREFIX))
            .build()?;

        Ok(settings.try_deserialize()?)
    }

    /// Reads only the given file, which must exist, on top of the defaults.
    pub fn from_file(path: &Path) -> anyhow::Result<Self> {
        let settings = Self::defaults()?
            .add_source(config::File::from(path))
            .build()?;

        Ok(settings.try_deserialize()?)
    }

    fn defaults() -> Result<ConfigBuilder<DefaultState>, ConfigError> {
        config::Config::builder().set_default("tasks_file", DEFAULT_TASKS_FILE)
    }
}
