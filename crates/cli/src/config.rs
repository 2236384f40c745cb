use std::{
    fs,
    path::{Path, PathBuf},
};

use auctioneer_core::{Params, ParamsError};
use serde::Deserialize;
use thiserror::Error;

pub const DEFAULT_CONFIG_PATH: &str = "auction.toml";

#[derive(Debug, Default, Clone, Deserialize, PartialEq)]
pub struct AuctionConfig {
    #[serde(default)]
    pub params: Params,
    /// Genesis snapshot used when a command is not given one explicitly.
    pub genesis: Option<PathBuf>,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config at {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("failed to parse toml at {path}: {source}")]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },
    #[error("invalid params in {path}: {source}")]
    InvalidParams {
        path: PathBuf,
        source: ParamsError,
    },
}

pub fn load_config(path: impl AsRef<Path>) -> Result<AuctionConfig, ConfigError> {
    let path = path.as_ref();
    let contents = fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    let mut config: AuctionConfig =
        toml::from_str(&contents).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;

    config
        .params
        .validate()
        .map_err(|source| ConfigError::InvalidParams {
            path: path.to_path_buf(),
            source,
        })?;

    // relative genesis paths are resolved against the config file
    if let Some(genesis) = config.genesis.take() {
        let base = path.parent().unwrap_or_else(|| Path::new(""));
        config.genesis = Some(base.join(genesis));
    }

    Ok(config)
}

/// Loads `path`, falling back to defaults when the default config file is
/// simply absent. A missing file that was asked for by name is still an error.
pub fn load_config_or_default(path: impl AsRef<Path>) -> Result<AuctionConfig, ConfigError> {
    let path = path.as_ref();
    if path == Path::new(DEFAULT_CONFIG_PATH) && !path.exists() {
        return Ok(AuctionConfig::default());
    }
    load_config(path)
}
