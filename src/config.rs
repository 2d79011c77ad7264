//! User configuration read from `config.toml`.

use anyhow::{Context, Result};
use serde::Deserialize;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use crate::calc_engine::AngleMode;

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    pub angle_mode: AngleMode,
    /// Entries kept in the interactive history; older ones are dropped.
    pub history_limit: usize,
    /// `tracing` filter used when `RUST_LOG` is not set.
    pub log_filter: String,
    pub log_file: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            angle_mode: AngleMode::Degrees,
            history_limit: 100,
            log_filter: "warn".to_string(),
            log_file: None,
        }
    }
}

impl Config {
    /// `$XDG_CONFIG_HOME/bodmas/config.toml` or the platform equivalent.
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("bodmas").join("config.toml"))
    }

    pub fn from_toml(text: &str) -> Result<Self> {
        toml::from_str(text).context("invalid configuration")
    }

    /// Loads `path`, or the default location when `path` is `None`.
    ///
    /// A missing file at the default location yields the defaults; a missing
    /// file that was asked for explicitly is an error.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let (path, explicit) = match path {
            Some(p) => (p.to_path_buf(), true),
            None => match Self::default_path() {
                Some(p) => (p, false),
                None => return Ok(Config::default()),
            },
        };

        match fs::read_to_string(&path) {
            Ok(text) => {
                Self::from_toml(&text).with_context(|| format!("in {}", path.display()))
            }
            Err(e) if e.kind() == ErrorKind::NotFound && !explicit => Ok(Config::default()),
            Err(e) => Err(e).with_context(|| format!("cannot read {}", path.display())),
        }
    }
}
