//! Runtime configuration resolved from flags and environment.
//!
//! # Invariants
//! - `data_dir` is absolute once resolved.
//! - The database and log directory always live under `data_dir`.

use anyhow::{bail, Context, Result};
use std::path::{Path, PathBuf};
use std::time::Duration;

pub const DEFAULT_DATA_DIR_NAME: &str = ".linkdeck";
pub const DB_FILE_NAME: &str = "linkdeck.sqlite3";
pub const LOG_DIR_NAME: &str = "logs";
pub const DEFAULT_OEMBED_TIMEOUT_SECS: u64 = 10;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub data_dir: PathBuf,
    pub log_level: String,
    pub oembed_timeout: Duration,
}

impl Config {
    /// Builds the config, anchoring relative or missing data dirs at `cwd`.
    pub fn resolve(
        data_dir: Option<&Path>,
        log_level: Option<&str>,
        oembed_timeout_secs: u64,
        cwd: &Path,
    ) -> Result<Self> {
        if oembed_timeout_secs == 0 {
            bail!("oembed timeout must be at least one second");
        }
        let data_dir = match data_dir {
            Some(dir) if dir.is_absolute() => dir.to_path_buf(),
            Some(dir) => cwd.join(dir),
            None => cwd.join(DEFAULT_DATA_DIR_NAME),
        };
        let log_level = log_level
            .map(str::trim)
            .filter(|level| !level.is_empty())
            .unwrap_or_else(|| linkdeck_core::default_log_level())
            .to_string();

        Ok(Self {
            data_dir,
            log_level,
            oembed_timeout: Duration::from_secs(oembed_timeout_secs),
        })
    }

    pub fn db_path(&self) -> PathBuf {
        self.data_dir.join(DB_FILE_NAME)
    }

    pub fn log_dir(&self) -> PathBuf {
        self.data_dir.join(LOG_DIR_NAME)
    }

    /// Creates `data_dir` if missing.
    pub fn ensure_data_dir(&self) -> Result<()> {
        std::fs::create_dir_all(&self.data_dir).with_context(|| {
            format!("failed to create data dir `{}`", self.data_dir.display())
        })
    }
}
