use std::env::current_exe;
use std::path::{Path, PathBuf};
use std::str;
use directories_next::ProjectDirs;
use log::{debug, info, warn};

use crate::config::types::Config;
use crate::error::ConfigError;

/// `<exe stem>.json` next to the running binary.
fn portable_config_path() -> Option<PathBuf> {
    let exe = current_exe()
        .map_err(|err| warn!("Unable to locate the running executable: {}", err))
        .ok()?;
    let path = exe.with_extension("json");

    if path.file_stem().is_none() {
        warn!("Executable path {} has no file name", exe.to_string_lossy());
        return None;
    }
    Some(path)
}

/// Per-user location, e.g. `~/.config/device-mirror/device-mirror.json` on linux.
fn user_config_path() -> Option<PathBuf> {
    let dirs = ProjectDirs::from("org", "device-mirror", "device-mirror")?;
    Some(dirs.config_dir().join("device-mirror.json"))
}

fn default_config_path() -> Result<PathBuf, ConfigError> {
    let portable = portable_config_path().filter(|path| {
        let present = path.is_file();
        if !present {
            debug!("No portable config at {}", path.to_string_lossy());
        }
        present
    });

    portable.or_else(user_config_path).ok_or(ConfigError::NoConfigPath)
}

#[derive(Debug, Clone)]
pub struct ConfigIO {
    path: PathBuf,
}

impl ConfigIO {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        ConfigIO { path: path.into() }
    }

    /// Uses `explicit` if given, otherwise the portable path if that file exists, otherwise the
    /// per-user config directory.
    pub fn resolve(explicit: Option<PathBuf>) -> Result<Self, ConfigError> {
        let path = match explicit {
            Some(path) => path,
            None => default_config_path()?,
        };
        info!("Using config file {}", path.to_string_lossy());
        Ok(ConfigIO::new(path))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub async fn read(&self) -> Result<Config, ConfigError> {
        let content = tokio::fs::read(&self.path).await?;

        if content.is_empty() {
            return Ok(Config::default());
        }

        let content = str::from_utf8(&content)?;
        let config: Config = serde_json::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Like `read`, but a missing file yields the defaults.
    pub async fn read_or_default(&self) -> Result<Config, ConfigError> {
        match self.read().await {
            Ok(config) => Ok(config),
            Err(err) if err.is_file_not_found_error() => {
                info!("Config file not found, using defaults");
                Ok(Config::default())
            },
            Err(err) => Err(err),
        }
    }

    pub async fn save(&self, config: &Config) -> Result<(), ConfigError> {
        info!("Saving config to {}", self.path.to_string_lossy());

        if let Some(directory) = self.path.parent() {
            tokio::fs::create_dir_all(directory).await?;
        }

        let content = serde_json::to_string_pretty(config)?;
        tokio::fs::write(&self.path, content.as_bytes()).await?;
        Ok(())
    }
}
