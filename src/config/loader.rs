//! Locating, loading, and writing `config.toml`.

use std::fs;
use std::path::{Path, PathBuf};

use serde::Serialize;
use tracing::{debug, info};

use super::path::{CONFIG_ENV, default_config_path, resolve_path};
use super::schema::NivasaConfig;
use crate::error::{NivasaError, Result};

/// Environment variable overriding `storage.external_dir`.
pub const EXTERNAL_DIR_ENV: &str = "NIVASA_EXTERNAL_DIR";

/// Where the config path came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ConfigSource {
    /// `--config` flag
    Flag,
    /// `NIVASA_CONFIG` environment variable
    Env,
    /// Platform config directory
    Default,
}

/// A loaded configuration together with its provenance.
#[derive(Debug, Clone)]
pub struct LoadedConfig {
    pub config: NivasaConfig,
    pub path: PathBuf,
    pub source: ConfigSource,
    /// False when defaults were used because the default file is absent.
    pub exists: bool,
}

/// Pick the config path: flag, then environment, then platform default.
pub fn locate_config(flag: Option<&Path>) -> Result<(PathBuf, ConfigSource)> {
    if let Some(path) = flag {
        return Ok((path.to_path_buf(), ConfigSource::Flag));
    }
    if let Some(path) = std::env::var_os(CONFIG_ENV).filter(|v| !v.is_empty()) {
        return Ok((PathBuf::from(path), ConfigSource::Env));
    }
    Ok((default_config_path()?, ConfigSource::Default))
}

/// Load configuration.
///
/// A missing file at the default location yields defaults; a missing file
/// that was asked for explicitly is an error. Storage directories are
/// resolved against the config file's directory and `NIVASA_EXTERNAL_DIR`
/// overrides `storage.external_dir`.
pub fn load_config(flag: Option<&Path>) -> Result<LoadedConfig> {
    let (path, source) = locate_config(flag)?;
    debug!(path = %path.display(), ?source, "Loading configuration");

    let (mut config, exists) = if path.is_file() {
        let text = fs::read_to_string(&path)?;
        (NivasaConfig::from_toml(&text)?, true)
    } else if source == ConfigSource::Default {
        debug!("No configuration file, using defaults");
        (NivasaConfig::default(), false)
    } else {
        return Err(NivasaError::ConfigNotFound {
            path: path.display().to_string(),
        });
    };

    let config_dir = path.parent().unwrap_or_else(|| Path::new("."));
    if let Some(dir) = config.storage.external_dir.take() {
        config.storage.external_dir = Some(resolve_path(&dir, config_dir)?);
    }
    if let Some(dir) = config.storage.internal_dir.take() {
        config.storage.internal_dir = Some(resolve_path(&dir, config_dir)?);
    }
    if let Some(dir) = std::env::var_os(EXTERNAL_DIR_ENV).filter(|v| !v.is_empty()) {
        debug!(dir = ?dir, "External directory overridden from environment");
        config.storage.external_dir = Some(PathBuf::from(dir));
    }

    Ok(LoadedConfig {
        config,
        path,
        source,
        exists,
    })
}

/// Write a default `config.toml` to `path`.
///
/// Refuses to overwrite an existing file unless `force` is set.
pub fn write_default_config(path: &Path, force: bool) -> Result<()> {
    if path.exists() && !force {
        return Err(NivasaError::ConfigInvalid(format!(
            "{} already exists (use --force to overwrite)",
            path.display()
        )));
    }
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(path, NivasaConfig::default().to_toml()?)?;
    info!(path = %path.display(), "Wrote default configuration");
    Ok(())
}
