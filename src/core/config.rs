//! Layered configuration.
//!
//! Values are resolved from (lowest to highest priority) built-in defaults, a
//! TOML config file, `SORTPLOT_*` environment variables and finally CLI flags,
//! which `main` applies on top of what is extracted here.

use std::path::{Path, PathBuf};

use figment::{
    Figment,
    providers::{Env, Format, Toml},
};
use serde::{Deserialize, Serialize};

use crate::core::error::{Result, SortplotErrorKind};

pub const ENV_PREFIX: &str = "SORTPLOT_";
pub const DEFAULT_WIDTH: u32 = 640;
pub const DEFAULT_HEIGHT: u32 = 480;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GlobalConfig {
    pub verbose: bool,
}

impl GlobalConfig {
    pub fn from_figment(figment: &Figment) -> Result<Self> {
        Ok(figment.focus("global").extract()?)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderConfig {
    pub width: u32,
    pub height: u32,
    pub output_dir: Option<PathBuf>,
    pub fail_fast: bool,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            width: DEFAULT_WIDTH,
            height: DEFAULT_HEIGHT,
            output_dir: None,
            fail_fast: false,
        }
    }
}

impl RenderConfig {
    pub fn from_figment(figment: &Figment) -> Result<Self> {
        Ok(figment.focus("render").extract()?)
    }

    /// Reject image sizes the renderer cannot draw into
    pub fn validate(&self) -> Result<()> {
        if self.width == 0 || self.height == 0 {
            return Err(SortplotErrorKind::InvalidDimensions {
                width: self.width,
                height: self.height,
            }
            .into());
        }
        Ok(())
    }
}

/// Build the figment for a given config file. A missing file contributes nothing.
pub fn create_figment_from_file(path: &Path) -> Result<Figment> {
    tracing::debug!("Loading configuration from {}", path.display());
    Ok(Figment::new()
        .merge(Toml::file(path))
        .merge(Env::prefixed(ENV_PREFIX).split("__")))
}

/// Build the figment from an explicit config file, or the per-user default one.
pub fn create_figment(explicit: Option<&Path>) -> Result<Figment> {
    match explicit {
        Some(path) => {
            if !path.is_file() {
                return Err(SortplotErrorKind::ConfigFileNotFound {
                    path: path.to_path_buf(),
                }
                .into());
            }
            create_figment_from_file(path)
        }
        None => create_figment_from_file(&default_config_path()),
    }
}

/// `<user config dir>/sortplot/config.toml`, or `sortplot.toml` when there is no such dir
pub fn default_config_path() -> PathBuf {
    dirs::config_dir()
        .map(|dir| dir.join("sortplot").join("config.toml"))
        .unwrap_or_else(|| PathBuf::from("sortplot.toml"))
}
