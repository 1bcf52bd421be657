//! Layered settings for the `fit` command.
//!
//! Every source (global file, local `.textfit.json`, command-line flags) is a
//! [`ConfigLayer`] of optional fields. Layers stack field by field, the top
//! one winning, and [`ConfigLayer::resolve`] fills whatever is still unset
//! from the defaults.

use std::fmt;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::fit::FitOptions;
use crate::layout::BoxSize;

pub const CONFIG_FILENAME: &str = ".textfit.json";
pub const GLOBAL_CONFIG_DIR: &str = "textfit";
pub const GLOBAL_CONFIG_FILENAME: &str = "config.json";

pub const DEFAULT_WIDTH: usize = 40;
pub const DEFAULT_HEIGHT: usize = 1;

#[derive(Debug)]
pub enum ConfigError {
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    Parse {
        path: PathBuf,
        source: serde_json::Error,
    },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Read { path, source } => {
                write!(f, "cannot read {}: {}", path.display(), source)
            }
            ConfigError::Parse { path, source } => {
                write!(f, "bad settings in {}: {}", path.display(), source)
            }
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::Read { source, .. } => Some(source),
            ConfigError::Parse { source, .. } => Some(source),
        }
    }
}

/// Fully resolved settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub fit: FitOptions,
    pub size: BoxSize,
}

impl Default for Config {
    fn default() -> Self {
        ConfigLayer::default().resolve()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct ConfigLayer {
    pub fit: FitLayer,
    pub container: ContainerLayer,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct FitLayer {
    /// Appended to the kept prefix when text is cut
    #[serde(skip_serializing_if = "Option::is_none")]
    pub marker: Option<String>,
    /// Cut between words (true) or between characters (false)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub split_on_words: Option<bool>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct ContainerLayer {
    /// Box width in terminal cells
    #[serde(skip_serializing_if = "Option::is_none")]
    pub width: Option<usize>,
    /// Box height in rows
    #[serde(skip_serializing_if = "Option::is_none")]
    pub height: Option<usize>,
}

impl ConfigLayer {
    /// Reads one settings file. A missing file is `Ok(None)`.
    pub fn read(path: &Path) -> Result<Option<Self>, ConfigError> {
        let content = match std::fs::read_to_string(path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => {
                return Err(ConfigError::Read {
                    path: path.to_path_buf(),
                    source: e,
                });
            }
        };
        serde_json::from_str(&content)
            .map(Some)
            .map_err(|e| ConfigError::Parse {
                path: path.to_path_buf(),
                source: e,
            })
    }

    /// Stacks `top` over `self`; any field `top` sets wins.
    pub fn overlay(self, top: ConfigLayer) -> ConfigLayer {
        ConfigLayer {
            fit: FitLayer {
                marker: top.fit.marker.or(self.fit.marker),
                split_on_words: top.fit.split_on_words.or(self.fit.split_on_words),
            },
            container: ContainerLayer {
                width: top.container.width.or(self.container.width),
                height: top.container.height.or(self.container.height),
            },
        }
    }

    pub fn resolve(&self) -> Config {
        let defaults = FitOptions::default();
        Config {
            fit: FitOptions {
                marker: self.fit.marker.clone().unwrap_or(defaults.marker),
                split_on_words: self.fit.split_on_words.unwrap_or(defaults.split_on_words),
            },
            size: BoxSize::new(
                self.container.width.unwrap_or(DEFAULT_WIDTH),
                self.container.height.unwrap_or(DEFAULT_HEIGHT),
            ),
        }
    }
}

/// Returns the path to the global config file, if the platform config dir exists.
pub fn global_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join(GLOBAL_CONFIG_DIR).join(GLOBAL_CONFIG_FILENAME))
}

/// Where settings files are looked up for one directory.
#[derive(Debug, Clone)]
pub struct ConfigSources {
    pub global: Option<PathBuf>,
    pub local: PathBuf,
}

impl ConfigSources {
    pub fn for_dir(dir: &Path) -> Self {
        Self {
            global: global_config_path(),
            local: dir.join(CONFIG_FILENAME),
        }
    }

    /// Reads the global and local layers separately, `None` for absent
    /// files. A broken global file is logged and ignored; a broken local
    /// file is an error.
    pub fn load_layers(&self) -> Result<(Option<ConfigLayer>, Option<ConfigLayer>), ConfigError> {
        let global = match &self.global {
            Some(path) => ConfigLayer::read(path).unwrap_or_else(|e| {
                tracing::warn!(error = %e, "Failed to load global config, skipping");
                None
            }),
            None => None,
        };
        let local = ConfigLayer::read(&self.local)?;
        tracing::debug!(
            global = global.is_some(),
            local = local.is_some(),
            "loaded config layers"
        );
        Ok((global, local))
    }

    /// Global stacked under local.
    pub fn load(&self) -> Result<ConfigLayer, ConfigError> {
        let (global, local) = self.load_layers()?;
        Ok(global
            .unwrap_or_default()
            .overlay(local.unwrap_or_default()))
    }
}
