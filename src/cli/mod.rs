pub mod config_cmd;
pub mod fit_cmd;
pub mod style;

use anyhow::{Context, Result};
use clap::Args;
use std::path::PathBuf;

use textfit::config::{Config, ConfigLayer, ConfigSources, ContainerLayer, FitLayer};

/// Settings flags shared by `fit` and `config show`. Each one set here
/// overrides the config files.
#[derive(Args, Default)]
pub struct SettingsArgs {
    /// Box width in terminal cells
    #[arg(short = 'w', long)]
    pub width: Option<usize>,
    /// Box height in rows
    #[arg(short = 'H', long)]
    pub height: Option<usize>,
    /// Cut between characters instead of words
    #[arg(short = 'c', long)]
    pub chars: bool,
    /// Truncation marker appended to cut text
    #[arg(short = 'm', long)]
    pub marker: Option<String>,
    /// Directory containing .textfit.json (defaults to current directory)
    #[arg(long)]
    pub path: Option<PathBuf>,
}

impl SettingsArgs {
    pub fn sources(&self) -> ConfigSources {
        let dir = self.path.clone().unwrap_or_else(|| PathBuf::from("."));
        ConfigSources::for_dir(&dir)
    }

    /// The flags as the topmost config layer.
    pub fn flag_layer(&self) -> ConfigLayer {
        ConfigLayer {
            fit: FitLayer {
                marker: self.marker.clone(),
                split_on_words: self.chars.then_some(false),
            },
            container: ContainerLayer {
                width: self.width,
                height: self.height,
            },
        }
    }

    pub fn resolve(&self) -> Result<Config> {
        self.resolve_with(&self.sources())
    }

    pub fn resolve_with(&self, sources: &ConfigSources) -> Result<Config> {
        let files = sources.load().context("Failed to load config")?;
        Ok(files.overlay(self.flag_layer()).resolve())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use textfit::FitOptions;
    use textfit::config::CONFIG_FILENAME;
    use textfit::layout::BoxSize;

    fn local_only(dir: &std::path::Path) -> ConfigSources {
        ConfigSources {
            global: None,
            local: dir.join(CONFIG_FILENAME),
        }
    }

    #[test]
    fn test_flags_override_files() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(
            dir.path().join(CONFIG_FILENAME),
            r#"{"fit": {"marker": "..."}, "container": {"width": 30, "height": 2}}"#,
        )
        .unwrap();
        let args = SettingsArgs {
            width: Some(12),
            chars: true,
            ..SettingsArgs::default()
        };

        let config = args.resolve_with(&local_only(dir.path())).unwrap();
        assert_eq!(config.size, BoxSize::new(12, 2));
        assert_eq!(config.fit.marker, "...");
        assert!(!config.fit.split_on_words);
    }

    #[test]
    fn test_no_flags_no_files_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = SettingsArgs::default()
            .resolve_with(&local_only(dir.path()))
            .unwrap();
        assert_eq!(config.size, BoxSize::new(40, 1));
        assert_eq!(config.fit, FitOptions::default());
    }

    #[test]
    fn test_broken_local_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join(CONFIG_FILENAME), "{bad json").unwrap();

        let err = SettingsArgs::default()
            .resolve_with(&local_only(dir.path()))
            .unwrap_err();
        assert!(format!("{err:#}").contains(CONFIG_FILENAME));
    }
}
