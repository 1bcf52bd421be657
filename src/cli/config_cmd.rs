use anyhow::{Context, Result, bail};
use clap::{Args, Subcommand};
use std::path::{Path, PathBuf};

use super::{SettingsArgs, style};
use textfit::config::{
    CONFIG_FILENAME, ConfigLayer, GLOBAL_CONFIG_DIR, GLOBAL_CONFIG_FILENAME, global_config_path,
};

#[derive(Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommand,
}

#[derive(Subcommand)]
pub enum ConfigCommand {
    /// Check one settings file (.textfit.json locally, or global with --global)
    Validate {
        /// Directory containing .textfit.json (defaults to current directory)
        #[arg(long)]
        path: Option<PathBuf>,
        /// Validate the global config file instead of a local one
        #[arg(long, short)]
        global: bool,
    },
    /// Show the settings `fit` would use with the same flags, and where each comes from
    Show(SettingsArgs),
}

pub fn run(args: ConfigArgs) -> Result<()> {
    match args.command {
        ConfigCommand::Validate { path, global } => {
            let target = if global {
                match global_config_path() {
                    Some(p) => p,
                    None => bail!(
                        "No config directory on this platform for <config_dir>/{GLOBAL_CONFIG_DIR}/{GLOBAL_CONFIG_FILENAME}"
                    ),
                }
            } else {
                path.unwrap_or_else(|| PathBuf::from(".")).join(CONFIG_FILENAME)
            };
            run_validate(&target)
        }
        ConfigCommand::Show(settings) => run_show(&settings),
    }
}

fn run_validate(path: &Path) -> Result<()> {
    match ConfigLayer::read(path) {
        Ok(Some(layer)) => {
            println!("{}\n", style::success("Valid"));
            println!("{}", style::heading("Settings in this file:"));
            println!("{}", serde_json::to_string_pretty(&layer)?);
            Ok(())
        }
        Ok(None) => {
            println!("{}", style::info(&format!("No config found at {}", path.display())));
            Ok(())
        }
        Err(e) => {
            println!("{}", style::error(&format!("Error: {e}")));
            Err(e).context("Config validation failed")
        }
    }
}

fn run_show(settings: &SettingsArgs) -> Result<()> {
    let sources = settings.sources();
    match &sources.global {
        Some(p) => println!("Global config: {}", describe_path(p)),
        None => println!("Global config: not available on this platform"),
    }
    println!("Local config:  {}", describe_path(&sources.local));
    println!();

    let (global, local) = sources.load_layers().context("Failed to load config")?;
    let flags = settings.flag_layer();
    println!("{}", style::heading("Resolved settings:"));
    for line in settings_table(global.as_ref(), local.as_ref(), &flags) {
        println!("  {line}");
    }
    Ok(())
}

fn describe_path(path: &Path) -> String {
    if path.exists() {
        path.display().to_string()
    } else {
        style::info(&format!("{} (not found)", path.display()))
    }
}

/// Which layer set a field, checked top-down: flags, local, global.
fn origin(
    global: Option<&ConfigLayer>,
    local: Option<&ConfigLayer>,
    flags: &ConfigLayer,
    is_set: impl Fn(&ConfigLayer) -> bool,
) -> &'static str {
    if is_set(flags) {
        "flag"
    } else if local.is_some_and(&is_set) {
        "local"
    } else if global.is_some_and(&is_set) {
        "global"
    } else {
        "default"
    }
}

/// Resolved value and origin of every setting, one row each.
fn settings_table(
    global: Option<&ConfigLayer>,
    local: Option<&ConfigLayer>,
    flags: &ConfigLayer,
) -> Vec<String> {
    let merged = global
        .cloned()
        .unwrap_or_default()
        .overlay(local.cloned().unwrap_or_default())
        .overlay(flags.clone());
    let config = merged.resolve();
    let from = |is_set: fn(&ConfigLayer) -> bool| origin(global, local, flags, is_set);

    vec![
        format!(
            "{:<22}{:<8}({})",
            "fit.marker",
            format!("{:?}", config.fit.marker),
            from(|l| l.fit.marker.is_some())
        ),
        format!(
            "{:<22}{:<8}({})",
            "fit.split_on_words",
            config.fit.split_on_words,
            from(|l| l.fit.split_on_words.is_some())
        ),
        format!(
            "{:<22}{:<8}({})",
            "container.width",
            config.size.width,
            from(|l| l.container.width.is_some())
        ),
        format!(
            "{:<22}{:<8}({})",
            "container.height",
            config.size.height,
            from(|l| l.container.height.is_some())
        ),
    ]
}
