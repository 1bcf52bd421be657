use anyhow::Result;
use clap::{CommandFactory, Parser, Subcommand};
use tracing_subscriber::EnvFilter;

mod cli;

use cli::config_cmd::ConfigArgs;
use cli::fit_cmd::FitArgs;

const LONG_VERSION: &str = concat!(
    env!("CARGO_PKG_VERSION"),
    " (built ",
    env!("TEXTFIT_BUILD_DATE"),
    ", ",
    env!("TEXTFIT_BUILD_TARGET"),
    ")"
);

#[derive(Parser)]
#[command(
    name = "textfit",
    version,
    long_version = LONG_VERSION,
    about = "Fit text into a fixed-size box, truncating with a marker"
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Fit text into a box of the given size
    Fit(FitArgs),
    /// Manage configuration (.textfit.json)
    Config(ConfigArgs),
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match cli.command {
        Some(Commands::Fit(args)) => cli::fit_cmd::run(args),
        Some(Commands::Config(args)) => cli::config_cmd::run(args),
        None => {
            Cli::command().print_help()?;
            Ok(())
        }
    }
}
