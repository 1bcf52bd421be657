use std::io::{self, BufRead, Write};

use anyhow::{Context, Result};
use clap::Args;

use super::{SettingsArgs, style};
use textfit::config::Config;
use textfit::layout::TextBox;
use textfit::{Container, ContainerOracle, FitOutcome, Fitted, fit};

#[derive(Args)]
pub struct FitArgs {
    /// Text to fit (each stdin line is fitted separately when omitted)
    pub text: Option<String>,
    #[command(flatten)]
    pub settings: SettingsArgs,
    /// Print the laid-out rows of the box instead of a single line
    #[arg(long)]
    pub rows: bool,
    /// Report the fit outcome and number of layout measurements on stderr
    #[arg(long)]
    pub explain: bool,
}

pub fn run(args: FitArgs) -> Result<()> {
    let config = args.settings.resolve()?;
    tracing::debug!(?config, "resolved fit settings");

    let mut out = io::stdout().lock();
    match &args.text {
        Some(text) => emit(text, &config, &args, &mut out),
        None => fit_lines(io::stdin().lock(), &mut out, &config, &args),
    }
}

/// One fitted input line, ready to print.
struct Rendered {
    output: String,
    fitted: Fitted,
    measured: usize,
}

fn fit_line(text: &str, config: &Config, rows: bool) -> Rendered {
    let mut container = TextBox::with_content(config.size, text);
    let mut oracle = ContainerOracle::new(&mut container);
    let fitted = fit(text, &config.fit, &mut oracle);
    let measured = oracle.measured();

    let output = if rows {
        container.replace_content(fitted.text.clone());
        container.rows().join("\n")
    } else {
        fitted.text.clone()
    };
    Rendered {
        output,
        fitted,
        measured,
    }
}

/// Fits every line of `input` separately, writing one result per line.
fn fit_lines<R: BufRead, W: Write>(
    input: R,
    out: &mut W,
    config: &Config,
    args: &FitArgs,
) -> Result<()> {
    for line in input.lines() {
        let line = line.context("Failed to read input")?;
        emit(&line, config, args, out)?;
    }
    Ok(())
}

fn emit<W: Write>(text: &str, config: &Config, args: &FitArgs, out: &mut W) -> Result<()> {
    let rendered = fit_line(text, config, args.rows);

    if args.explain {
        let line = format!(
            "{} ({} measured)",
            describe(rendered.fitted.outcome),
            rendered.measured
        );
        match rendered.fitted.outcome {
            Some(FitOutcome::SearchExhausted) => eprintln!("{}", style::caution(&line)),
            _ => eprintln!("{}", style::note(&line)),
        }
    }

    writeln!(out, "{}", rendered.output)?;
    Ok(())
}

fn describe(outcome: Option<FitOutcome>) -> String {
    match outcome {
        None => "blank input, nothing to fit".to_string(),
        Some(FitOutcome::Fits) => "fits without truncation".to_string(),
        Some(FitOutcome::FitsNormalized) => {
            "fits once whitespace is collapsed to single spaces".to_string()
        }
        Some(FitOutcome::Truncate(k)) => format!("truncated to {k} tokens"),
        Some(FitOutcome::SearchExhausted) => {
            "search exhausted; layout is not monotonic, kept original".to_string()
        }
    }
}
