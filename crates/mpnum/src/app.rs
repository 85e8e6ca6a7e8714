//! Application entry point and dispatch.

use std::io::Write;
use std::str::FromStr;

use anyhow::{Context as _, Result};
use num_bigint::BigInt;
use num_rational::BigRational;

use mpnum_codec::{encode_float, encode_integer, encode_rational, value_from_binary, Kind};
use mpnum_core::{best_rational, current_context, set_context, Context, Tolerance};

use crate::config::{AppConfig, Command};
use crate::settings::Settings;

/// Run the application, writing results to stdout.
pub fn run(config: &AppConfig) -> Result<()> {
    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    run_with(config, &mut out)
}

/// Run the application against any writer.
pub fn run_with(config: &AppConfig, out: &mut dyn Write) -> Result<()> {
    // Completion does not depend on settings
    if let Command::Completion { shell } = config.command {
        let mut cmd = <AppConfig as clap::CommandFactory>::command();
        clap_complete::generate(shell, &mut cmd, "mpnum", out);
        return Ok(());
    }

    install_settings(config)?;
    let mut ctx = current_context();
    let result = execute(&config.command, &mut ctx, out);
    // Keep the sticky flags raised by the command
    set_context(ctx);
    result
}

/// Load the settings file, layer the command-line flags on top, and install
/// the result for this thread.
fn install_settings(config: &AppConfig) -> Result<Context> {
    let mut settings = match &config.config {
        Some(path) => Settings::load(path)?,
        None => Settings::default(),
    };
    if config.precision.is_some() {
        settings.context.precision = config.precision;
    }
    if config.round.is_some() {
        settings.context.round = config.round;
    }
    Ok(settings.apply()?)
}

/// Execute one command under `ctx`.
pub fn execute(command: &Command, ctx: &mut Context, out: &mut dyn Write) -> Result<()> {
    match command {
        Command::Encode {
            kind,
            value,
            no_precision,
        } => {
            let bytes = match kind {
                Kind::Integer => encode_integer(&parse_integer(value)?),
                Kind::Rational => encode_rational(&parse_rational(value)?)?,
                Kind::Float => encode_float(&ctx.parse(value)?, !no_precision)?,
            };
            writeln!(out, "{}", hex::encode(bytes))?;
        }
        Command::Decode { kind, hex } => {
            let bytes = hex::decode(hex.trim()).context("input is not hex")?;
            let value = value_from_binary(&bytes, *kind)
                .with_context(|| format!("cannot decode {kind}"))?;
            writeln!(out, "{value}")?;
        }
        Command::Approx {
            value,
            max_error,
            integer,
        } => {
            let x = ctx.parse(value)?;
            let tolerance = Tolerance::from_f64(*max_error)?;
            let approximation = best_rational(&x, &tolerance, *integer)?;
            writeln!(out, "{approximation}")?;
        }
        Command::Completion { shell } => {
            let mut cmd = <AppConfig as clap::CommandFactory>::command();
            clap_complete::generate(*shell, &mut cmd, "mpnum", out);
        }
    }
    Ok(())
}

fn parse_integer(text: &str) -> Result<BigInt> {
    BigInt::from_str(text.trim()).with_context(|| format!("invalid integer: {text}"))
}

fn parse_rational(text: &str) -> Result<BigRational> {
    BigRational::from_str(text.trim()).with_context(|| format!("invalid rational: {text}"))
}
