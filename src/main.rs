use std::io::BufRead;
use std::path::PathBuf;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use anyhow::{Context, Result};
use calckeys::calculator::{ERROR_DISPLAY, EntryMode, copy_to_clipboard};
use calckeys::config::{Config, MAX_DECIMAL_PLACES};
use calckeys::{CalculatorKeyboard, logging, parse_script};
use clap::{Parser, Subcommand};
use serde::Serialize;

/// Drive a calculator keyboard from the command line.
#[derive(Parser, Debug)]
#[command(name = "calckeys", version, about)]
struct Cli {
    /// Config file (defaults to ~/.config/calckeys/config.toml).
    #[arg(long, global = true, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Enter digits fixed-point with this many implied decimals.
    #[arg(long, global = true, value_name = "PLACES")]
    fixed_point: Option<u8>,

    /// Print results as JSON.
    #[arg(long, global = true)]
    json: bool,

    /// Copy the final display to the clipboard.
    #[arg(long, global = true)]
    copy: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Replay a key script, e.g. "12.5 + 3 =".
    Run {
        script: String,

        /// Print the display after every key.
        #[arg(long)]
        trace: bool,
    },
    /// Preset the display from a number.
    Seed {
        #[arg(allow_hyphen_values = true)]
        value: String,
    },
    /// Read key scripts from stdin, one per line.
    Interactive,
}

#[derive(Serialize)]
struct Report<'a> {
    display: &'a str,
    error: bool,
    equal_tapped: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let config = Config::load(cli.config.as_deref()).context("Failed to load configuration")?;
    logging::init(&config.logging);

    let entry_mode = match cli.fixed_point {
        Some(places) if places > MAX_DECIMAL_PLACES => {
            anyhow::bail!("--fixed-point accepts at most {} places", MAX_DECIMAL_PLACES)
        }
        Some(places) => EntryMode::FixedPoint { places },
        None => config.keyboard.entry_mode()?,
    };
    tracing::debug!(?entry_mode, "starting keyboard");

    let mut keyboard = CalculatorKeyboard::new(entry_mode);
    let equal_tapped = Arc::new(AtomicBool::new(false));
    let flag = Arc::clone(&equal_tapped);
    keyboard.set_on_equal_tapped(move || flag.store(true, Ordering::Relaxed));

    match &cli.command {
        Command::Run { script, trace } => {
            let keys = parse_script(script).context("Invalid key script")?;
            if *trace {
                let json = cli.json;
                keyboard.set_on_value_changed(move |value| print_line(value, json));
            }
            let final_report = needs_final_report(*trace, cli.json, keys.len());
            for key in keys {
                keyboard.press(key);
            }
            if final_report {
                report(&keyboard, &equal_tapped, cli.json)?;
            }
        }
        Command::Seed { value } => {
            keyboard.reset_with_initial_text(value, false);
            report(&keyboard, &equal_tapped, cli.json)?;
        }
        Command::Interactive => run_interactive(&mut keyboard, &equal_tapped, cli.json)?,
    }

    if cli.copy {
        copy_result(&keyboard)?;
    }

    Ok(())
}

fn run_interactive(
    keyboard: &mut CalculatorKeyboard,
    equal_tapped: &AtomicBool,
    json: bool,
) -> Result<()> {
    let stdin = std::io::stdin();

    for line in stdin.lock().lines() {
        let line = line.context("Failed to read from stdin")?;
        let line = line.trim();
        if line == "quit" || line == "exit" {
            break;
        }

        match parse_script(line) {
            Ok(keys) => {
                equal_tapped.store(false, Ordering::Relaxed);
                for key in keys {
                    keyboard.press(key);
                }
                report(keyboard, equal_tapped, json)?;
            }
            Err(e) => eprintln!("{}", e),
        }
    }

    Ok(())
}

fn report(keyboard: &CalculatorKeyboard, equal_tapped: &AtomicBool, json: bool) -> Result<()> {
    if json {
        let report = Report {
            display: keyboard.display(),
            error: keyboard.processor().is_error(),
            equal_tapped: equal_tapped.load(Ordering::Relaxed),
        };
        println!("{}", serde_json::to_string(&report)?);
    } else {
        println!("{}", keyboard.display());
    }
    Ok(())
}

/// A plain trace already ends with the final display, unless no key was
/// pressed at all.
fn needs_final_report(trace: bool, json: bool, key_count: usize) -> bool {
    !trace || json || key_count == 0
}

fn print_line(value: &str, json: bool) {
    if json {
        println!("{}", serde_json::json!({ "display": value }));
    } else {
        println!("{}", value);
    }
}

fn copy_result(keyboard: &CalculatorKeyboard) -> Result<()> {
    if keyboard.display() == ERROR_DISPLAY {
        tracing::warn!("not copying error display to clipboard");
        return Ok(());
    }
    copy_to_clipboard(keyboard.display()).context("Failed to copy result")
}
