use anyhow::Result;
use bodmas::{evaluate_traced, AngleMode, Config, EvalError, EvaluationTrace};
use clap::Parser;
use std::io::{self, BufRead};
use std::path::PathBuf;
use std::process::ExitCode;

mod display;
mod logging;
#[cfg(feature = "tui")]
mod render_help;
#[cfg(feature = "tui")]
mod tui_mode;

use display::format_plain;

#[derive(Parser)]
#[command(author, version, about = "BODMAS expression calculator", long_about = None)]
struct Cli {
    /// Expression to evaluate; several words are joined with spaces.
    /// Starts the interactive calculator when omitted.
    expression: Vec<String>,

    /// Interpret trigonometric functions in radians
    #[arg(long, conflicts_with = "degrees")]
    radians: bool,

    /// Interpret trigonometric functions in degrees
    #[arg(long)]
    degrees: bool,

    /// Print every evaluation step
    #[arg(long)]
    details: bool,

    /// Evaluate one expression per line from stdin
    #[arg(long, conflicts_with = "expression")]
    batch: bool,

    /// Configuration file (default: <config dir>/bodmas/config.toml)
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,
}

impl Cli {
    fn angle_mode(&self, config: &Config) -> AngleMode {
        if self.radians {
            AngleMode::Radians
        } else if self.degrees {
            AngleMode::Degrees
        } else {
            config.angle_mode
        }
    }
}

fn main() -> Result<ExitCode> {
    let cli = Cli::parse();
    let config = Config::load(cli.config.as_deref())?;
    let angle_mode = cli.angle_mode(&config);
    let interactive = cli.expression.is_empty() && !cli.batch;

    logging::init(&config, interactive)?;
    tracing::debug!(?config, %angle_mode, "starting");

    if !cli.expression.is_empty() {
        let expression = cli.expression.join(" ");
        return Ok(run_once(&expression, angle_mode, cli.details));
    }

    if cli.batch {
        return run_batch(angle_mode, cli.details);
    }

    run_interactive(config, angle_mode)
}

fn step_lines(trace: &EvaluationTrace) -> Vec<String> {
    trace
        .steps
        .iter()
        .enumerate()
        .map(|(i, step)| format!("  Step {}: {} = {}", i + 1, step.operation, format_plain(step.result)))
        .collect()
}

fn print_steps(trace: &EvaluationTrace) {
    for line in step_lines(trace) {
        println!("{}", line);
    }
}

/// Output for one batch line: the steps, then `expr = result`.
fn batch_report(expression: &str, trace: &EvaluationTrace, result: &Result<f64, EvalError>) -> Vec<String> {
    let mut lines = step_lines(trace);
    lines.push(match result {
        Ok(value) => format!("{} = {}", expression, format_plain(*value)),
        Err(e) => format!("{} = Error: {}", expression, e),
    });
    lines
}

fn run_once(expression: &str, angle_mode: AngleMode, details: bool) -> ExitCode {
    let mut trace = EvaluationTrace::new(details);

    match evaluate_traced(expression, angle_mode, &mut trace) {
        Ok(value) => {
            print_steps(&trace);
            println!("{}", format_plain(value));
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}

fn run_batch(angle_mode: AngleMode, details: bool) -> Result<ExitCode> {
    let mut failed = false;

    for line in io::stdin().lock().lines() {
        let line = line?;
        let expression = line.trim();
        if expression.is_empty() {
            continue;
        }

        let mut trace = EvaluationTrace::new(details);
        let result = evaluate_traced(expression, angle_mode, &mut trace);
        failed |= result.is_err();

        for line in batch_report(expression, &trace, &result) {
            println!("{}", line);
        }
    }

    Ok(if failed { ExitCode::FAILURE } else { ExitCode::SUCCESS })
}

#[cfg(feature = "tui")]
fn run_interactive(config: Config, angle_mode: AngleMode) -> Result<ExitCode> {
    tui_mode::run_tui(&config, angle_mode)?;
    Ok(ExitCode::SUCCESS)
}

#[cfg(not(feature = "tui"))]
fn run_interactive(_config: Config, angle_mode: AngleMode) -> Result<ExitCode> {
    run_batch(angle_mode, false)
}
