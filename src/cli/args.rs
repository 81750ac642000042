use crate::constants::{exit_codes, verbosity};
use clap::{error::ErrorKind, CommandFactory, Parser};
use log::LevelFilter;
use std::path::PathBuf;

const HELP_TEMPLATE: &str = r#"{about-section}
{usage-heading} {usage}

{all-args}
{after-help}
"#;

/// CLI arguments for trmnl-liquid.
#[derive(Parser, Debug, Clone)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Template file to render.
    #[arg(value_name = "TEMPLATE")]
    pub template: PathBuf,

    /// Render context as a JSON object, or `-` to read it from stdin.
    #[arg(short, long)]
    pub context: Option<String>,

    /// Render context from a `.json`, `.yaml` or `.yml` file.
    ///
    /// Keys given with `--context` take precedence over keys from this file.
    #[arg(long = "context-file", value_name = "FILE")]
    pub context_file: Option<PathBuf>,

    /// Directory with partials available to `{% include "name" %}`.
    #[arg(short, long, value_name = "DIR")]
    pub partials: Option<PathBuf>,

    /// Glob selecting partial files inside the partials directory (repeatable).
    #[arg(long = "partial-glob", value_name = "GLOB")]
    pub partial_globs: Vec<String>,

    /// Write the rendered output to this file instead of stdout.
    #[arg(short, long, value_name = "FILE")]
    pub output: Option<PathBuf>,

    /// Increase logging verbosity (`-v`, `-vv`, `-vvv`).
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,
}

/// Parse command line arguments with custom handling for missing required inputs.
pub fn get_args() -> Args {
    Args::try_parse().unwrap_or_else(|e| {
        if e.kind() == ErrorKind::MissingRequiredArgument {
            let mut command = Args::command().help_template(HELP_TEMPLATE);
            if let Err(print_err) = command.print_help() {
                eprintln!("Failed to display help information: {print_err}");
            } else {
                println!();
            }
            std::process::exit(exit_codes::FAILURE);
        } else {
            e.exit();
        }
    })
}

/// Map `-v` counts to the appropriate log level.
pub fn get_log_level_from_verbose(verbose_count: u8) -> LevelFilter {
    match verbose_count {
        verbosity::OFF => LevelFilter::Error,
        verbosity::INFO => LevelFilter::Info,
        verbosity::DEBUG => LevelFilter::Debug,
        verbosity::TRACE.. => LevelFilter::Trace,
    }
}
