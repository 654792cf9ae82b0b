mod commands;
mod formatters;

use std::path::PathBuf;
use std::process;

use clap::{ArgAction, Parser};
use tracing_subscriber::{fmt, EnvFilter};

use commands::compare::{compare_command, CompareOptions, OutputFormat};

const USAGE: &str = "usage: codesim [-v|--verbose] [-h|--help] [--format terminal|json] [--language <id>] [--config <file>] <file1> <file2>";

#[derive(Parser, Debug)]
#[command(
    name = "codesim",
    version = "0.1.0",
    about = "Structural similarity of two source files",
    disable_help_flag = true
)]
struct Cli {
    /// Print usage
    #[arg(short, long, action = ArgAction::SetTrue)]
    help: bool,

    /// Log matching progress to stderr
    #[arg(short, long)]
    verbose: bool,

    /// Output format: terminal or json
    #[arg(long, default_value = "terminal")]
    format: String,

    /// Grammar to use for both files instead of guessing from extensions
    #[arg(long)]
    language: Option<String>,

    /// TOML file with comparison options
    #[arg(long)]
    config: Option<PathBuf>,

    /// The two files to compare
    #[arg()]
    files: Vec<PathBuf>,
}

#[derive(Debug, PartialEq, Eq)]
enum Invocation {
    Compare { source: PathBuf, destination: PathBuf },
    Usage { exit_code: i32 },
}

/// Two files always run a comparison. Anything else prints usage, which is
/// only a success when help was asked for.
fn resolve_invocation(cli: &Cli) -> Invocation {
    match cli.files.as_slice() {
        [source, destination] => Invocation::Compare {
            source: source.clone(),
            destination: destination.clone(),
        },
        _ => Invocation::Usage {
            exit_code: if cli.help { 0 } else { 1 },
        },
    }
}

fn install_tracing(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    let filter = std::env::var("CODESIM_LOG")
        .ok()
        .and_then(|level| EnvFilter::try_new(level).ok())
        .unwrap_or_else(|| EnvFilter::new(default));
    fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_level(true)
        .init();
}

fn main() {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(err) if err.kind() == clap::error::ErrorKind::DisplayVersion => err.exit(),
        Err(_) => {
            println!("{USAGE}");
            process::exit(1);
        }
    };

    match resolve_invocation(&cli) {
        Invocation::Usage { exit_code } => {
            println!("{USAGE}");
            process::exit(exit_code);
        }
        Invocation::Compare {
            source,
            destination,
        } => {
            install_tracing(cli.verbose);

            let format = match cli.format.as_str() {
                "json" => OutputFormat::Json,
                _ => OutputFormat::Terminal,
            };

            compare_command(CompareOptions {
                source,
                destination,
                language: cli.language,
                config: cli.config,
                format,
            });
        }
    }
}
