use std::path::PathBuf;
use std::process;

use anyhow::Context;
use colored::Colorize;
use tracing::debug;
use codesim_core::compare::compare_files;
use codesim_core::config::ComparisonOptions;
use codesim_core::metrics::Similarity;

use crate::formatters::{json::format_json, terminal::format_terminal};

pub struct CompareOptions {
    pub source: PathBuf,
    pub destination: PathBuf,
    pub language: Option<String>,
    pub config: Option<PathBuf>,
    pub format: OutputFormat,
}

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum OutputFormat {
    Terminal,
    Json,
}

pub fn compare_command(opts: CompareOptions) {
    match run(&opts) {
        Ok(similarity) => match opts.format {
            OutputFormat::Json => println!("{}", format_json(&similarity)),
            OutputFormat::Terminal => println!("{}", format_terminal(&similarity)),
        },
        Err(e) => {
            eprintln!("{}", format!("Error: {e:#}").red());
            process::exit(1);
        }
    }
}

fn load_options(config: Option<&PathBuf>) -> anyhow::Result<ComparisonOptions> {
    match config {
        Some(path) => ComparisonOptions::from_toml_file(path)
            .with_context(|| format!("loading {}", path.display())),
        None => Ok(ComparisonOptions::default()),
    }
}

fn run(opts: &CompareOptions) -> anyhow::Result<Similarity> {
    let options = load_options(opts.config.as_ref())?;
    debug!(?options, "comparison options");
    let similarity = compare_files(
        &opts.source,
        &opts.destination,
        opts.language.as_deref(),
        &options,
    )?;
    Ok(similarity)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn options(dir: &tempfile::TempDir, a: &str, b: &str, config: Option<&str>) -> CompareOptions {
        let source = dir.path().join("a.py");
        let destination = dir.path().join("b.py");
        fs::write(&source, a).unwrap();
        fs::write(&destination, b).unwrap();
        let config = config.map(|c| {
            let path = dir.path().join("codesim.toml");
            fs::write(&path, c).unwrap();
            path
        });
        CompareOptions {
            source,
            destination,
            language: None,
            config,
            format: OutputFormat::Terminal,
        }
    }

    #[test]
    fn test_run_identical() {
        let dir = tempfile::tempdir().unwrap();
        let opts = options(&dir, "x = 1\n", "x = 1\n", None);
        assert_eq!(run(&opts).unwrap().to_string(), "100.00");
    }

    #[test]
    fn test_run_with_config() {
        let dir = tempfile::tempdir().unwrap();
        let opts = options(&dir, "x = 1\n", "x = 2\n", Some("strategy = \"top-down\"\n"));
        let sim = run(&opts).unwrap();
        assert!(sim.edit_cost > 0);
    }

    #[test]
    fn test_bad_config_reported() {
        let dir = tempfile::tempdir().unwrap();
        let opts = options(&dir, "x = 1\n", "x = 1\n", Some("min_height = 0\n"));
        let err = run(&opts).unwrap_err();
        assert!(format!("{err:#}").contains("codesim.toml"));
    }
}
