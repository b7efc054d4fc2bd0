use anyhow::{Context, Result};
use std::path::PathBuf;

use crate::cli::Cli;
use crate::list_loader::InputFormat;

pub const OUTPUT_ENV_VAR: &str = "GROCERY_OUTPUT";
pub const WITH_SOURCES_ENV_VAR: &str = "GROCERY_WITH_SOURCES";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

impl std::str::FromStr for OutputFormat {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "text" => Ok(OutputFormat::Text),
            "json" => Ok(OutputFormat::Json),
            other => Err(anyhow::anyhow!("Unknown output format '{}'", other)),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct AppConfig {
    pub input: PathBuf,
    pub input_format: InputFormat,
    pub output: OutputFormat,
    pub with_sources: bool,
}

fn parse_flag(value: &str) -> Result<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" => Ok(true),
        "0" | "false" | "no" | "" => Ok(false),
        other => Err(anyhow::anyhow!("Expected true or false, got '{}'", other)),
    }
}

impl AppConfig {
    /// Merges command-line arguments with environment settings; the command
    /// line wins. `env` looks up a variable by name.
    pub fn resolve(cli: &Cli, env: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let input_format = match cli.format {
            Some(format) => format,
            None => InputFormat::from_path(&cli.input).ok_or_else(|| {
                anyhow::anyhow!("Cannot infer input format of {:?}; pass --format", cli.input)
            })?,
        };

        let output = match (cli.output, env(OUTPUT_ENV_VAR)) {
            (Some(output), _) => output,
            (None, Some(value)) => value
                .parse::<OutputFormat>()
                .with_context(|| format!("Invalid {}", OUTPUT_ENV_VAR))?,
            (None, None) => OutputFormat::default(),
        };

        let with_sources = cli.with_sources
            || env(WITH_SOURCES_ENV_VAR)
                .map(|value| parse_flag(&value))
                .transpose()
                .with_context(|| format!("Invalid {}", WITH_SOURCES_ENV_VAR))?
                .unwrap_or(false);

        Ok(AppConfig {
            input: cli.input.clone(),
            input_format,
            output,
            with_sources,
        })
    }

    pub fn from_env(cli: &Cli) -> Result<Self> {
        Self::resolve(cli, |name| std::env::var(name).ok())
    }
}
