use clap::Parser;
use std::path::PathBuf;

use crate::config::OutputFormat;
use crate::list_loader::InputFormat;

#[derive(Parser, Debug)]
#[command(author, version, about = "Merge recipe ingredients into one grocery list", long_about = None)]
pub struct Cli {
    /// Path to the recipe ingredients file (CSV or JSON)
    #[arg(short, long)]
    pub input: PathBuf,

    /// Input format; inferred from the file extension when omitted
    #[arg(short, long, value_enum)]
    pub format: Option<InputFormat>,

    /// Output format (overrides GROCERY_OUTPUT)
    #[arg(short, long, value_enum)]
    pub output: Option<OutputFormat>,

    /// List which recipe contributed each amount (overrides GROCERY_WITH_SOURCES)
    #[arg(long)]
    pub with_sources: bool,
}

pub fn parse_args() -> Cli {
    Cli::parse()
}
