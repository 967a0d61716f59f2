use clap::{Parser, ValueEnum};
use std::path::PathBuf;

use crate::types::OutputStyle;

#[derive(Parser)]
#[command(name = "sassport")]
#[command(about = "Compile Sass/SCSS stylesheets through asset-pipeline import resolution")]
pub struct Cli {
    /// Entry stylesheet to compile
    pub entry: Option<PathBuf>,

    /// Path to config file (sassport.json or sassport.jsonc)
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Additional search roots for import resolution, in precedence order
    #[arg(short = 'I', long = "load-path")]
    pub load_paths: Vec<PathBuf>,

    /// Working directory (also the project root)
    #[arg(short = 'C', long, default_value = ".")]
    pub cwd: PathBuf,

    /// CSS output style (defaults to expanded when neither the flag nor a
    /// config file sets one)
    #[arg(long, value_enum)]
    pub style: Option<OutputStyle>,

    /// Output format
    #[arg(long, default_value = "text")]
    pub format: OutputFormat,

    /// Fail when a glob import matches no files
    #[arg(long, default_value = "false")]
    pub error_on_empty_glob: bool,

    /// Enable debug logging
    #[arg(short, long)]
    pub verbose: bool,
}

#[derive(Clone, ValueEnum, Default)]
pub enum OutputFormat {
    /// Print the compiled CSS
    #[default]
    Text,
    /// Print the whole compile report as JSON
    Json,
}
