use clap::Parser;
use std::fs;
use std::path::{Path, PathBuf};

use sassport::cli::{Cli, OutputFormat};
use sassport::reporter::{report_json, report_text};
use sassport::{compile, FileConfig, OutputStyle, SassportConfig};

/// Find default config file in directory
fn find_default_config(dir: &Path) -> Option<PathBuf> {
    let json_path = dir.join("sassport.json");
    if json_path.exists() {
        return Some(json_path);
    }

    let jsonc_path = dir.join("sassport.jsonc");
    if jsonc_path.exists() {
        return Some(jsonc_path);
    }

    None
}

/// Load config from file path, supporting .json and .jsonc
fn load_config_file(path: &Path) -> Result<FileConfig, Box<dyn std::error::Error>> {
    let mut content = fs::read_to_string(path)?;
    json_strip_comments::strip(&mut content)?;
    let config: FileConfig = serde_json::from_str(&content)?;
    Ok(config)
}

fn parse_style(value: &str) -> Option<OutputStyle> {
    match value {
        "expanded" => Some(OutputStyle::Expanded),
        "compressed" => Some(OutputStyle::Compressed),
        _ => None,
    }
}

/// An explicit CLI flag beats the config file, which beats the default.
fn merge_style(cli_style: Option<OutputStyle>, file_style: Option<&str>) -> OutputStyle {
    cli_style.or_else(|| file_style.and_then(parse_style)).unwrap_or_default()
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    if cli.verbose {
        tracing_subscriber::fmt()
            .with_env_filter(
                tracing_subscriber::EnvFilter::try_from_default_env()
                    .unwrap_or_else(|_| "sassport=debug".into()),
            )
            .with_writer(std::io::stderr)
            .init();
    }

    // Load config file
    let file_config = if let Some(config_path) = &cli.config {
        // Use specified config file (error if not found)
        if !config_path.exists() {
            eprintln!("Error: Config file not found: {}", config_path.display());
            std::process::exit(1);
        }
        Some(load_config_file(config_path)?)
    } else {
        // Look for default config file in cwd
        match find_default_config(&cli.cwd) {
            Some(path) => match load_config_file(&path) {
                Ok(cfg) => Some(cfg),
                Err(e) => {
                    eprintln!("Warning: Failed to parse config file '{}': {}", path.display(), e);
                    None
                }
            },
            None => None,
        }
    };

    // Merge config: CLI args override file config
    let entry = match (&cli.entry, &file_config) {
        (Some(entry), _) => entry.clone(),
        (None, Some(cfg)) => match &cfg.entry {
            Some(entry) => PathBuf::from(entry),
            None => {
                eprintln!("Error: No entry stylesheet specified in config or CLI");
                std::process::exit(1);
            }
        },
        (None, None) => {
            eprintln!("Error: No entry stylesheet specified. Pass a file or provide a config file.");
            std::process::exit(1);
        }
    };

    let load_paths = if !cli.load_paths.is_empty() {
        cli.load_paths.clone()
    } else if let Some(ref cfg) = file_config {
        cfg.load_paths.iter().map(PathBuf::from).collect()
    } else {
        Vec::new()
    };

    let style = merge_style(cli.style, file_config.as_ref().and_then(|cfg| cfg.style.as_deref()));

    let error_on_empty_glob = cli.error_on_empty_glob
        || file_config.as_ref().is_some_and(|cfg| cfg.error_on_empty_glob);

    let config = SassportConfig {
        entry,
        load_paths,
        cwd: cli.cwd.clone(),
        style,
        error_on_empty_glob,
    };

    match compile(config) {
        Ok(report) => match cli.format {
            OutputFormat::Text => report_text(&report),
            OutputFormat::Json => report_json(&report),
        },
        Err(e) => {
            eprintln!("Error: {e}");
            std::process::exit(1);
        }
    }

    Ok(())
}
