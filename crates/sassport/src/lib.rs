pub mod candidates;
pub mod cli;
pub mod dependencies;
pub mod engine;
pub mod globs;
pub mod host;
pub mod importer;
pub mod parser;
pub mod registration;
pub mod reporter;
pub mod resolver;
pub mod types;

use rayon::prelude::*;
use std::sync::Arc;
use std::time::Instant;

pub use dependencies::{Dependency, DependencyRecorder};
pub use engine::{CompilationUnit, Engine, GrassEngine};
pub use host::{FilesystemHost, HostEnvironment};
pub use importer::Importer;
pub use reporter::CompileReport;
pub use resolver::ImportResolver;
pub use types::{FileConfig, OutputStyle, SassportConfig, SassportError, Syntax};

use engine::materialize;
use importer::CompileDriver;

/// Compile one entry stylesheet with a filesystem-backed host and the
/// grass engine.
///
/// # Example
/// ```no_run
/// use sassport::{compile, SassportConfig};
/// use std::path::PathBuf;
///
/// let config = SassportConfig {
///     entry: PathBuf::from("assets/main.scss"),
///     cwd: PathBuf::from("."),
///     ..Default::default()
/// };
///
/// let report = compile(config).unwrap();
/// println!("{}", report.css);
/// ```
pub fn compile(config: SassportConfig) -> Result<CompileReport, SassportError> {
    let cwd = config.cwd.canonicalize()?;

    // Search roots are resolved against the working directory once, up
    // front; they are read-only for the rest of the request.
    let load_paths = config
        .load_paths
        .iter()
        .map(|p| {
            let joined = if p.is_absolute() { p.clone() } else { cwd.join(p) };
            joined.canonicalize().unwrap_or(joined)
        })
        .collect();

    let host = Arc::new(FilesystemHost::new(cwd, load_paths));
    let engine = GrassEngine::new(config.style);
    compile_with(&config, host, &engine)
}

/// Compile against an explicit host and engine. This is the seam tests
/// and embedders use to substitute either collaborator.
pub fn compile_with(
    config: &SassportConfig,
    host: Arc<dyn HostEnvironment>,
    engine: &dyn Engine,
) -> Result<CompileReport, SassportError> {
    let start = Instant::now();

    let entry = if config.entry.is_absolute() {
        config.entry.clone()
    } else {
        host.root_dir().join(&config.entry)
    };
    let entry = entry.canonicalize().map_err(|_| SassportError::EntryNotFound(entry.clone()))?;

    // One dependency scope per top-level request; the entry itself is the
    // first member so edits to it invalidate the result too.
    let recorder = DependencyRecorder::new();
    recorder.record(host.as_ref(), &entry);

    let asset = host
        .resolve_logical(&entry, None)
        .ok_or_else(|| SassportError::EntryNotFound(entry.clone()))?;
    let unit = materialize(host.as_ref(), &asset)?;

    let importer = Importer::new(Arc::clone(&host));
    let mut driver =
        CompileDriver::new(&importer, engine, &recorder, config.error_on_empty_glob);
    let css = driver.compile(&unit)?;

    Ok(CompileReport {
        css,
        entry,
        dependencies: recorder.snapshot(),
        duration_ms: start.elapsed().as_millis() as u64,
    })
}

/// Compile several independent entry stylesheets in parallel.
///
/// Each request owns its configuration, recorder, and frame stack; nothing
/// mutable is shared across them.
pub fn compile_many(configs: Vec<SassportConfig>) -> Vec<Result<CompileReport, SassportError>> {
    configs.into_par_iter().map(compile).collect()
}
