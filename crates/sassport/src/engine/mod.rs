mod grass_engine;

pub use grass_engine::GrassEngine;

use std::path::PathBuf;
use thiserror::Error;

use crate::host::{HostEnvironment, ResolvedAsset, StageKind};
use crate::types::{SassportError, Syntax};

/// Error types for engine operations
#[derive(Error, Debug)]
pub enum EngineError {
    #[error("compilation of {path} failed: {message}")]
    Compile { path: PathBuf, message: String },
}

/// Everything the engine needs to compile one stylesheet: raw text, the
/// physical filename it came from, and the surface syntax.
#[derive(Debug, Clone)]
pub struct CompilationUnit {
    pub text: String,
    pub filename: PathBuf,
    pub syntax: Syntax,
}

impl CompilationUnit {
    pub fn new(text: String, filename: impl Into<PathBuf>) -> Self {
        let filename = filename.into();
        let syntax = Syntax::of_path(&filename);
        Self { text, filename, syntax }
    }
}

/// The stylesheet compiler, consumed as an opaque service.
///
/// Production builds use [`GrassEngine`]; tests substitute fakes to pin
/// down adapter behavior without real compilation.
pub trait Engine: Send + Sync {
    fn name(&self) -> &'static str;

    fn render(&self, unit: &CompilationUnit) -> Result<String, EngineError>;
}

/// Produce the text to hand to the engine for a resolved file.
///
/// Runs the host's pipeline for the file with stylesheet-compile stages
/// filtered out: compiling the preprocessing language is the nested
/// engine invocation's job, and running it here would compile twice.
pub fn materialize(
    host: &dyn HostEnvironment,
    asset: &ResolvedAsset,
) -> Result<CompilationUnit, SassportError> {
    let text = host.run_pipeline(&asset.path, &[StageKind::StylesheetCompile])?;
    Ok(CompilationUnit::new(text, asset.path.clone()))
}
