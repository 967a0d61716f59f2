use serde::Deserialize;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::engine::EngineError;
use crate::host::HostError;

/// Surface syntax of a stylesheet, chosen by filename marker.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Syntax {
    /// Brace-delimited dialect (`.scss`).
    Scss,
    /// Whitespace-significant dialect (`.sass`).
    Sass,
}

impl Syntax {
    /// Determine the syntax from a path or import token.
    /// Anything without a `.sass` marker is treated as SCSS.
    pub fn of_path(path: &Path) -> Self {
        if path.to_string_lossy().contains(".sass") { Syntax::Sass } else { Syntax::Scss }
    }

    pub fn extension(self) -> &'static str {
        match self {
            Syntax::Scss => "scss",
            Syntax::Sass => "sass",
        }
    }

    /// The content type a file of this syntax resolves to.
    pub fn content_type(self) -> ContentType {
        match self {
            Syntax::Scss => ContentType::Scss,
            Syntax::Sass => ContentType::Sass,
        }
    }
}

/// Content type of a resolved asset, derived from its extension chain.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ContentType {
    Css,
    Scss,
    Sass,
    Other(String),
}

impl ContentType {
    /// Whether this type is acceptable as an import target at all.
    /// Scripts or images sharing a basename with a stylesheet must never win.
    pub fn is_stylesheet(&self) -> bool {
        matches!(self, ContentType::Css | ContentType::Scss | ContentType::Sass)
    }
}

/// CSS output style of the engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum, serde::Serialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputStyle {
    #[default]
    Expanded,
    Compressed,
}

/// Configuration for one top-level compile request.
///
/// There is no process-global options table: every compile carries its own
/// configuration value.
#[derive(Debug, Clone)]
pub struct SassportConfig {
    /// Entry stylesheet, absolute or relative to `cwd`.
    pub entry: PathBuf,

    /// Search roots for import resolution, in precedence order.
    /// When empty, `cwd` is the single root.
    pub load_paths: Vec<PathBuf>,

    /// Working directory; also the project root for root-relative imports.
    pub cwd: PathBuf,

    /// Output style handed to the engine.
    pub style: OutputStyle,

    /// When true, a glob import matching zero files aborts the compile
    /// instead of collapsing to "nothing to import".
    pub error_on_empty_glob: bool,
}

impl Default for SassportConfig {
    fn default() -> Self {
        Self {
            entry: PathBuf::new(),
            load_paths: Vec::new(),
            cwd: PathBuf::from("."),
            style: OutputStyle::default(),
            error_on_empty_glob: false,
        }
    }
}

/// Error types for sassport operations
#[derive(Error, Debug)]
pub enum SassportError {
    #[error("could not resolve import {token:?} from {from} (tried {tried:?})")]
    ImportNotFound { token: String, from: PathBuf, tried: Vec<PathBuf> },

    #[error("glob import {token:?} from {from} matched no files")]
    EmptyGlob { token: String, from: PathBuf },

    #[error("import cycle: {}", chain.iter().map(|p| p.display().to_string()).collect::<Vec<_>>().join(" -> "))]
    ImportCycle { chain: Vec<PathBuf> },

    #[error("invalid glob pattern {pattern:?}: {source}")]
    GlobPattern {
        pattern: String,
        #[source]
        source: glob::PatternError,
    },

    #[error(transparent)]
    Engine(#[from] EngineError),

    #[error(transparent)]
    Host(#[from] HostError),

    #[error("entry file not found: {0}")]
    EntryNotFound(PathBuf),

    #[error("invalid working directory: {0}")]
    InvalidCwd(#[from] std::io::Error),
}

/// Config file structure for sassport.json / sassport.jsonc
#[derive(Debug, Clone, Deserialize, Default)]
pub struct FileConfig {
    #[serde(default)]
    pub entry: Option<String>,

    #[serde(default, rename = "loadPaths")]
    pub load_paths: Vec<String>,

    #[serde(default)]
    pub style: Option<String>,

    #[serde(default, rename = "errorOnEmptyGlob")]
    pub error_on_empty_glob: bool,
}
