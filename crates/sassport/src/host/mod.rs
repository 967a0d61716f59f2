mod fs;

pub use fs::FilesystemHost;

use std::path::{Path, PathBuf};
use std::time::SystemTime;
use thiserror::Error;

use crate::types::ContentType;

/// Error types for host environment operations
#[derive(Error, Debug)]
pub enum HostError {
    #[error("IO error reading {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("pipeline stage {stage:?} failed on {path}: {message}")]
    Stage { stage: &'static str, path: PathBuf, message: String },
}

/// Outcome of a successful logical resolution.
///
/// Created per import and immediately consumed; the resolver never caches
/// these.
#[derive(Debug, Clone)]
pub struct ResolvedAsset {
    /// Absolute, canonical path of the physical file.
    pub path: PathBuf,
    pub content_type: ContentType,
    /// Modification time at resolution; `None` when the file vanished
    /// between enumeration and stat (treated as a per-candidate miss).
    pub mtime: Option<SystemTime>,
}

/// Capability descriptor of a host, detected once at registration time
/// instead of per-call probing.
#[derive(Debug, Clone, Copy, Default)]
pub struct HostCapabilities {
    /// Host distinguishes `text/scss` / `text/sass` from plain CSS.
    /// Hosts without typed stylesheet MIMEs get the permissive
    /// requirable-only acceptance rule.
    pub typed_stylesheet_mimes: bool,
}

/// Kind of a pipeline stage, used to filter stages out of an evaluation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StageKind {
    /// A stage whose job is compiling the preprocessing language to CSS.
    /// Always excluded when materializing an import, since that job
    /// belongs to the nested engine invocation.
    StylesheetCompile,
    /// Generic text substitution (templating) stages.
    Template,
    Minify,
}

/// One stage of a host's content pipeline.
pub trait PipelineStage: Send + Sync {
    /// Stage identifier for diagnostics.
    fn name(&self) -> &'static str;

    fn kind(&self) -> StageKind;

    /// Extensions (without dot) this stage is registered for.
    fn extensions(&self) -> &[&'static str];

    fn process(&self, text: &str, path: &Path) -> Result<String, HostError>;
}

/// The asset pipeline this subsystem plugs into.
///
/// Everything the resolver needs from its surroundings goes through this
/// trait; the library ships [`FilesystemHost`] and tests substitute their
/// own implementations.
pub trait HostEnvironment: Send + Sync {
    /// Resolve a logical path to a physical asset.
    ///
    /// Relative candidates are tried against every search root in
    /// precedence order; absolute candidates are checked directly. When
    /// `accept` is given, a candidate resolving to a type outside the set
    /// is skipped, not returned.
    fn resolve_logical(
        &self,
        candidate: &Path,
        accept: Option<&[ContentType]>,
    ) -> Option<ResolvedAsset>;

    fn mtime(&self, path: &Path) -> Option<SystemTime>;

    /// Configured search roots, in precedence order.
    fn search_roots(&self) -> &[PathBuf];

    /// Project root, used for root-relative forms.
    fn root_dir(&self) -> &Path;

    /// Run the file's processor chain, skipping stages of the excluded
    /// kinds, and return the resulting raw text.
    fn run_pipeline(&self, path: &Path, excluded: &[StageKind]) -> Result<String, HostError>;

    fn capabilities(&self) -> HostCapabilities;
}
