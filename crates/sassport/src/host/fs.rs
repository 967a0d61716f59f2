use rustc_hash::FxHashMap;
use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::SystemTime;
use tracing::trace;

use super::{HostCapabilities, HostEnvironment, HostError, PipelineStage, ResolvedAsset, StageKind};
use crate::types::ContentType;

/// Extension suffixes appended to extensionless candidates, in precedence
/// order: css-typed variants before the preprocessed dialects, so a plain
/// `dep.css` answers `@import "dep"` even when a `dep.scss` also exists.
/// Import tokens never carry an extension requirement, so an asset named
/// `dep.css.scss` must answer the same token.
const EXTENSION_VARIANTS: &[&str] = &["css", "css.scss", "css.sass", "scss", "sass"];

/// Directory-backed [`HostEnvironment`] used by the CLI and tests.
///
/// Logical resolution walks the configured search roots in order, trying
/// extension completion per root. Pipeline stages are registered per
/// extension, mirroring how a full asset pipeline keys processors.
pub struct FilesystemHost {
    root: PathBuf,
    roots: Vec<PathBuf>,
    stages: FxHashMap<String, Vec<Arc<dyn PipelineStage>>>,
    capabilities: HostCapabilities,
}

impl FilesystemHost {
    /// Create a host rooted at `root` with the given search roots.
    /// An empty `load_paths` means the root itself is the single root.
    pub fn new(root: impl Into<PathBuf>, load_paths: Vec<PathBuf>) -> Self {
        let root = root.into();
        let roots = if load_paths.is_empty() { vec![root.clone()] } else { load_paths };
        Self {
            root,
            roots,
            stages: FxHashMap::default(),
            capabilities: HostCapabilities { typed_stylesheet_mimes: true },
        }
    }

    /// Downgrade to the permissive acceptance rule of hosts without typed
    /// stylesheet MIMEs.
    pub fn permissive(mut self) -> Self {
        self.capabilities.typed_stylesheet_mimes = false;
        self
    }

    /// Register a pipeline stage for its declared extensions.
    pub fn with_stage(mut self, stage: Arc<dyn PipelineStage>) -> Self {
        for ext in stage.extensions() {
            self.stages.entry((*ext).to_string()).or_default().push(Arc::clone(&stage));
        }
        self
    }

    /// Content type from the extension chain; the rightmost recognized
    /// extension wins, so `main.css.scss` is SCSS.
    pub fn content_type_of(path: &Path) -> ContentType {
        for ext in extension_chain(path).into_iter().rev() {
            match ext.as_str() {
                "scss" => return ContentType::Scss,
                "sass" => return ContentType::Sass,
                "css" => return ContentType::Css,
                _ => {}
            }
        }
        match path.extension() {
            Some(ext) => ContentType::Other(ext.to_string_lossy().into_owned()),
            None => ContentType::Other(String::new()),
        }
    }

    fn try_file(&self, path: &Path, accept: Option<&[ContentType]>) -> Option<ResolvedAsset> {
        let meta = std::fs::metadata(path).ok()?;
        if !meta.is_file() {
            return None;
        }
        let content_type = Self::content_type_of(path);
        if let Some(accept) = accept {
            if !accept.contains(&content_type) {
                trace!(path = %path.display(), ?content_type, "content type rejected");
                return None;
            }
        }
        // Canonical identity so the dependency set compares across builds.
        let canonical = path.canonicalize().ok()?;
        Some(ResolvedAsset { path: canonical, content_type, mtime: meta.modified().ok() })
    }

    fn variants(candidate: &Path) -> Vec<PathBuf> {
        if Self::content_type_of(candidate).is_stylesheet() {
            return vec![candidate.to_path_buf()];
        }
        let mut out = Vec::with_capacity(EXTENSION_VARIANTS.len() + 1);
        out.push(candidate.to_path_buf());
        for ext in EXTENSION_VARIANTS {
            let mut s: OsString = candidate.as_os_str().to_os_string();
            s.push(".");
            s.push(ext);
            out.push(PathBuf::from(s));
        }
        out
    }
}

impl HostEnvironment for FilesystemHost {
    fn resolve_logical(
        &self,
        candidate: &Path,
        accept: Option<&[ContentType]>,
    ) -> Option<ResolvedAsset> {
        let variants = Self::variants(candidate);
        if candidate.is_absolute() {
            return variants.iter().find_map(|v| self.try_file(v, accept));
        }
        // Earlier roots take precedence on ties.
        for root in &self.roots {
            for variant in &variants {
                if let Some(asset) = self.try_file(&root.join(variant), accept) {
                    return Some(asset);
                }
            }
        }
        None
    }

    fn mtime(&self, path: &Path) -> Option<SystemTime> {
        std::fs::metadata(path).ok().and_then(|m| m.modified().ok())
    }

    fn search_roots(&self) -> &[PathBuf] {
        &self.roots
    }

    fn root_dir(&self) -> &Path {
        &self.root
    }

    fn run_pipeline(&self, path: &Path, excluded: &[StageKind]) -> Result<String, HostError> {
        let mut text = std::fs::read_to_string(path)
            .map_err(|source| HostError::Io { path: path.to_path_buf(), source })?;

        // Stages run rightmost extension first, the way an asset pipeline
        // peels off extensions.
        for ext in extension_chain(path).into_iter().rev() {
            let Some(stages) = self.stages.get(&ext) else { continue };
            for stage in stages {
                if excluded.contains(&stage.kind()) {
                    trace!(stage = stage.name(), path = %path.display(), "stage excluded");
                    continue;
                }
                text = stage.process(&text, path)?;
            }
        }
        Ok(text)
    }

    fn capabilities(&self) -> HostCapabilities {
        self.capabilities
    }
}

/// All extensions of a filename in left-to-right order:
/// `main.css.scss` -> `["css", "scss"]`.
fn extension_chain(path: &Path) -> Vec<String> {
    let Some(name) = path.file_name() else { return Vec::new() };
    let name = name.to_string_lossy();
    name.split('.').skip(1).map(str::to_string).collect()
}
