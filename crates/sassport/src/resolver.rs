use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, trace};

use crate::candidates::possible_files;
use crate::host::{HostEnvironment, ResolvedAsset};
use crate::registration::AcceptancePolicy;

/// Walks candidate paths against the host's logical resolution and returns
/// the first acceptable hit.
///
/// Stateless across compilations: candidate lists are ephemeral and
/// resolved assets are never cached here, so one resolver can serve
/// concurrent top-level compiles.
pub struct ImportResolver {
    host: Arc<dyn HostEnvironment>,
    policy: AcceptancePolicy,
}

impl ImportResolver {
    pub fn new(host: Arc<dyn HostEnvironment>) -> Self {
        let policy = AcceptancePolicy::select(host.as_ref());
        Self { host, policy }
    }

    pub fn host(&self) -> &Arc<dyn HostEnvironment> {
        &self.host
    }

    pub fn policy(&self) -> AcceptancePolicy {
        self.policy
    }

    /// Resolve an import token against the importing file's location.
    ///
    /// Candidate order is the whole contract: plain form before partial
    /// form at one directory level, nearer search roots before farther
    /// ones. A candidate resolving to an incompatible content type is
    /// skipped silently, as is one that vanished between enumeration and
    /// stat.
    pub fn resolve(&self, token: &Path, base_path: &Path) -> Option<ResolvedAsset> {
        self.resolve_with_attempts(token, base_path).ok()
    }

    /// Like [`resolve`](Self::resolve), but reports the candidate list on
    /// failure so the error can name every path attempted.
    pub fn resolve_with_attempts(
        &self,
        token: &Path,
        base_path: &Path,
    ) -> Result<ResolvedAsset, Vec<PathBuf>> {
        let candidates = possible_files(
            token,
            base_path,
            self.host.search_roots(),
            self.host.root_dir(),
        );
        let accept = self.policy.accept_types(token);

        for candidate in &candidates {
            trace!(candidate = %candidate.display(), "trying candidate");
            let Some(asset) = self.host.resolve_logical(candidate, accept.as_deref()) else {
                continue;
            };
            if !self.policy.accepts(&asset.content_type, token) {
                trace!(path = %asset.path.display(), "type mismatch, trying next candidate");
                continue;
            }
            if asset.mtime.is_none() && self.host.mtime(&asset.path).is_none() {
                // Vanished between enumeration and stat.
                trace!(path = %asset.path.display(), "candidate disappeared, trying next");
                continue;
            }
            debug!(token = %token.display(), resolved = %asset.path.display(), "import resolved");
            return Ok(asset);
        }

        debug!(token = %token.display(), from = %base_path.display(), "no candidate resolved");
        Err(candidates)
    }

    /// Modification time of whatever asset currently answers the token.
    pub fn last_modified(&self, token: &Path, base_path: &Path) -> Option<std::time::SystemTime> {
        let asset = self.resolve(token, base_path)?;
        asset.mtime.or_else(|| self.host.mtime(&asset.path))
    }
}
