use dashmap::DashMap;
use serde::Serialize;
use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};
use tracing::warn;

use crate::host::HostEnvironment;

/// One recorded build dependency: a stable identity plus the modification
/// time observed when it was consulted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Dependency {
    pub path: PathBuf,
    /// Milliseconds since the epoch; `None` when the host could not stat
    /// the file at record time.
    pub mtime_ms: Option<u64>,
}

/// Accumulates every file consulted while answering the imports of one
/// top-level compile request.
///
/// Thread-safe so concurrent top-level compiles can share a host while
/// each owns its recorder; within one request recording is monotonic.
/// A file missing from this set after compilation means the host cannot
/// detect edits to it, so completeness here is what keeps incremental
/// builds correct.
#[derive(Default)]
pub struct DependencyRecorder {
    entries: DashMap<PathBuf, Option<u64>>,
}

impl DependencyRecorder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a file as a dependency of the current compile.
    ///
    /// Fire-and-forget: a host stat fault is the host's problem, not a
    /// resolution fault, so it is logged and the import proceeds.
    pub fn record(&self, host: &dyn HostEnvironment, path: &Path) {
        let mtime = host.mtime(path).and_then(to_epoch_ms);
        if mtime.is_none() {
            warn!(path = %path.display(), "recorded dependency without a modification time");
        }
        self.entries.insert(path.to_path_buf(), mtime);
    }

    /// Record with an mtime already in hand, avoiding a second stat.
    pub fn record_with_mtime(&self, path: &Path, mtime: Option<SystemTime>) {
        self.entries.insert(path.to_path_buf(), mtime.and_then(to_epoch_ms));
    }

    pub fn contains(&self, path: &Path) -> bool {
        self.entries.contains_key(path)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Sorted snapshot of the accumulated set.
    pub fn snapshot(&self) -> Vec<Dependency> {
        let mut deps: Vec<Dependency> = self
            .entries
            .iter()
            .map(|entry| Dependency { path: entry.key().clone(), mtime_ms: *entry.value() })
            .collect();
        deps.sort_by(|a, b| a.path.cmp(&b.path));
        deps
    }
}

pub(crate) fn to_epoch_ms(time: SystemTime) -> Option<u64> {
    time.duration_since(UNIX_EPOCH).ok().map(|d| d.as_millis() as u64)
}
