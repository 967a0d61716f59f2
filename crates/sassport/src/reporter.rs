use serde::Serialize;
use std::path::PathBuf;

use crate::dependencies::{to_epoch_ms, Dependency};
use crate::host::HostEnvironment;

/// Outcome of one top-level compile request.
#[derive(Debug, Serialize)]
pub struct CompileReport {
    pub css: String,
    pub entry: PathBuf,
    /// Every file consulted to answer the entry's imports, entry included.
    pub dependencies: Vec<Dependency>,
    pub duration_ms: u64,
}

impl CompileReport {
    /// Whether this result is still current: true iff every recorded
    /// dependency stats to the same modification time it had when it was
    /// consulted. Any edit, removal, or unknown mtime makes it stale.
    pub fn is_fresh(&self, host: &dyn HostEnvironment) -> bool {
        self.dependencies.iter().all(|dep| {
            dep.mtime_ms.is_some() && host.mtime(&dep.path).and_then(to_epoch_ms) == dep.mtime_ms
        })
    }
}

pub fn report_text(report: &CompileReport) {
    print!("{}", report.css);
}

pub fn report_json(report: &CompileReport) {
    match serde_json::to_string_pretty(report) {
        Ok(json) => println!("{json}"),
        Err(e) => eprintln!("Error: failed to serialize report: {e}"),
    }
}
