use regex::Regex;
use std::path::Path;
use std::sync::OnceLock;
use tracing::debug;

use crate::host::{HostEnvironment, ResolvedAsset};
use crate::registration::AcceptancePolicy;
use crate::types::SassportError;

/// Glob syntax marker: `*` anywhere, or a bracketed character class.
fn glob_regex() -> &'static Regex {
    static REGEX: OnceLock<Regex> = OnceLock::new();
    REGEX.get_or_init(|| Regex::new(r"\*|\[.+\]").unwrap())
}

pub fn is_glob(token: &str) -> bool {
    glob_regex().is_match(token)
}

/// Expand a glob import into the sorted list of importable assets.
///
/// The pattern is anchored at the importing file's directory. Results are
/// ordered lexicographically by absolute path: declaration order in the
/// aggregate affects the CSS cascade, so enumeration order from the
/// filesystem must never leak through. The requesting file is excluded
/// even when it matches, and so is anything the host will not serve as a
/// stylesheet.
pub fn resolve_glob(
    host: &dyn HostEnvironment,
    policy: AcceptancePolicy,
    token: &str,
    base_path: &Path,
) -> Result<Vec<ResolvedAsset>, SassportError> {
    let base_dir = base_path.parent().unwrap_or(base_path);
    let pattern = base_dir.join(token);
    let pattern_str = pattern.to_string_lossy();

    let paths = glob::glob(&pattern_str).map_err(|source| SassportError::GlobPattern {
        pattern: pattern_str.into_owned(),
        source,
    })?;

    let requester = base_path.canonicalize().ok();
    let mut matches: Vec<ResolvedAsset> = paths
        .flatten()
        .filter_map(|path| host.resolve_logical(&path, None))
        .filter(|asset| Some(&asset.path) != requester.as_ref())
        .filter(|asset| policy.accepts(&asset.content_type, &asset.path))
        .collect();

    matches.sort_by(|a, b| a.path.cmp(&b.path));
    matches.dedup_by(|a, b| a.path == b.path);
    debug!(token, count = matches.len(), "glob expanded");
    Ok(matches)
}

/// Synthesize the aggregate import body for a glob result: one explicit
/// import statement per matched file, relative to the importing file's
/// directory, exactly as if the user had written them out.
pub fn aggregate_imports(matches: &[ResolvedAsset], base_path: &Path) -> String {
    let base_dir = base_path.parent().unwrap_or(base_path);
    let mut out = String::new();
    for asset in matches {
        let shown = asset.path.strip_prefix(base_dir).unwrap_or(&asset.path);
        out.push_str(&format!("@import \"{}\";\n", shown.display()));
    }
    out
}
