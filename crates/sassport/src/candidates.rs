use rustc_hash::FxHashSet;
use std::path::{Path, PathBuf};

/// Ordered candidate paths for an import token.
///
/// Callers try each in order and take the first that resolves:
/// 1. the token relative to the search root enclosing the importing file
///    (when that differs from a bare sibling lookup), plain then partial;
/// 2. the token as written, plain then partial, left for the host to try
///    against every search root in precedence order;
/// 3. the token joined onto the importing file's own directory, plain then
///    partial, the fallback covering simple sibling imports.
///
/// Never returns an empty list: step 3 always contributes.
pub fn possible_files(
    token: &Path,
    base_path: &Path,
    search_roots: &[PathBuf],
    root_dir: &Path,
) -> Vec<PathBuf> {
    let base_dir = base_path.parent().unwrap_or(base_path);
    let mut out: Vec<PathBuf> = Vec::new();

    // Root-relative forms: re-anchor the token at the enclosing search
    // root so "folder/dep" written inside <root>/folder resolves.
    let enclosing = search_roots
        .iter()
        .map(PathBuf::as_path)
        .filter(|root| base_dir.starts_with(root))
        .max_by_key(|root| root.components().count())
        .unwrap_or(root_dir);
    if token.is_relative() && base_dir != enclosing {
        if let Ok(prefix) = base_dir.strip_prefix(enclosing) {
            push_with_partial(&mut out, prefix.join(normalize_token(token)));
        }
    }

    // The token as written, resolved by the host against each root.
    push_with_partial(&mut out, normalize_token(token));

    // Sibling fallback, anchored directly at the importing file's directory.
    push_with_partial(&mut out, base_dir.join(normalize_token(token)));

    dedup_in_order(out)
}

fn push_with_partial(out: &mut Vec<PathBuf>, candidate: PathBuf) {
    out.push(candidate.clone());
    if let Some(partial) = partialize(&candidate) {
        out.push(partial);
    }
}

/// Prefix the filename with the partial marker.
/// Returns `None` when the filename already starts with `_`, so a partial
/// is never partialized twice.
pub fn partialize(path: &Path) -> Option<PathBuf> {
    let name = path.file_name()?.to_string_lossy();
    if name.starts_with('_') {
        return None;
    }
    let partial_name = format!("_{name}");
    Some(match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.join(partial_name),
        _ => PathBuf::from(partial_name),
    })
}

/// Strip a leading `./` so "./dep" and "dep" generate identical candidates.
fn normalize_token(token: &Path) -> PathBuf {
    token.strip_prefix(".").map(Path::to_path_buf).unwrap_or_else(|_| token.to_path_buf())
}

fn dedup_in_order(paths: Vec<PathBuf>) -> Vec<PathBuf> {
    let mut seen = FxHashSet::default();
    paths.into_iter().filter(|p| seen.insert(p.clone())).collect()
}
