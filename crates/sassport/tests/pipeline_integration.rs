use sassport::{
    compile, compile_many, compile_with, FilesystemHost, GrassEngine, SassportConfig,
    SassportError,
};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::{Duration, SystemTime};
use tempfile::TempDir;

fn project(files: &[(&str, &str)]) -> TempDir {
    let dir = tempfile::tempdir().unwrap();
    for (name, body) in files {
        let path = dir.path().join(name);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, body).unwrap();
    }
    dir
}

fn config(dir: &TempDir, entry: &str) -> SassportConfig {
    SassportConfig { entry: PathBuf::from(entry), cwd: dir.path().to_path_buf(), ..Default::default() }
}

#[test]
fn test_imports_standard_files() {
    let dir = project(&[
        ("main.scss", "@import \"dep\";\nbody { color: $color; }\n"),
        ("dep.scss", "$color: blue;\n"),
    ]);
    let report = compile(config(&dir, "main.scss")).unwrap();
    assert!(report.css.contains("color: blue"));
}

#[test]
fn test_imports_partial_style_files() {
    let dir = project(&[
        ("main.scss", "@import \"posts\";\n"),
        ("_posts.scss", ".post { color: blue; }\n"),
    ]);
    let report = compile(config(&dir, "main.scss")).unwrap();
    assert!(report.css.contains(".post"));
    assert!(report.css.contains("color: blue"));
}

#[test]
fn test_plain_file_preferred_over_partial() {
    let dir = project(&[
        ("main.scss", "@import \"posts\";\n.page { margin: 0; }\n"),
        ("posts.scss", ".post { color: plum; }\n"),
        ("_posts.scss", ".post { color: crimson; }\n"),
    ]);
    let report = compile(config(&dir, "main.scss")).unwrap();
    assert!(report.css.contains("plum"));
    assert!(!report.css.contains("crimson"));
}

#[test]
fn test_imports_relative_files() {
    let dir = project(&[
        ("application/main.scss", "@import \"./posts\";\n"),
        ("application/posts.scss", ".post { color: blue; }\n"),
    ]);
    let report = compile(config(&dir, "application/main.scss")).unwrap();
    assert!(report.css.contains("color: blue"));
}

#[test]
fn test_imports_from_load_path() {
    let dir = project(&[
        ("assets/main.scss", "@import \"posts\";\n"),
        ("vendor/posts.scss", ".post { color: blue; }\n"),
    ]);
    let mut cfg = config(&dir, "assets/main.scss");
    cfg.load_paths = vec![PathBuf::from("assets"), PathBuf::from("vendor")];
    let report = compile(cfg).unwrap();
    assert!(report.css.contains("color: blue"));
}

#[test]
fn test_earlier_load_path_wins() {
    let dir = project(&[
        ("assets/main.scss", "@import \"theme\";\n"),
        ("first/theme.scss", ".t { color: first; }\n"),
        ("second/theme.scss", ".t { color: second; }\n"),
    ]);
    let mut cfg = config(&dir, "assets/main.scss");
    cfg.load_paths =
        vec![PathBuf::from("assets"), PathBuf::from("first"), PathBuf::from("second")];
    let report = compile(cfg).unwrap();
    assert!(report.css.contains("first"));
    assert!(!report.css.contains("second"));
}

#[test]
fn test_chained_css_extension_resolves() {
    let dir = project(&[
        ("main.css.scss", "@import \"posts\";\n"),
        ("posts.css.scss", ".post { color: blue; }\n"),
    ]);
    let report = compile(config(&dir, "main.css.scss")).unwrap();
    assert!(report.css.contains("color: blue"));
}

#[test]
fn test_plain_css_preferred_over_scss_for_extensionless_token() {
    let dir = project(&[
        ("main.scss", "@import \"dep\";\n"),
        ("dep.css", ".from-css { margin: 0; }\n"),
        ("dep.scss", ".from-scss { margin: 0; }\n"),
    ]);
    let report = compile(config(&dir, "main.scss")).unwrap();
    assert!(report.css.contains(".from-css"));
    assert!(!report.css.contains(".from-scss"));
}

#[test]
fn test_indented_dialect() {
    let dir = project(&[
        ("main.sass", "@import dep\nbody\n  color: $color\n"),
        ("dep.sass", "$color: blue\n"),
    ]);
    let report = compile(config(&dir, "main.sass")).unwrap();
    assert!(report.css.contains("color: blue"));
}

#[test]
fn test_glob_import_in_lexical_order() {
    // y.scss consumes a variable declared in x.scss; this only compiles
    // because lexical order puts x before y in the aggregate.
    let dir = project(&[
        ("main.scss", "@import \"folder/*\";\n"),
        ("folder/x.scss", "$c: red;\n"),
        ("folder/y.scss", ".y { color: $c; }\n"),
    ]);
    let report = compile(config(&dir, "main.scss")).unwrap();
    assert!(report.css.contains("color: red"));
}

#[test]
fn test_glob_excludes_requester_and_records_matches() {
    let dir = project(&[
        ("styles/main.scss", "@import \"*\";\n"),
        ("styles/a.scss", ".a { margin: 0; }\n"),
        ("styles/plain.css", ".plain { margin: 0; }\n"),
    ]);
    let report = compile(config(&dir, "styles/main.scss")).unwrap();
    assert!(report.css.contains(".a"));
    assert!(report.dependencies.iter().any(|d| d.path.ends_with("a.scss")));
    // Plain CSS matches never re-enter the resolver, but they still
    // belong to the dependency set.
    assert!(report.dependencies.iter().any(|d| d.path.ends_with("plain.css")));
}

#[test]
fn test_empty_glob_is_a_silent_no_op() {
    let dir = project(&[("main.scss", "@import \"nothing/*\";\nbody { margin: 0; }\n")]);
    let report = compile(config(&dir, "main.scss")).unwrap();
    assert!(report.css.contains("margin: 0"));
}

#[test]
fn test_empty_glob_errors_when_configured() {
    let dir = project(&[("main.scss", "@import \"nothing/*\";\n")]);
    let mut cfg = config(&dir, "main.scss");
    cfg.error_on_empty_glob = true;
    let err = compile(cfg).unwrap_err();
    assert!(matches!(err, SassportError::EmptyGlob { .. }));
}

#[test]
fn test_missing_import_fails_naming_the_token() {
    let dir = project(&[("main.scss", "@import \"missing\";\n")]);
    let err = compile(config(&dir, "main.scss")).unwrap_err();
    let message = err.to_string();
    assert!(message.contains("missing"));
    assert!(message.contains("main.scss"));
    match err {
        SassportError::ImportNotFound { tried, .. } => assert!(!tried.is_empty()),
        other => panic!("expected ImportNotFound, got {other}"),
    }
}

#[test]
fn test_missing_token_in_mixed_statement_fails_resolution_not_compilation() {
    // The conditioned segment stays with the engine, but the plain token
    // still goes through resolution and gets the resolver's error.
    let dir = project(&[("main.scss", "@import \"missing\", \"print\" print;\n")]);
    let err = compile(config(&dir, "main.scss")).unwrap_err();
    match err {
        SassportError::ImportNotFound { token, .. } => assert_eq!(token, "missing"),
        other => panic!("expected ImportNotFound, got {other}"),
    }
}

#[test]
fn test_script_basename_collision_never_wins() {
    let dir = project(&[
        ("main.scss", "@import \"dep\";\n"),
        ("dep.js", "export const color = 'blue';\n"),
        ("dep.scss", ".dep { color: blue; }\n"),
    ]);
    let report = compile(config(&dir, "main.scss")).unwrap();
    assert!(report.css.contains(".dep"));
}

#[test]
fn test_script_without_stylesheet_fails() {
    let dir = project(&[
        ("main.scss", "@import \"dep\";\n"),
        ("dep.js", "export const color = 'blue';\n"),
    ]);
    let err = compile(config(&dir, "main.scss")).unwrap_err();
    assert!(matches!(err, SassportError::ImportNotFound { .. }));
}

#[test]
fn test_dependency_set_is_transitive_and_drives_freshness() {
    let dir = project(&[
        ("main.scss", "@import \"a\";\n"),
        ("a.scss", "@import \"b\";\n.a { margin: 0; }\n"),
        ("b.scss", ".b { margin: 0; }\n"),
    ]);
    let report = compile(config(&dir, "main.scss")).unwrap();

    for name in ["main.scss", "a.scss", "b.scss"] {
        assert!(
            report.dependencies.iter().any(|d| d.path.ends_with(name)),
            "{name} should be a recorded dependency"
        );
    }

    let host = FilesystemHost::new(dir.path().canonicalize().unwrap(), Vec::new());
    assert!(report.is_fresh(&host));

    let b = dir.path().join("b.scss").canonicalize().unwrap();
    let file = fs::File::options().write(true).open(&b).unwrap();
    file.set_modified(SystemTime::now() + Duration::from_secs(10)).unwrap();
    assert!(!report.is_fresh(&host));
}

#[test]
fn test_cross_dialect_import_on_permissive_host() {
    let dir = project(&[
        ("main.scss", "@import \"dep\";\n.main { margin: 0; }\n"),
        ("dep.sass", ".dep\n  color: red\n"),
    ]);
    let cwd = dir.path().canonicalize().unwrap();
    let host = Arc::new(FilesystemHost::new(cwd.clone(), Vec::new()).permissive());
    let engine = GrassEngine::default();
    let cfg = SassportConfig { entry: PathBuf::from("main.scss"), cwd, ..Default::default() };
    let report = compile_with(&cfg, host, &engine).unwrap();
    assert!(report.css.contains(".dep"));
    assert!(report.css.contains("color: red"));
}

#[test]
fn test_strict_host_rejects_cross_dialect_token() {
    // An extensionless token is an SCSS-syntax import; hosts with typed
    // stylesheet MIMEs refuse to answer it with an indented-dialect file.
    let dir = project(&[
        ("main.scss", "@import \"dep\";\n"),
        ("dep.sass", ".dep\n  color: red\n"),
    ]);
    let err = compile(config(&dir, "main.scss")).unwrap_err();
    assert!(matches!(err, SassportError::ImportNotFound { .. }));
}

#[test]
fn test_import_cycle_reported() {
    let dir = project(&[
        ("main.scss", "@import \"other\";\n"),
        ("other.scss", "@import \"main\";\n"),
    ]);
    let err = compile(config(&dir, "main.scss")).unwrap_err();
    assert!(matches!(err, SassportError::ImportCycle { .. }));
}

#[test]
fn test_compile_many_runs_independent_requests() {
    let dir = project(&[
        ("one.scss", "@import \"shared\";\n.one { margin: 0; }\n"),
        ("two.scss", "@import \"shared\";\n.two { margin: 0; }\n"),
        ("_shared.scss", "$unused: 0;\n"),
    ]);
    let results = compile_many(vec![config(&dir, "one.scss"), config(&dir, "two.scss")]);
    assert_eq!(results.len(), 2);
    let one = results[0].as_ref().unwrap();
    let two = results[1].as_ref().unwrap();
    assert!(one.css.contains(".one"));
    assert!(two.css.contains(".two"));
    assert!(one.dependencies.iter().any(|d| d.path.ends_with("_shared.scss")));
}

#[test]
fn test_compile_entry_is_stale_after_entry_edit() {
    let dir = project(&[("main.scss", "body { margin: 0; }\n")]);
    let report = compile(config(&dir, "main.scss")).unwrap();
    let host = FilesystemHost::new(dir.path().canonicalize().unwrap(), Vec::new());
    assert!(report.is_fresh(&host));

    let entry = dir.path().join("main.scss").canonicalize().unwrap();
    let file = fs::File::options().write(true).open(&entry).unwrap();
    file.set_modified(SystemTime::now() + Duration::from_secs(10)).unwrap();
    assert!(!report.is_fresh(&host));
}

#[test]
fn test_missing_entry_is_reported() {
    let dir = project(&[]);
    let err = compile(config(&dir, "main.scss")).unwrap_err();
    assert!(matches!(err, SassportError::EntryNotFound(_)));
}

#[test]
fn test_resolution_is_deterministic_across_runs() {
    let dir = project(&[
        ("main.scss", "@import \"parts/*\";\n"),
        ("parts/a.scss", ".a { order: 1; }\n"),
        ("parts/b.scss", ".b { order: 2; }\n"),
        ("parts/c.scss", ".c { order: 3; }\n"),
    ]);
    let first = compile(config(&dir, "main.scss")).unwrap();
    let second = compile(config(&dir, "main.scss")).unwrap();
    assert_eq!(first.css, second.css);

    let a = first.css.find(".a").unwrap();
    let b = first.css.find(".b").unwrap();
    let c = first.css.find(".c").unwrap();
    assert!(a < b && b < c);
}

#[test]
fn test_report_serializes_to_json() {
    let dir = project(&[("main.scss", "body { margin: 0; }\n")]);
    let report = compile(config(&dir, "main.scss")).unwrap();
    let json = serde_json::to_string(&report).unwrap();
    assert!(json.contains("\"css\""));
    assert!(json.contains("\"dependencies\""));
}

// Paths in assertions are canonical; keep a helper around for platforms
// where the temp dir itself is a symlink.
#[allow(dead_code)]
fn canon(path: &Path) -> PathBuf {
    path.canonicalize().unwrap_or_else(|_| path.to_path_buf())
}
