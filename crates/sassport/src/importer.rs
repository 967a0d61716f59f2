use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::SystemTime;
use tracing::debug;

use crate::dependencies::DependencyRecorder;
use crate::engine::{materialize, CompilationUnit, Engine};
use crate::globs::{aggregate_imports, is_glob, resolve_glob};
use crate::host::HostEnvironment;
use crate::parser::scan_imports;
use crate::resolver::ImportResolver;
use crate::types::{SassportError, Syntax};

/// The importer plugin surface exposed to the stylesheet compiler.
///
/// `find`/`find_relative` answer a single import token with a ready
/// [`CompilationUnit`]; the compile driver below runs the same machinery
/// recursively for a whole top-level request.
pub struct Importer {
    resolver: ImportResolver,
}

impl Importer {
    pub fn new(host: Arc<dyn HostEnvironment>) -> Self {
        Self { resolver: ImportResolver::new(host) }
    }

    pub fn resolver(&self) -> &ImportResolver {
        &self.resolver
    }

    fn host(&self) -> &Arc<dyn HostEnvironment> {
        self.resolver.host()
    }

    /// Human-readable identity, for diagnostics only.
    pub fn describe(&self) -> String {
        format!("sassport::Importer({})", self.host().root_dir().display())
    }

    /// Stable cache key for a token: a namespace built from the importer
    /// identity and the token's directory, plus the basename.
    pub fn cache_key(&self, token: &Path) -> (String, String) {
        let dirname = token.parent().unwrap_or_else(|| Path::new(""));
        let basename =
            token.file_name().map(|n| n.to_string_lossy().into_owned()).unwrap_or_default();
        (format!("sassport::Importer:{}", dirname.display()), basename)
    }

    /// Modification time of whatever asset currently answers the token.
    pub fn last_modified(&self, token: &Path, base_path: &Path) -> Option<SystemTime> {
        self.resolver.last_modified(token, base_path)
    }

    /// Absolute or root-relative lookup, used when no importing file is in
    /// scope. Resolution is anchored at the project root.
    pub fn find(
        &self,
        token: &Path,
        recorder: &DependencyRecorder,
    ) -> Result<Option<CompilationUnit>, SassportError> {
        let anchor = self.host().root_dir().join("_anchor_");
        self.find_relative(token, &anchor, recorder)
    }

    /// Glob-aware lookup relative to the importing file.
    ///
    /// Returns `Ok(None)` when nothing answers the token; plain-path
    /// callers treat that as not-found, glob callers as "no import
    /// emitted".
    pub fn find_relative(
        &self,
        token: &Path,
        base_path: &Path,
        recorder: &DependencyRecorder,
    ) -> Result<Option<CompilationUnit>, SassportError> {
        let token_str = token.to_string_lossy();
        if is_glob(&token_str) {
            let matches =
                resolve_glob(self.host().as_ref(), self.resolver.policy(), &token_str, base_path)?;
            if matches.is_empty() {
                return Ok(None);
            }
            for asset in &matches {
                recorder.record_with_mtime(&asset.path, asset.mtime);
            }
            let body = aggregate_imports(&matches, base_path);
            return Ok(Some(CompilationUnit {
                text: body,
                filename: base_path.to_path_buf(),
                syntax: Syntax::of_path(base_path),
            }));
        }

        match self.resolver.resolve(token, base_path) {
            None => Ok(None),
            Some(asset) => {
                recorder.record_with_mtime(&asset.path, asset.mtime);
                let unit = materialize(self.host().as_ref(), &asset)?;
                Ok(Some(unit))
            }
        }
    }
}

/// Recursive-descent driver for one top-level compile request.
///
/// The engine is consumed as an opaque service with no importer callback,
/// so nested imports are flattened here: each resolved file is
/// materialized, its own imports expanded with the new file's directory as
/// the frame base, and the result spliced in place of the statement. The
/// fully flattened source is handed to the engine once.
pub struct CompileDriver<'a> {
    importer: &'a Importer,
    engine: &'a dyn Engine,
    recorder: &'a DependencyRecorder,
    error_on_empty_glob: bool,
    /// Compilation frame stack; also the cycle detector.
    stack: Vec<PathBuf>,
}

impl<'a> CompileDriver<'a> {
    pub fn new(
        importer: &'a Importer,
        engine: &'a dyn Engine,
        recorder: &'a DependencyRecorder,
        error_on_empty_glob: bool,
    ) -> Self {
        Self { importer, engine, recorder, error_on_empty_glob, stack: Vec::new() }
    }

    /// Flatten and compile one entry unit to CSS.
    pub fn compile(&mut self, unit: &CompilationUnit) -> Result<String, SassportError> {
        self.stack.push(unit.filename.clone());
        let flattened = self.flatten(unit);
        self.stack.pop();
        let text = flattened?;
        let flattened_unit =
            CompilationUnit { text, filename: unit.filename.clone(), syntax: unit.syntax };
        Ok(self.engine.render(&flattened_unit)?)
    }

    /// Replace every resolvable import statement in the unit's text with
    /// the flattened body of its target. Non-import text is untouched.
    fn flatten(&mut self, unit: &CompilationUnit) -> Result<String, SassportError> {
        let statements = scan_imports(&unit.text, unit.syntax);
        if statements.is_empty() {
            return Ok(unit.text.clone());
        }

        let mut out = String::with_capacity(unit.text.len());
        let mut cursor = 0;
        for statement in statements {
            out.push_str(&unit.text[cursor..statement.span.start]);
            cursor = statement.span.end;

            // Engine-bound segments are re-emitted as written, with the
            // unit's own statement terminator.
            for target in &statement.passthrough {
                match unit.syntax {
                    Syntax::Scss => out.push_str(&format!("@import {target};\n")),
                    Syntax::Sass => out.push_str(&format!("@import {target}\n")),
                }
            }
            for token in &statement.tokens {
                out.push_str(&self.expand_token(token, unit)?);
            }
        }
        out.push_str(&unit.text[cursor..]);
        Ok(out)
    }

    fn expand_token(
        &mut self,
        token: &str,
        parent: &CompilationUnit,
    ) -> Result<String, SassportError> {
        let base_path = &parent.filename;
        if is_glob(token) {
            return self.expand_glob(token, parent);
        }

        let token_path = Path::new(token);
        let asset = self
            .importer
            .resolver()
            .resolve_with_attempts(token_path, base_path)
            .map_err(|tried| SassportError::ImportNotFound {
                token: token.to_string(),
                from: base_path.clone(),
                tried,
            })?;

        if self.stack.contains(&asset.path) {
            let mut chain = self.stack.clone();
            chain.push(asset.path.clone());
            return Err(SassportError::ImportCycle { chain });
        }

        self.recorder.record_with_mtime(&asset.path, asset.mtime);
        let unit = materialize(self.importer.host().as_ref(), &asset)?;

        self.stack.push(asset.path.clone());
        let result = self.splice_unit(&unit, parent.syntax);
        self.stack.pop();
        result
    }

    fn expand_glob(
        &mut self,
        token: &str,
        parent: &CompilationUnit,
    ) -> Result<String, SassportError> {
        let matches = resolve_glob(
            self.importer.host().as_ref(),
            self.importer.resolver().policy(),
            token,
            &parent.filename,
        )?;
        if matches.is_empty() {
            debug!(token, from = %parent.filename.display(), "glob matched nothing");
            if self.error_on_empty_glob {
                return Err(SassportError::EmptyGlob {
                    token: token.to_string(),
                    from: parent.filename.clone(),
                });
            }
            // Collapses to "nothing to import", not an error.
            return Ok(String::new());
        }

        // Every match invalidates the compile when edited, including plain
        // CSS contributors whose statements never come back through the
        // resolver.
        for asset in &matches {
            self.recorder.record_with_mtime(&asset.path, asset.mtime);
        }

        let aggregate = CompilationUnit {
            text: aggregate_imports(&matches, &parent.filename),
            filename: parent.filename.clone(),
            syntax: parent.syntax,
        };
        self.flatten(&aggregate)
    }

    /// Splice an imported unit into its parent. Same dialect: flatten and
    /// inline the source. Cross-dialect: the text cannot be mixed into the
    /// parent source, so the import is compiled on its own and its CSS
    /// spliced instead.
    fn splice_unit(
        &mut self,
        unit: &CompilationUnit,
        parent_syntax: Syntax,
    ) -> Result<String, SassportError> {
        let flattened = self.flatten(unit)?;
        if unit.syntax == parent_syntax {
            return Ok(flattened);
        }
        let standalone =
            CompilationUnit { text: flattened, filename: unit.filename.clone(), syntax: unit.syntax };
        Ok(self.engine.render(&standalone)?)
    }
}
