use regex::Regex;
use std::ops::Range;
use std::sync::OnceLock;

use crate::types::Syntax;

/// One `@import` statement found in a stylesheet source.
#[derive(Debug, Clone, PartialEq)]
pub struct ImportStatement {
    /// Byte span of the whole statement line, including the terminator,
    /// so the caller can splice the resolved text in place.
    pub span: Range<usize>,
    /// Tokens this subsystem must resolve.
    pub tokens: Vec<String>,
    /// Argument segments left for the engine verbatim, as written:
    /// plain CSS imports, urls, conditioned imports.
    pub passthrough: Vec<String>,
}

impl ImportStatement {
    pub fn has_resolvable(&self) -> bool {
        !self.tokens.is_empty()
    }
}

/// Matches `@import` with its argument list, both dialects.
/// SCSS statements terminate with `;`, the indented dialect with newline.
fn import_regex() -> &'static Regex {
    static REGEX: OnceLock<Regex> = OnceLock::new();
    REGEX.get_or_init(|| Regex::new(r"^\s*@import\s+(.+?)\s*;?\s*$").unwrap())
}

fn quoted_regex() -> &'static Regex {
    static REGEX: OnceLock<Regex> = OnceLock::new();
    REGEX.get_or_init(|| Regex::new(r#"^['"]([^'"]+)['"]$"#).unwrap())
}

/// A token the resolver must leave to the engine: real CSS imports,
/// remote urls, and the language's builtin modules.
fn is_passthrough(token: &str) -> bool {
    token.ends_with(".css")
        || token.starts_with("http://")
        || token.starts_with("https://")
        || token.starts_with("url(")
        || token.starts_with("sass:")
}

/// Scan a stylesheet body for import statements.
///
/// Line-based by design: both dialects keep `@import` on one line in
/// practice, and spans must map back onto the original text for splicing.
/// Statements inside block comments are skipped.
pub fn scan_imports(text: &str, syntax: Syntax) -> Vec<ImportStatement> {
    let mut statements = Vec::new();
    let mut offset = 0;
    let mut in_block_comment = false;

    for line in text.split_inclusive('\n') {
        let start = offset;
        offset += line.len();

        let trimmed = line.trim();
        if in_block_comment {
            if trimmed.contains("*/") {
                in_block_comment = false;
            }
            continue;
        }
        if trimmed.starts_with("/*") && !trimmed.contains("*/") {
            in_block_comment = true;
            continue;
        }
        if trimmed.starts_with("//") {
            continue;
        }

        let Some(caps) = import_regex().captures(line.trim_end_matches('\n')) else { continue };
        // SCSS requires the terminator; the indented dialect has none.
        if syntax == Syntax::Scss && !trimmed.ends_with(';') {
            continue;
        }

        let mut tokens = Vec::new();
        let mut passthrough = Vec::new();
        for segment in caps[1].split(',') {
            let segment = segment.trim();
            if segment.is_empty() {
                continue;
            }
            let token = match quoted_regex().captures(segment) {
                Some(q) => q[1].to_string(),
                // Unquoted arguments are plain tokens in the indented
                // dialect; anything else (media queries, supports
                // conditions) stays with the engine, written as-is.
                None if syntax == Syntax::Sass => segment.to_string(),
                None => {
                    passthrough.push(segment.to_string());
                    continue;
                }
            };
            if is_passthrough(&token) {
                passthrough.push(segment.to_string());
            } else {
                tokens.push(token);
            }
        }
        if tokens.is_empty() {
            continue;
        }

        statements.push(ImportStatement { span: start..offset, tokens, passthrough });
    }

    statements
}
