use super::{CompilationUnit, Engine, EngineError};
use crate::types::{OutputStyle, Syntax};

/// [`Engine`] backed by the grass compiler.
pub struct GrassEngine {
    style: OutputStyle,
}

impl GrassEngine {
    pub fn new(style: OutputStyle) -> Self {
        Self { style }
    }
}

impl Default for GrassEngine {
    fn default() -> Self {
        Self::new(OutputStyle::Expanded)
    }
}

impl Engine for GrassEngine {
    fn name(&self) -> &'static str {
        "grass"
    }

    fn render(&self, unit: &CompilationUnit) -> Result<String, EngineError> {
        let options = grass::Options::default()
            .style(match self.style {
                OutputStyle::Expanded => grass::OutputStyle::Expanded,
                OutputStyle::Compressed => grass::OutputStyle::Compressed,
            })
            .input_syntax(match unit.syntax {
                Syntax::Scss => grass::InputSyntax::Scss,
                Syntax::Sass => grass::InputSyntax::Sass,
            });

        grass::from_string(unit.text.clone(), &options).map_err(|e| EngineError::Compile {
            path: unit.filename.clone(),
            message: e.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;

    #[test]
    fn test_renders_scss() {
        let engine = GrassEngine::default();
        let unit = CompilationUnit::new(
            "$color: blue;\nbody { color: $color; }\n".to_string(),
            Path::new("main.scss"),
        );
        let css = engine.render(&unit).unwrap();
        assert!(css.contains("color: blue"));
    }

    #[test]
    fn test_renders_indented_dialect() {
        let engine = GrassEngine::default();
        let unit = CompilationUnit::new(
            "$color: blue\nbody\n  color: $color\n".to_string(),
            Path::new("main.sass"),
        );
        let css = engine.render(&unit).unwrap();
        assert!(css.contains("color: blue"));
    }

    #[test]
    fn test_compile_errors_carry_the_filename() {
        let engine = GrassEngine::default();
        let unit = CompilationUnit::new("body { color: $undefined; }".to_string(), Path::new("bad.scss"));
        let err = engine.render(&unit).unwrap_err();
        assert!(err.to_string().contains("bad.scss"));
    }
}
