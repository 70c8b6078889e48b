//! Stylesheet preprocessing
//!
//! Compiles the AMP stylesheet entry file to CSS.

use std::path::Path;

use crate::error::StylesheetError;

/// Turns a stylesheet entry file into CSS text
pub trait StylesheetPreprocessor: Send + Sync {
    fn compile(&self, entry: &Path) -> Result<String, StylesheetError>;
}

/// SCSS compiler backed by `grass`, compressed output for inlining
#[derive(Debug, Default, Clone, Copy)]
pub struct ScssPreprocessor;

impl StylesheetPreprocessor for ScssPreprocessor {
    fn compile(&self, entry: &Path) -> Result<String, StylesheetError> {
        let options = grass::Options::default().style(grass::OutputStyle::Compressed);
        grass::from_path(entry, &options).map_err(|e| StylesheetError::Compile {
            entry: entry.to_path_buf(),
            message: e.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_compiles_nested_rules() {
        let dir = tempfile::tempdir().unwrap();
        let entry = dir.path().join("amp.scss");
        std::fs::write(&entry, "$accent: #ff5722;\n.session { h1 { color: $accent; } }\n")
            .unwrap();

        let css = ScssPreprocessor.compile(&entry).unwrap();
        assert!(css.contains(".session h1"));
        assert!(css.contains("#ff5722"));
    }

    #[test]
    fn test_missing_entry_is_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = ScssPreprocessor
            .compile(&dir.path().join("missing.scss"))
            .unwrap_err();
        assert!(matches!(err, StylesheetError::Compile { .. }));
    }

    #[test]
    fn test_syntax_error_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        let entry = dir.path().join("broken.scss");
        std::fs::write(&entry, ".a { color: $undefined; }").unwrap();

        let err = ScssPreprocessor.compile(&entry).unwrap_err();
        assert!(err.to_string().contains("broken.scss"));
    }
}
