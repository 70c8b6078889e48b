//! AMP stylesheet cache
//!
//! Resolution order on every AMP request:
//! 1. eager value, read from the precompiled artifact at startup (production only)
//! 2. fallback store, filled by an earlier request (production only)
//! 3. fresh compile of the entry file
//!
//! Development never persists the fresh compile, so edits to the SCSS
//! sources show up on the next request.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use super::preprocessor::StylesheetPreprocessor;
use super::store::CssStore;
use crate::error::StylesheetError;
use crate::logger;

pub struct AmpCss {
    eager: Option<Arc<str>>,
    fallback: Arc<dyn CssStore>,
    preprocessor: Arc<dyn StylesheetPreprocessor>,
    entry: PathBuf,
    production: bool,
}

impl AmpCss {
    /// Build the cache, reading `compiled` up front when in production
    ///
    /// A missing or unreadable artifact is not an error: requests fall back
    /// to compiling `entry`.
    pub fn load(
        compiled: &Path,
        entry: PathBuf,
        production: bool,
        fallback: Arc<dyn CssStore>,
        preprocessor: Arc<dyn StylesheetPreprocessor>,
    ) -> Self {
        let eager = if production {
            match std::fs::read_to_string(compiled) {
                Ok(css) => Some(Arc::from(css)),
                Err(e) => {
                    logger::log_warning(&format!(
                        "Precompiled AMP stylesheet '{}' unavailable ({e}), compiling on first request",
                        compiled.display()
                    ));
                    None
                }
            }
        } else {
            None
        };

        Self {
            eager,
            fallback,
            preprocessor,
            entry,
            production,
        }
    }

    /// Return the AMP stylesheet, compiling it if nothing is cached
    pub async fn get(&self) -> Result<Arc<str>, StylesheetError> {
        if let Some(css) = &self.eager {
            return Ok(Arc::clone(css));
        }
        if let Some(css) = self.fallback.get() {
            return Ok(css);
        }

        let preprocessor = Arc::clone(&self.preprocessor);
        let entry = self.entry.clone();
        let css: Arc<str> = tokio::task::spawn_blocking(move || preprocessor.compile(&entry))
            .await
            .map_err(|e| StylesheetError::Aborted(e.to_string()))??
            .into();

        logger::log_debug(&format!(
            "Compiled AMP stylesheet '{}' ({} bytes)",
            self.entry.display(),
            css.len()
        ));

        if self.production {
            self.fallback.set(Arc::clone(&css));
        }
        Ok(css)
    }

    #[cfg(test)]
    pub const fn has_eager(&self) -> bool {
        self.eager.is_some()
    }
}
