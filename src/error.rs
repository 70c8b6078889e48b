//! Error types
//!
//! `SiteError` covers everything that can stop the server from starting.
//! `PageError` covers failures while producing a single page; the router
//! turns those into a 500 response.

use std::path::PathBuf;

/// Startup failure
#[derive(Debug, thiserror::Error)]
pub enum SiteError {
    #[error("invalid configuration: {0}")]
    Config(#[from] config::ConfigError),

    #[error("invalid address: {0}")]
    Address(String),

    #[error("cannot read sections directory '{}': {source}", path.display())]
    Sections {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("cannot read schedule '{}': {source}", path.display())]
    ScheduleIo {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed schedule '{}': {source}", path.display())]
    ScheduleParse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("cannot read templates directory '{}': {source}", path.display())]
    TemplateDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("template registration failed: {0}")]
    Template(#[from] Box<handlebars::TemplateError>),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Failure while rendering a page
#[derive(Debug, thiserror::Error)]
pub enum PageError {
    #[error(transparent)]
    Stylesheet(#[from] StylesheetError),

    #[error("template render failed: {0}")]
    Render(#[from] Box<handlebars::RenderError>),

    #[error("render context serialization failed: {0}")]
    Context(#[from] serde_json::Error),

    #[error("render task aborted: {0}")]
    Aborted(String),
}

/// Stylesheet preprocessing failure
#[derive(Debug, Clone, thiserror::Error)]
pub enum StylesheetError {
    #[error("stylesheet '{}' failed to compile: {message}", entry.display())]
    Compile { entry: PathBuf, message: String },

    #[error("stylesheet task aborted: {0}")]
    Aborted(String),
}

impl From<handlebars::TemplateError> for SiteError {
    fn from(err: handlebars::TemplateError) -> Self {
        Self::Template(Box::new(err))
    }
}

impl From<handlebars::RenderError> for PageError {
    fn from(err: handlebars::RenderError) -> Self {
        Self::Render(Box::new(err))
    }
}
