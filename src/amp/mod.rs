//! AMP support
//!
//! The session detail page is served as AMP, which requires its CSS inline.
//! This module owns producing and caching that CSS.

mod css;
mod preprocessor;
mod store;

pub use css::AmpCss;
pub use preprocessor::{ScssPreprocessor, StylesheetPreprocessor};
pub use store::{CssStore, MemoryCssStore};
