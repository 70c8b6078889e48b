//! Fallback stylesheet storage
//!
//! Holds CSS rendered lazily at request time. The AMP cache only writes to it
//! in production.

use std::sync::{Arc, PoisonError, RwLock};

/// Single-value CSS cell
pub trait CssStore: Send + Sync {
    fn get(&self) -> Option<Arc<str>>;
    fn set(&self, css: Arc<str>);
}

/// In-process CSS cell
#[derive(Debug, Default)]
pub struct MemoryCssStore {
    cell: RwLock<Option<Arc<str>>>,
}

impl MemoryCssStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start warm, e.g. from a previous render
    pub fn with_value(css: impl Into<Arc<str>>) -> Self {
        Self {
            cell: RwLock::new(Some(css.into())),
        }
    }
}

impl CssStore for MemoryCssStore {
    fn get(&self) -> Option<Arc<str>> {
        self.cell
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    fn set(&self, css: Arc<str>) {
        *self.cell.write().unwrap_or_else(PoisonError::into_inner) = Some(css);
    }
}
