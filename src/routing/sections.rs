//! Section registry
//!
//! The closed set of page sections, read once from the content directory.

use std::collections::BTreeSet;
use std::path::Path;

use crate::error::SiteError;

/// Prefix reserved for sub-templates that are never routable on their own
pub const RESERVED_PREFIX: char = '_';

/// Immutable, ordered set of routable section names
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SectionRegistry {
    names: BTreeSet<String>,
}

impl SectionRegistry {
    /// Scan `dir` (non-recursive) for `*.{extension}` entries
    ///
    /// Entries starting with `_` or lacking the extension are skipped.
    /// An unreadable directory is an error; the caller treats it as fatal.
    pub fn scan(dir: &Path, extension: &str) -> Result<Self, SiteError> {
        let read_err = |source| SiteError::Sections {
            path: dir.to_path_buf(),
            source,
        };

        let suffix = format!(".{}", extension.trim_start_matches('.'));
        let mut names = BTreeSet::new();

        for entry in std::fs::read_dir(dir).map_err(read_err)? {
            let entry = entry.map_err(read_err)?;
            if entry.file_type().map_err(read_err)?.is_dir() {
                continue;
            }
            let file_name = entry.file_name();
            let Some(file_name) = file_name.to_str() else {
                continue;
            };
            if let Some(name) = section_name(file_name, &suffix) {
                names.insert(name.to_string());
            }
        }

        Ok(Self { names })
    }

    /// Build a registry from explicit names, applying the reserved-prefix rule
    pub fn from_names<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            names: names
                .into_iter()
                .map(Into::into)
                .filter(|n| !n.is_empty() && !n.starts_with(RESERVED_PREFIX))
                .collect(),
        }
    }

    pub fn contains(&self, name: &str) -> bool {
        self.names.contains(name)
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.names.iter().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

fn section_name<'a>(file_name: &'a str, suffix: &str) -> Option<&'a str> {
    if file_name.starts_with(RESERVED_PREFIX) {
        return None;
    }
    file_name
        .strip_suffix(suffix)
        .filter(|stem| !stem.is_empty())
}
