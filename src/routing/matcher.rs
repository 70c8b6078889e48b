//! Section path matching
//!
//! Splits a request path into `/<section>/<rest>` and checks the section
//! against the registry.

use super::sections::SectionRegistry;

/// Section served for the bare root path
pub const ROOT_SECTION: &str = "index";

/// A request path resolved against the section registry
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SectionMatch<'a> {
    pub section: &'a str,
    /// Remainder after the section segment, without the separating slash
    pub rest: Option<&'a str>,
}

/// Match `path` against the registry
///
/// `/` maps to [`ROOT_SECTION`]. A trailing slash after the section does not
/// count as a sub-path.
pub fn match_section<'a>(path: &'a str, sections: &SectionRegistry) -> Option<SectionMatch<'a>> {
    let trimmed = path.strip_prefix('/')?;

    let (section, rest) = match trimmed.split_once('/') {
        Some((section, rest)) => (section, Some(rest).filter(|r| !r.is_empty())),
        None => (trimmed, None),
    };

    let section = if section.is_empty() && rest.is_none() {
        ROOT_SECTION
    } else {
        section
    };

    sections
        .contains(section)
        .then_some(SectionMatch { section, rest })
}
