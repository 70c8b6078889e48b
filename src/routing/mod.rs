//! Routing module
//!
//! Resolves request paths to site sections:
//! - Section registry built once from the content directory
//! - Path matching for `/<section>` and `/<section>/<rest>`
//! - Mount prefix recovery from original and current request paths

mod matcher;
mod mount;
mod sections;

pub use matcher::{match_section, SectionMatch, ROOT_SECTION};
pub use mount::resolve_mount_path;
pub use sections::{SectionRegistry, RESERVED_PREFIX};
