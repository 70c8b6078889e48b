//! Mount path resolution
//!
//! A fronting proxy may strip an arbitrary prefix before the request reaches
//! us. The prefix is recovered by locating the path we received inside the
//! path the client originally asked for.

/// Return the prefix under which the site is mounted
///
/// Takes the original path up to the last occurrence of `current_path`.
/// Returns an empty string when the original path is unknown or does not
/// contain the current path. This is a textual match: when the current path
/// also appears inside the prefix, only the last occurrence counts.
pub fn resolve_mount_path(original_path: Option<&str>, current_path: &str) -> String {
    let Some(original) = original_path else {
        return String::new();
    };

    original
        .rfind(current_path)
        .map_or_else(String::new, |idx| original[..idx].to_string())
}
