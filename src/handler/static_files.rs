//! Static file serving
//!
//! Paths the site dispatcher defers fall through to here: exact
//! passthrough files first (service worker, manifest), then the static
//! asset directory.

use crate::handler::router::RequestContext;
use crate::http::{self, cache, mime};
use crate::logger;
use http_body_util::Full;
use hyper::body::Bytes;
use hyper::Response;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use tokio::fs;

/// Serve a passthrough file mapped to exactly this request path
pub async fn serve_passthrough(
    ctx: &RequestContext<'_>,
    passthrough: &HashMap<String, String>,
) -> Option<Response<Full<Bytes>>> {
    let file_path = passthrough.get(ctx.path)?;
    match load_single_file(Path::new(file_path)).await {
        Some((content, content_type)) => Some(build_static_file_response(
            content,
            content_type,
            ctx.if_none_match.as_deref(),
            ctx.is_head,
        )),
        None => {
            logger::log_warning(&format!(
                "Passthrough file for '{}' is missing: {file_path}",
                ctx.path
            ));
            None
        }
    }
}

/// Serve a file from the static directory
pub async fn serve_directory(
    ctx: &RequestContext<'_>,
    static_dir: &str,
    index_files: &[String],
) -> Option<Response<Full<Bytes>>> {
    let (content, content_type) = load_from_directory(static_dir, ctx.path, index_files).await?;
    Some(build_static_file_response(
        content,
        content_type,
        ctx.if_none_match.as_deref(),
        ctx.is_head,
    ))
}

/// Load a file from the static directory with index file support
///
/// Paths resolving outside `static_dir` are refused.
pub async fn load_from_directory(
    static_dir: &str,
    path: &str,
    index_files: &[String],
) -> Option<(Vec<u8>, &'static str)> {
    let relative_path = path.trim_start_matches('/');
    if relative_path.split('/').any(|segment| segment == "..") {
        logger::log_warning(&format!("Path traversal attempt blocked: {path}"));
        return None;
    }

    let static_root = match Path::new(static_dir).canonicalize() {
        Ok(p) => p,
        Err(e) => {
            logger::log_debug(&format!(
                "Static directory not found or inaccessible '{static_dir}': {e}"
            ));
            return None;
        }
    };

    let mut file_path = static_root.join(relative_path);
    if file_path.is_dir() {
        file_path = find_index_file(&file_path, index_files)?;
    }

    // A missing file is an ordinary 404
    let canonical = file_path.canonicalize().ok()?;
    if !canonical.starts_with(&static_root) {
        logger::log_warning(&format!(
            "Path traversal attempt blocked: {} -> {}",
            path,
            canonical.display()
        ));
        return None;
    }

    load_single_file(&canonical).await
}

fn find_index_file(dir: &Path, index_files: &[String]) -> Option<PathBuf> {
    index_files
        .iter()
        .map(|name| dir.join(name))
        .find(|candidate| candidate.is_file())
}

/// Load a single file and detect its content type
pub async fn load_single_file(path: &Path) -> Option<(Vec<u8>, &'static str)> {
    let content = match fs::read(path).await {
        Ok(c) => c,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return None,
        Err(e) => {
            logger::log_error(&format!("Failed to read file '{}': {e}", path.display()));
            return None;
        }
    };
    let content_type = mime::get_content_type(path.extension().and_then(|e| e.to_str()));
    Some((content, content_type))
}

/// Build a file response, or 304 when the client copy is current
fn build_static_file_response(
    data: Vec<u8>,
    content_type: &str,
    if_none_match: Option<&str>,
    is_head: bool,
) -> Response<Full<Bytes>> {
    let etag = cache::generate_etag(&data);
    if cache::check_etag_match(if_none_match, &etag) {
        return http::build_304_response(&etag);
    }
    http::build_file_response(Bytes::from(data), content_type, &etag, is_head)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs as stdfs;

    fn index_files() -> Vec<String> {
        vec!["index.html".to_string()]
    }

    #[tokio::test]
    async fn test_load_asset_and_index() {
        let dir = tempfile::tempdir().unwrap();
        stdfs::create_dir(dir.path().join("img")).unwrap();
        stdfs::write(dir.path().join("img/logo.svg"), "<svg/>").unwrap();
        stdfs::write(dir.path().join("img/index.html"), "<p>gallery</p>").unwrap();
        let root = dir.path().to_str().unwrap();

        let (content, ct) = load_from_directory(root, "/img/logo.svg", &index_files())
            .await
            .unwrap();
        assert_eq!(content, b"<svg/>");
        assert_eq!(ct, "image/svg+xml");

        let (content, _) = load_from_directory(root, "/img/", &index_files())
            .await
            .unwrap();
        assert_eq!(content, b"<p>gallery</p>");
    }

    #[tokio::test]
    async fn test_traversal_and_missing() {
        let dir = tempfile::tempdir().unwrap();
        let public = dir.path().join("public");
        stdfs::create_dir(&public).unwrap();
        stdfs::write(dir.path().join("secret.txt"), "no").unwrap();
        let root = public.to_str().unwrap();

        assert!(load_from_directory(root, "/../secret.txt", &index_files())
            .await
            .is_none());
        assert!(load_from_directory(root, "/nope.css", &index_files())
            .await
            .is_none());
        assert!(load_from_directory("/does/not/exist", "/a.css", &index_files())
            .await
            .is_none());
    }

    #[test]
    fn test_etag_revalidation() {
        let data = b"body { margin: 0 }".to_vec();
        let etag = cache::generate_etag(&data);
        let resp = build_static_file_response(data.clone(), "text/css", Some(&etag), false);
        assert_eq!(resp.status(), 304);
        let resp = build_static_file_response(data, "text/css", None, false);
        assert_eq!(resp.status(), 200);
        assert_eq!(resp.headers()["etag"], etag.as_str());
    }
}
