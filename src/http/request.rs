//! Request inspection
//!
//! Extracts the path information the site dispatcher works with.

use hyper::header::{HeaderMap, HOST};
use hyper::Request;

use crate::site::SiteRequest;

/// Headers a fronting proxy uses to pass the pre-rewrite URI, in order of preference
const ORIGINAL_URI_HEADERS: [&str; 2] = ["x-original-uri", "x-forwarded-uri"];

/// Owned request paths, borrowed as a [`SiteRequest`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestPaths {
    pub path: String,
    pub original_path: Option<String>,
    pub origin: Option<String>,
}

impl RequestPaths {
    pub fn from_request<B>(req: &Request<B>) -> Self {
        let path = req.uri().path().to_string();
        let original_path = original_path(req.headers(), &path);
        let origin = request_origin(req);
        Self {
            path,
            original_path,
            origin,
        }
    }

    pub fn as_site_request(&self) -> SiteRequest<'_> {
        SiteRequest {
            path: &self.path,
            original_path: self.original_path.as_deref(),
            origin: self.origin.as_deref(),
        }
    }
}

/// Original path from proxy headers; the current path when none is sent
///
/// A header that is present but not valid UTF-8 leaves the original
/// path unknown.
fn original_path(headers: &HeaderMap, current: &str) -> Option<String> {
    let Some(value) = ORIGINAL_URI_HEADERS
        .iter()
        .find_map(|name| headers.get(*name))
    else {
        return Some(current.to_string());
    };

    let uri = value.to_str().ok()?;
    let path = uri.split(['?', '#']).next().unwrap_or_default();
    Some(path.to_string())
}

fn request_origin<B>(req: &Request<B>) -> Option<String> {
    let host = req
        .headers()
        .get(HOST)
        .and_then(|v| v.to_str().ok())
        .or_else(|| req.uri().authority().map(hyper::http::uri::Authority::as_str))?;

    let scheme = req
        .headers()
        .get("x-forwarded-proto")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.split(',').next())
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .or_else(|| req.uri().scheme_str())
        .unwrap_or("http");

    Some(format!("{scheme}://{host}"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use hyper::header::HeaderValue;

    fn request(uri: &str, headers: &[(&str, &str)]) -> Request<()> {
        let mut builder = Request::builder().uri(uri);
        for (name, value) in headers {
            builder = builder.header(*name, *value);
        }
        builder.body(()).unwrap()
    }

    #[test]
    fn test_direct_request() {
        let paths = RequestPaths::from_request(&request(
            "/schedule/keynote?ref=home",
            &[("host", "localhost:8080")],
        ));
        assert_eq!(paths.path, "/schedule/keynote");
        assert_eq!(paths.original_path.as_deref(), Some("/schedule/keynote"));
        assert_eq!(paths.origin.as_deref(), Some("http://localhost:8080"));
    }

    #[test]
    fn test_proxied_request() {
        let paths = RequestPaths::from_request(&request(
            "/schedule/keynote",
            &[
                ("host", "summit.example.com"),
                ("x-forwarded-proto", "https, http"),
                ("x-original-uri", "/2026/schedule/keynote?utm=1"),
            ],
        ));
        assert_eq!(
            paths.original_path.as_deref(),
            Some("/2026/schedule/keynote")
        );
        assert_eq!(paths.origin.as_deref(), Some("https://summit.example.com"));
    }

    #[test]
    fn test_forwarded_uri_fallback() {
        let paths = RequestPaths::from_request(&request(
            "/venue",
            &[("x-forwarded-uri", "/site/venue")],
        ));
        assert_eq!(paths.original_path.as_deref(), Some("/site/venue"));
        assert_eq!(paths.origin, None);
    }

    #[test]
    fn test_non_utf8_original_is_unknown() {
        let mut req = request("/venue", &[]);
        req.headers_mut().insert(
            "x-original-uri",
            HeaderValue::from_bytes(b"/caf\xe9/venue").unwrap(),
        );
        let paths = RequestPaths::from_request(&req);
        assert_eq!(paths.original_path, None);
    }

    #[test]
    fn test_absolute_uri_origin() {
        let paths = RequestPaths::from_request(&request("https://conf.example.org/faq", &[]));
        assert_eq!(paths.path, "/faq");
        assert_eq!(paths.origin.as_deref(), Some("https://conf.example.org"));
    }
}
