//! Request routing
//!
//! Entry point for HTTP request processing: method and size guards,
//! health endpoints, site pages, then passthrough and static files.

use crate::config::AppState;
use crate::error::PageError;
use crate::handler::static_files;
use crate::http::{self, CachePolicy, RequestPaths};
use crate::logger::{self, AccessLogEntry};
use crate::site::Dispatch;
use http_body_util::Full;
use hyper::body::{Body as _, Bytes};
use hyper::header::{HeaderValue, SERVER};
use hyper::{Method, Request, Response, Version};
use std::convert::Infallible;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Instant;

/// Request data the fallback file handlers need
pub struct RequestContext<'a> {
    pub path: &'a str,
    pub is_head: bool,
    pub if_none_match: Option<String>,
}

/// Main entry point for HTTP request handling
pub async fn handle_request<B>(
    req: Request<B>,
    state: Arc<AppState>,
    remote_addr: SocketAddr,
) -> Result<Response<Full<Bytes>>, Infallible> {
    let started = Instant::now();
    let mut response = route_request(&req, &state).await;

    if let Ok(server) = HeaderValue::from_str(&state.config.http.server_name) {
        response.headers_mut().insert(SERVER, server);
    }

    if state.config.logging.access_log {
        let entry = access_entry(&req, &response, remote_addr, started);
        logger::log_access(&entry, &state.config.logging.access_log_format);
    }

    Ok(response)
}

async fn route_request<B>(req: &Request<B>, state: &AppState) -> Response<Full<Bytes>> {
    let config = &state.config;

    // 1. Check HTTP method
    if let Some(resp) = check_http_method(req.method(), config.http.enable_cors) {
        return resp;
    }

    // 2. Check body size
    if let Some(resp) = check_body_size(req, config.http.max_body_size) {
        return resp;
    }

    // 3. Log headers if enabled
    logger::log_headers_count(req.headers().len(), config.logging.show_headers);

    let path = req.uri().path();

    // 4. Health endpoints, answered before any site work
    let health = &config.routes.health;
    if health.enabled && (path == health.liveness_path || path == health.readiness_path) {
        return http::build_health_response();
    }

    let ctx = RequestContext {
        path,
        is_head: *req.method() == Method::HEAD,
        if_none_match: req
            .headers()
            .get("if-none-match")
            .and_then(|v| v.to_str().ok())
            .map(ToString::to_string),
    };

    // 5. Site pages
    let paths = RequestPaths::from_request(req);
    match render_site_page(state, &paths).await {
        Ok(Some(page)) => {
            return http::build_page_response(
                page.html,
                ctx.is_head,
                &config.http.security_header,
                CachePolicy::for_pages(page.production),
            );
        }
        Ok(None) => {}
        Err(e) => {
            logger::log_error(&format!("Failed to render '{path}': {e}"));
            return http::build_500_response();
        }
    }

    // 6. Passthrough files, then static assets
    let routes = &config.routes;
    if let Some(resp) = static_files::serve_passthrough(&ctx, &routes.passthrough).await {
        return resp;
    }
    if let Some(resp) =
        static_files::serve_directory(&ctx, &routes.static_dir, &routes.index_files).await
    {
        return resp;
    }

    http::build_404_response()
}

struct RenderedPage {
    html: String,
    production: bool,
}

/// Render the page for this request, or `None` when the site defers it
async fn render_site_page(
    state: &AppState,
    paths: &RequestPaths,
) -> Result<Option<RenderedPage>, PageError> {
    match state.dispatcher.dispatch(&paths.as_site_request()).await? {
        Dispatch::Deferred => Ok(None),
        Dispatch::Rendered(page) => {
            let production = page.prod;
            let html = Arc::clone(&state.templates).render_page(*page).await?;
            Ok(Some(RenderedPage { html, production }))
        }
    }
}

/// Check HTTP method and return appropriate response for non-GET/HEAD methods
fn check_http_method(method: &Method, enable_cors: bool) -> Option<Response<Full<Bytes>>> {
    match *method {
        Method::GET | Method::HEAD => None,
        Method::OPTIONS => Some(http::build_options_response(enable_cors)),
        _ => {
            logger::log_warning(&format!("Method not allowed: {method}"));
            Some(http::build_405_response())
        }
    }
}

/// Validate Content-Length header and return 413 if exceeded
fn check_body_size<B>(req: &Request<B>, max_body_size: u64) -> Option<Response<Full<Bytes>>> {
    let content_length = req.headers().get("content-length")?;
    let Ok(size_str) = content_length.to_str() else {
        logger::log_warning("Content-Length header contains non-ASCII characters");
        return None;
    };
    match size_str.parse::<u64>() {
        Ok(size) if size > max_body_size => {
            logger::log_error(&format!(
                "Request body too large: {size} bytes (max: {max_body_size})"
            ));
            Some(http::build_413_response())
        }
        Ok(_) => None,
        Err(_) => {
            logger::log_warning(&format!(
                "Invalid Content-Length value: '{size_str}', skipping size check"
            ));
            None
        }
    }
}

fn access_entry<B>(
    req: &Request<B>,
    resp: &Response<Full<Bytes>>,
    remote_addr: SocketAddr,
    started: Instant,
) -> AccessLogEntry {
    let header = |name: &str| {
        req.headers()
            .get(name)
            .and_then(|v| v.to_str().ok())
            .map(ToString::to_string)
    };

    let mut entry = AccessLogEntry::new(
        remote_addr.ip().to_string(),
        req.method().to_string(),
        req.uri().path().to_string(),
    );
    entry.query = req.uri().query().map(ToString::to_string);
    entry.http_version = match req.version() {
        Version::HTTP_10 => "1.0",
        Version::HTTP_2 => "2",
        _ => "1.1",
    }
    .to_string();
    entry.status = resp.status().as_u16();
    entry.body_bytes = resp
        .body()
        .size_hint()
        .exact()
        .and_then(|n| usize::try_from(n).ok())
        .unwrap_or(0);
    entry.referer = header("referer");
    entry.user_agent = header("user-agent");
    entry.request_time_us = u64::try_from(started.elapsed().as_micros()).unwrap_or(u64::MAX);
    entry
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use http_body_util::BodyExt;
    use std::fs;
    use std::path::Path;

    struct Site {
        _dir: tempfile::TempDir,
        state: Arc<AppState>,
    }

    fn write(root: &Path, rel: &str, content: &str) {
        let path = root.join(rel);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, content).unwrap();
    }

    fn site(extra_site: &str) -> Site {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path();
        write(root, "sections/index.hbs", "<h1>home [{{base}}]</h1>");
        write(root, "sections/schedule.hbs", "<h1>schedule</h1>");
        write(root, "sections/venue.hbs", "<h1>venue</h1>");
        write(
            root,
            "sections/_amp-session.hbs",
            "<h1>{{title}}</h1><p>{{time_label}}</p><link rel=\"canonical\" href=\"{{origin}}{{base}}/schedule\">",
        );
        write(root, "layouts/default.hbs", "<main>{{{body}}}</main>");
        write(
            root,
            "layouts/amp.hbs",
            "<style amp-custom>{{{styles}}}</style>{{{body}}}",
        );
        write(
            root,
            "schedule.json",
            r#"{"sessions":{"keynote":{"name":"Opening Keynote","time":"09:00"}}}"#,
        );
        write(root, "amp.scss", "h1 { color: red; }");
        write(root, "amp.css", "h1{color:blue}");
        write(root, "static/img/logo.svg", "<svg/>");
        write(root, "dist/sw.js", "self.skipWaiting()");

        let r = root.display();
        let toml = format!(
            r#"
            [logging]
            access_log = false

            [site]
            sections_dir = "{r}/sections"
            layouts_dir = "{r}/layouts"
            schedule_file = "{r}/schedule.json"
            {extra_site}

            [amp]
            stylesheet_entry = "{r}/amp.scss"
            compiled_stylesheet = "{r}/amp.css"

            [routes]
            static_dir = "{r}/static"

            [routes.passthrough]
            "/sw.js" = "{r}/dist/sw.js"

            "#
        );
        let config = Config::from_toml(&toml).unwrap();
        let state = Arc::new(AppState::load(&config).unwrap());
        Site { _dir: dir, state }
    }

    fn addr() -> SocketAddr {
        "127.0.0.1:40000".parse().unwrap()
    }

    async fn get(site: &Site, req: Request<()>) -> (u16, hyper::HeaderMap, String) {
        let resp = handle_request(req, Arc::clone(&site.state), addr())
            .await
            .unwrap();
        let status = resp.status().as_u16();
        let headers = resp.headers().clone();
        let body = resp.into_body().collect().await.unwrap().to_bytes();
        (status, headers, String::from_utf8(body.to_vec()).unwrap())
    }

    fn request(method: Method, uri: &str) -> Request<()> {
        Request::builder()
            .method(method)
            .uri(uri)
            .header("host", "conf.test")
            .body(())
            .unwrap()
    }

    #[tokio::test]
    async fn test_section_page_rendered_in_layout() {
        let site = site("");
        let (status, headers, body) = get(&site, request(Method::GET, "/venue")).await;
        assert_eq!(status, 200);
        assert_eq!(body, "<main><h1>venue</h1></main>");
        assert!(headers.contains_key("content-security-policy"));
        assert_eq!(headers["cache-control"], "no-cache");
        assert_eq!(headers["server"], "conference-site");
    }

    #[tokio::test]
    async fn test_root_renders_index() {
        let site = site("");
        let (status, _, body) = get(&site, request(Method::GET, "/")).await;
        assert_eq!(status, 200);
        assert_eq!(body, "<main><h1>home []</h1></main>");
    }

    #[tokio::test]
    async fn test_mounted_base_from_original_uri() {
        let site = site("");
        let req = Request::builder()
            .uri("/")
            .header("x-original-uri", "/2026/")
            .body(())
            .unwrap();
        let (status, _, body) = get(&site, req).await;
        assert_eq!(status, 200);
        assert_eq!(body, "<main><h1>home [/2026]</h1></main>");
    }

    #[tokio::test]
    async fn test_amp_session_page() {
        let site = site("");
        let (status, _, body) = get(&site, request(Method::GET, "/schedule/keynote")).await;
        assert_eq!(status, 200);
        assert_eq!(
            body,
            "<style amp-custom>h1{color:red}</style><h1>Opening Keynote</h1><p>09:00</p>\
             <link rel=\"canonical\" href=\"http://conf.test/schedule\">"
        );
    }

    #[tokio::test]
    async fn test_unknown_session_and_sub_path_are_404() {
        let site = site("");
        for uri in ["/schedule/nope", "/venue/keynote", "/schedule/_private", "/missing"] {
            let (status, _, _) = get(&site, request(Method::GET, uri)).await;
            assert_eq!(status, 404, "{uri}");
        }
    }

    #[tokio::test]
    async fn test_deferred_paths_reach_files() {
        let site = site("");
        let (status, headers, body) = get(&site, request(Method::GET, "/sw.js")).await;
        assert_eq!(status, 200);
        assert_eq!(body, "self.skipWaiting()");
        assert_eq!(
            headers["content-type"],
            "application/javascript; charset=utf-8"
        );

        let (status, headers, body) = get(&site, request(Method::GET, "/img/logo.svg")).await;
        assert_eq!(status, 200);
        assert_eq!(body, "<svg/>");

        let mut req = request(Method::GET, "/img/logo.svg");
        req.headers_mut()
            .insert("if-none-match", headers["etag"].clone());
        let (status, _, _) = get(&site, req).await;
        assert_eq!(status, 304);
    }

    #[tokio::test]
    async fn test_head_has_no_body() {
        let site = site("");
        let (status, headers, body) = get(&site, request(Method::HEAD, "/venue")).await;
        assert_eq!(status, 200);
        assert!(body.is_empty());
        assert_eq!(headers["content-length"], "27");
    }

    #[tokio::test]
    async fn test_guards_and_health() {
        let site = site("");
        let (status, _, _) = get(&site, request(Method::POST, "/venue")).await;
        assert_eq!(status, 405);

        let (status, _, _) = get(&site, request(Method::OPTIONS, "/venue")).await;
        assert_eq!(status, 204);

        let mut req = request(Method::GET, "/venue");
        req.headers_mut()
            .insert("content-length", "99999999".parse().unwrap());
        let (status, _, _) = get(&site, req).await;
        assert_eq!(status, 413);

        let (status, _, body) = get(&site, request(Method::GET, "/healthz")).await;
        assert_eq!((status, body.as_str()), (200, "ok"));
    }

    #[tokio::test]
    async fn test_production_page_cache_policy() {
        let site = site("environment = \"production\"");
        let (status, headers, _) = get(&site, request(Method::GET, "/venue")).await;
        assert_eq!(status, 200);
        assert_eq!(headers["cache-control"], "public, max-age=300");

        let (_, _, body) = get(&site, request(Method::GET, "/schedule/keynote")).await;
        assert!(body.starts_with("<style amp-custom>h1{color:blue}</style>"));
    }
}
