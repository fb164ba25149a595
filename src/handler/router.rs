//! Request routing dispatch module
//!
//! Entry point for HTTP request processing: body-size validation, body
//! collection, route matching and dispatch to the snippet handlers.

use crate::config::Config;
use crate::handler::snippets;
use crate::http;
use crate::logger::{self, AccessLogEntry};
use http_body_util::{BodyExt, Full};
use hyper::body::{Body, Bytes};
use hyper::http::request::Parts;
use hyper::{Request, Response};
use std::convert::Infallible;
use std::net::SocketAddr;
use std::sync::Arc;

/// Registered route handlers
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RouteHandler {
    Home,
    ShowSnippet,
    CreateSnippet,
}

/// Static route table, ordered longest prefix first so a sequential scan
/// implements longest-prefix matching. "/" is the catch-all; the home
/// handler itself rejects anything but the exact root path.
const ROUTES: &[(&str, RouteHandler)] = &[
    ("/snippet/create", RouteHandler::CreateSnippet),
    ("/snippet", RouteHandler::ShowSnippet),
    ("/", RouteHandler::Home),
];

/// Find the handler for a path (longest matching prefix wins)
pub fn match_route(path: &str) -> RouteHandler {
    ROUTES
        .iter()
        .find(|(prefix, _)| path.starts_with(prefix))
        .map_or(RouteHandler::Home, |(_, handler)| *handler)
}

/// Main entry point for HTTP request handling
pub async fn handle_request(
    req: Request<hyper::body::Incoming>,
    config: Arc<Config>,
    peer_addr: SocketAddr,
) -> Result<Response<Full<Bytes>>, Infallible> {
    // 1. Check body size before buffering anything
    if let Some(resp) = check_body_size(req.headers(), config.http.max_body_size) {
        return Ok(resp);
    }

    // 2. Buffer the body; the request dump re-encodes POST form data
    let (parts, incoming) = req.into_parts();
    let body = match incoming.collect().await {
        Ok(collected) => collected.to_bytes(),
        Err(e) => {
            logger::log_error(&format!("Failed to read request body: {e}"));
            Bytes::new()
        }
    };

    // 3. Route and run the handler
    let response = dispatch(&parts, &body);

    // 4. Access log
    if config.logging.access_log {
        let body_bytes = response
            .body()
            .size_hint()
            .exact()
            .and_then(|n| usize::try_from(n).ok())
            .unwrap_or(0);
        let entry = AccessLogEntry::from_parts(
            peer_addr.to_string(),
            &parts,
            response.status().as_u16(),
            body_bytes,
        );
        logger::log_access(&entry, &config.logging.access_log_format);
    }

    Ok(response)
}

/// Route a single request to its handler; pure over the request head
/// and buffered body
pub fn dispatch(parts: &Parts, body: &Bytes) -> Response<Full<Bytes>> {
    match match_route(parts.uri.path()) {
        RouteHandler::Home => snippets::home(parts),
        RouteHandler::ShowSnippet => snippets::show_snippet(parts, body),
        RouteHandler::CreateSnippet => snippets::create_snippet(parts),
    }
}

/// Validate Content-Length header and return 413 if exceeded
fn check_body_size(
    headers: &hyper::HeaderMap,
    max_body_size: u64,
) -> Option<Response<Full<Bytes>>> {
    let content_length = headers.get("content-length")?;
    content_length.to_str().map_or_else(
        |_| {
            logger::log_warning("Content-Length header contains non-ASCII characters");
            None
        },
        |size_str| match size_str.parse::<u64>() {
            Ok(size) if size > max_body_size => {
                logger::log_error(&format!(
                    "Request body too large: {size} bytes (max: {max_body_size})"
                ));
                Some(http::build_413_response())
            }
            Err(_) => {
                logger::log_warning(&format!(
                    "Invalid Content-Length value: '{size_str}', skipping size check"
                ));
                None
            }
            _ => None,
        },
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use hyper::Request;

    fn parts_for(method: &str, uri: &str) -> Parts {
        Request::builder()
            .method(method)
            .uri(uri)
            .body(())
            .unwrap()
            .into_parts()
            .0
    }

    #[test]
    fn test_match_route_exact() {
        assert_eq!(match_route("/"), RouteHandler::Home);
        assert_eq!(match_route("/snippet"), RouteHandler::ShowSnippet);
        assert_eq!(match_route("/snippet/create"), RouteHandler::CreateSnippet);
    }

    #[test]
    fn test_match_route_longest_prefix_wins() {
        assert_eq!(match_route("/snippet/create/"), RouteHandler::CreateSnippet);
        assert_eq!(match_route("/snippet/7"), RouteHandler::ShowSnippet);
    }

    #[test]
    fn test_match_route_catch_all() {
        assert_eq!(match_route("/contact"), RouteHandler::Home);
        assert_eq!(match_route("/snip"), RouteHandler::Home);
    }

    #[test]
    fn test_dispatch_home() {
        let resp = dispatch(&parts_for("GET", "/"), &Bytes::new());
        assert_eq!(resp.status(), 200);
    }

    #[test]
    fn test_dispatch_unregistered_path_is_404() {
        let resp = dispatch(&parts_for("GET", "/contact"), &Bytes::new());
        assert_eq!(resp.status(), 404);
    }

    #[test]
    fn test_dispatch_show_snippet() {
        let resp = dispatch(&parts_for("GET", "/snippet?id=5"), &Bytes::new());
        assert_eq!(resp.status(), 200);

        let resp = dispatch(&parts_for("GET", "/snippet"), &Bytes::new());
        assert_eq!(resp.status(), 404);
    }

    #[test]
    fn test_dispatch_create_snippet_methods() {
        let resp = dispatch(&parts_for("POST", "/snippet/create"), &Bytes::new());
        assert_eq!(resp.status(), 200);

        let resp = dispatch(&parts_for("GET", "/snippet/create"), &Bytes::new());
        assert_eq!(resp.status(), 405);

        // Trailing slash still reaches the create handler
        let resp = dispatch(&parts_for("POST", "/snippet/create/"), &Bytes::new());
        assert_eq!(resp.status(), 200);
    }

    #[test]
    fn test_check_body_size_over_limit() {
        let mut headers = hyper::HeaderMap::new();
        headers.insert("content-length", "1025".parse().unwrap());
        let resp = check_body_size(&headers, 1024).expect("should reject");
        assert_eq!(resp.status(), 413);
    }

    #[test]
    fn test_check_body_size_at_limit_passes() {
        let mut headers = hyper::HeaderMap::new();
        headers.insert("content-length", "1024".parse().unwrap());
        assert!(check_body_size(&headers, 1024).is_none());
    }

    #[test]
    fn test_check_body_size_unparseable_passes() {
        let mut headers = hyper::HeaderMap::new();
        headers.insert("content-length", "not-a-number".parse().unwrap());
        // Garbage length is logged but does not block the request
        assert!(check_body_size(&headers, 1024).is_none());
    }

    #[test]
    fn test_check_body_size_missing_header_passes() {
        let headers = hyper::HeaderMap::new();
        assert!(check_body_size(&headers, 1024).is_none());
    }

    #[test]
    fn test_dispatch_is_idempotent() {
        for _ in 0..3 {
            let resp = dispatch(&parts_for("GET", "/snippet?id=2"), &Bytes::new());
            assert_eq!(resp.status(), 200);
        }
    }
}
