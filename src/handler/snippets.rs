//! Snippet route handlers
//!
//! The three handlers behind the route table: home page, snippet display
//! and snippet creation. All of them produce fixed plain-text bodies;
//! validation happens here, not in the router.

use http_body_util::Full;
use hyper::body::Bytes;
use hyper::http::request::Parts;
use hyper::{Method, Response};

use crate::http;
use crate::logger;

/// Home handler.
///
/// The route table treats "/" as a catch-all, so any unregistered path
/// lands here; respond 404 unless the path is exactly the root.
pub fn home(parts: &Parts) -> Response<Full<Bytes>> {
    if parts.uri.path() != "/" {
        return http::build_404_response();
    }

    http::build_text_response("Hello, World".to_string())
}

/// Show-snippet handler.
///
/// Reads the `id` query parameter as a base-10 integer. A missing or
/// unparseable id, or one below 1, is a 404. On success the full request
/// is dumped to the diagnostic log before the response is written.
pub fn show_snippet(parts: &Parts, body: &Bytes) -> Response<Full<Bytes>> {
    let id = parts
        .uri
        .query()
        .and_then(|q| http::query::get_param(q, "id"))
        .and_then(|v| v.parse::<i64>().ok());

    match id {
        Some(id) if id >= 1 => {
            logger::log_request_dump(&logger::format_request(parts, body));
            http::build_text_response(format!("Displaying snippet with id: {id}"))
        }
        _ => http::build_404_response(),
    }
}

/// Create-snippet handler.
///
/// POST only; any other method gets a 405 advertising the allowed method.
/// Nothing is stored yet, the body is a placeholder.
pub fn create_snippet(parts: &Parts) -> Response<Full<Bytes>> {
    if parts.method != Method::POST {
        logger::log_warning(&format!(
            "Method not allowed on {}: {}",
            parts.uri.path(),
            parts.method
        ));
        return http::build_405_response();
    }

    http::build_text_response("creating a snippet".to_string())
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

    fn body_len(resp: &Response<Full<Bytes>>) -> usize {
        // Full bodies report an exact size
        use hyper::body::Body;
        usize::try_from(resp.body().size_hint().exact().unwrap_or(0)).unwrap_or(0)
    }

    #[test]
    fn test_home_root() {
        let resp = home(&parts_for("GET", "/"));
        assert_eq!(resp.status(), 200);
        assert_eq!(body_len(&resp), "Hello, World".len());
    }

    #[test]
    fn test_home_rejects_other_paths() {
        for path in ["/contact", "/contact/", "/hello.txt"] {
            let resp = home(&parts_for("GET", path));
            assert_eq!(resp.status(), 404, "path {path} should 404");
        }
    }

    #[test]
    fn test_show_snippet_valid_id() {
        let resp = show_snippet(&parts_for("GET", "/snippet?id=5"), &Bytes::new());
        assert_eq!(resp.status(), 200);
        assert_eq!(body_len(&resp), "Displaying snippet with id: 5".len());
    }

    #[test]
    fn test_show_snippet_invalid_ids() {
        for uri in [
            "/snippet?id=0",
            "/snippet?id=-1",
            "/snippet?id=abc",
            "/snippet?id=",
            "/snippet",
        ] {
            let resp = show_snippet(&parts_for("GET", uri), &Bytes::new());
            assert_eq!(resp.status(), 404, "uri {uri} should 404");
        }
    }

    #[test]
    fn test_show_snippet_ignores_other_params() {
        let resp = show_snippet(&parts_for("GET", "/snippet?page=2&id=3"), &Bytes::new());
        assert_eq!(resp.status(), 200);
    }

    #[test]
    fn test_create_snippet_post() {
        let resp = create_snippet(&parts_for("POST", "/snippet/create"));
        assert_eq!(resp.status(), 200);
        assert_eq!(body_len(&resp), "creating a snippet".len());
    }

    #[test]
    fn test_create_snippet_rejects_other_methods() {
        for method in ["GET", "PUT", "DELETE", "PATCH", "HEAD"] {
            let resp = create_snippet(&parts_for(method, "/snippet/create"));
            assert_eq!(resp.status(), 405, "method {method} should 405");
            assert_eq!(resp.headers().get("Allowed").unwrap(), "POST");
        }
    }
}
