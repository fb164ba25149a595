//! HTTP response building module
//!
//! Builders for the fixed response shapes the handlers produce, decoupled
//! from routing and business logic.

use http_body_util::Full;
use hyper::body::Bytes;
use hyper::Response;

/// Build 200 OK plain-text response
pub fn build_text_response(content: String) -> Response<Full<Bytes>> {
    let content_length = content.len();
    Response::builder()
        .status(200)
        .header("Content-Type", "text/plain; charset=utf-8")
        .header("Content-Length", content_length)
        .body(Full::new(Bytes::from(content)))
        .unwrap_or_else(|e| {
            log_build_error("200", &e);
            Response::new(Full::new(Bytes::new()))
        })
}

/// Build 404 Not Found response
pub fn build_404_response() -> Response<Full<Bytes>> {
    Response::builder()
        .status(404)
        .header("Content-Type", "text/plain; charset=utf-8")
        .body(Full::new(Bytes::from("404 page not found")))
        .unwrap_or_else(|e| {
            log_build_error("404", &e);
            Response::new(Full::new(Bytes::from("404 page not found")))
        })
}

/// Build 405 Method Not Allowed response for the create route.
///
/// The advertised-method header is spelled `Allowed`, not the standard
/// `Allow`. Kept as-authored; existing clients key off the non-standard
/// name.
pub fn build_405_response() -> Response<Full<Bytes>> {
    Response::builder()
        .status(405)
        .header("Content-Type", "text/plain; charset=utf-8")
        .header("Allowed", "POST")
        .body(Full::new(Bytes::from(
            "Method Not Allowed. POST requests only",
        )))
        .unwrap_or_else(|e| {
            log_build_error("405", &e);
            Response::new(Full::new(Bytes::from(
                "Method Not Allowed. POST requests only",
            )))
        })
}

/// Build 413 Payload Too Large response
pub fn build_413_response() -> Response<Full<Bytes>> {
    Response::builder()
        .status(413)
        .header("Content-Type", "text/plain; charset=utf-8")
        .body(Full::new(Bytes::from("413 Payload Too Large")))
        .unwrap_or_else(|e| {
            log_build_error("413", &e);
            Response::new(Full::new(Bytes::from("413 Payload Too Large")))
        })
}

/// Log response build error
fn log_build_error(status: &str, error: &hyper::http::Error) {
    crate::logger::log_error(&format!("Failed to build {status} response: {error}"));
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_text_response_sets_length() {
        let resp = build_text_response("Hello, World".to_string());
        assert_eq!(resp.status(), 200);
        assert_eq!(
            resp.headers().get("Content-Length").unwrap(),
            &"Hello, World".len().to_string()
        );
    }

    #[test]
    fn test_404_response() {
        let resp = build_404_response();
        assert_eq!(resp.status(), 404);
    }

    #[test]
    fn test_405_response_advertises_post() {
        let resp = build_405_response();
        assert_eq!(resp.status(), 405);
        assert_eq!(resp.headers().get("Allowed").unwrap(), "POST");
        // Non-standard name is deliberate
        assert!(resp.headers().get("Allow").is_none());
    }
}
