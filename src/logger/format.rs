//! Access log and request dump formatting
//!
//! Supports the `common` (CLF) and `combined` (Apache/Nginx) access log
//! formats, plus a human-readable dump of a full request used as a
//! diagnostic aid by the snippet handler.

use chrono::Local;
use hyper::body::Bytes;
use hyper::http::request::Parts;
use hyper::{header, Method, Version};

use crate::http::query;

/// Access log entry containing all request/response information
#[derive(Debug, Clone)]
pub struct AccessLogEntry {
    /// Client IP address
    pub remote_addr: String,
    /// Request timestamp
    pub time: chrono::DateTime<Local>,
    /// HTTP method (GET, POST, etc.)
    pub method: String,
    /// Request URI path
    pub path: String,
    /// Query string (without leading ?)
    pub query: Option<String>,
    /// HTTP version (1.0, 1.1, 2)
    pub http_version: String,
    /// Response status code
    pub status: u16,
    /// Response body size in bytes
    pub body_bytes: usize,
    /// Referer header
    pub referer: Option<String>,
    /// User-Agent header
    pub user_agent: Option<String>,
}

impl AccessLogEntry {
    /// Build an entry from a request head and the response outcome
    pub fn from_parts(remote_addr: String, parts: &Parts, status: u16, body_bytes: usize) -> Self {
        let header_str = |name: header::HeaderName| {
            parts
                .headers
                .get(name)
                .and_then(|v| v.to_str().ok())
                .map(ToString::to_string)
        };

        Self {
            remote_addr,
            time: Local::now(),
            method: parts.method.to_string(),
            path: parts.uri.path().to_string(),
            query: parts.uri.query().map(ToString::to_string),
            http_version: short_version(parts.version).to_string(),
            status,
            body_bytes,
            referer: header_str(header::REFERER),
            user_agent: header_str(header::USER_AGENT),
        }
    }

    /// Format the log entry according to the configured format name
    pub fn format(&self, format: &str) -> String {
        match format {
            "combined" => self.format_combined(),
            _ => self.format_common(),
        }
    }

    /// Common Log Format (CLF)
    /// `$remote_addr - - [$time_local] "$request" $status $body_bytes_sent`
    fn format_common(&self) -> String {
        format!(
            "{} - - [{}] \"{} {}{} HTTP/{}\" {} {}",
            self.remote_addr,
            self.time.format("%d/%b/%Y:%H:%M:%S %z"),
            self.method,
            self.path,
            self.query
                .as_ref()
                .map(|q| format!("?{q}"))
                .unwrap_or_default(),
            self.http_version,
            self.status,
            self.body_bytes,
        )
    }

    /// Apache/Nginx Combined Log Format (common plus referer and user agent)
    fn format_combined(&self) -> String {
        format!(
            "{} \"{}\" \"{}\"",
            self.format_common(),
            self.referer.as_deref().unwrap_or("-"),
            self.user_agent.as_deref().unwrap_or("-"),
        )
    }
}

/// Whether a format name is one `AccessLogEntry::format` recognizes.
///
/// Unknown names fall back to common format at render time; callers can
/// use this to warn about a misconfigured format once at startup instead
/// of silently logging in the wrong shape.
pub fn is_known_format(format: &str) -> bool {
    matches!(format, "common" | "combined")
}

/// Render a request head and body as human-readable text lines.
///
/// Produces the request line, the host line, each header as
/// `lower-cased-name: value` (one line per value; the host header is
/// promoted to its own line and skipped here), and, for POST requests
/// only, a blank separator line followed by the form body re-encoded
/// as a single `key=value&...` line. Header order follows the header
/// map's iteration order, which is unspecified.
pub fn format_request(parts: &Parts, body: &Bytes) -> String {
    let mut lines: Vec<String> = Vec::new();

    lines.push(format!(
        "{} {} {}",
        parts.method,
        parts.uri,
        request_line_version(parts.version)
    ));

    let host = parts
        .headers
        .get(header::HOST)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("");
    lines.push(format!("Host: {host}"));

    for (name, value) in &parts.headers {
        if name == header::HOST {
            continue;
        }
        lines.push(format!(
            "{}: {}",
            name.as_str(),
            String::from_utf8_lossy(value.as_bytes())
        ));
    }

    if parts.method == Method::POST {
        lines.push(String::new());
        let form = query::parse_form(&String::from_utf8_lossy(body));
        lines.push(query::encode_form(&form));
    }

    lines.join("\n")
}

/// Version rendered as it appears in a request line
const fn request_line_version(version: Version) -> &'static str {
    match version {
        Version::HTTP_10 => "HTTP/1.0",
        Version::HTTP_2 => "HTTP/2.0",
        _ => "HTTP/1.1",
    }
}

/// Version rendered without the HTTP/ prefix, for access log lines
const fn short_version(version: Version) -> &'static str {
    match version {
        Version::HTTP_10 => "1.0",
        Version::HTTP_2 => "2.0",
        _ => "1.1",
    }
}
