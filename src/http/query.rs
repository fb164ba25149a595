//! Query-string and form helpers
//!
//! Minimal urlencoded handling: query-parameter lookup for the snippet id,
//! and form-body decode/re-encode for the request dump. Malformed pairs
//! are dropped silently.

/// Look up the first occurrence of a query parameter, percent-decoded.
///
/// Pairs that fail to decode are skipped, so a later valid pair with the
/// same name can still match.
pub fn get_param(query: &str, name: &str) -> Option<String> {
    query.split('&').find_map(|pair| {
        let (key, value) = pair.split_once('=').unwrap_or((pair, ""));
        if decode(key).as_deref() == Some(name) {
            decode(value)
        } else {
            None
        }
    })
}

/// Parse a urlencoded form body into key/value pairs.
///
/// Empty and undecodable pairs are dropped.
pub fn parse_form(body: &str) -> Vec<(String, String)> {
    body.split('&')
        .filter(|pair| !pair.is_empty())
        .filter_map(|pair| {
            let (key, value) = pair.split_once('=').unwrap_or((pair, ""));
            Some((decode(key)?, decode(value)?))
        })
        .collect()
}

/// Re-encode form pairs as a single `key=value&...` line.
///
/// Keys are sorted so the output is deterministic regardless of the
/// order the pairs arrived in.
pub fn encode_form(pairs: &[(String, String)]) -> String {
    let mut sorted: Vec<&(String, String)> = pairs.iter().collect();
    sorted.sort_by(|a, b| a.0.cmp(&b.0));
    sorted
        .iter()
        .map(|(key, value)| format!("{}={}", encode(key), encode(value)))
        .collect::<Vec<String>>()
        .join("&")
}

/// Percent-decode one urlencoded component ('+' means space).
///
/// Returns `None` on truncated or non-hex escapes and on invalid UTF-8.
fn decode(s: &str) -> Option<String> {
    let bytes = s.as_bytes();
    let mut out = Vec::with_capacity(bytes.len());
    let mut i = 0;
    while i < bytes.len() {
        match bytes[i] {
            b'%' => {
                let hi = hex_val(*bytes.get(i + 1)?)?;
                let lo = hex_val(*bytes.get(i + 2)?)?;
                out.push(hi << 4 | lo);
                i += 3;
            }
            b'+' => {
                out.push(b' ');
                i += 1;
            }
            b => {
                out.push(b);
                i += 1;
            }
        }
    }
    String::from_utf8(out).ok()
}

/// Percent-encode one component (space becomes '+').
fn encode(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for &b in s.as_bytes() {
        match b {
            b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' | b'-' | b'_' | b'.' | b'~' => {
                out.push(char::from(b));
            }
            b' ' => out.push('+'),
            _ => out.push_str(&format!("%{b:02X}")),
        }
    }
    out
}

const fn hex_val(b: u8) -> Option<u8> {
    match b {
        b'0'..=b'9' => Some(b - b'0'),
        b'a'..=b'f' => Some(b - b'a' + 10),
        b'A'..=b'F' => Some(b - b'A' + 10),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_get_param_basic() {
        assert_eq!(get_param("id=5", "id"), Some("5".to_string()));
        assert_eq!(get_param("a=1&id=7&b=2", "id"), Some("7".to_string()));
    }

    #[test]
    fn test_get_param_missing() {
        assert_eq!(get_param("a=1&b=2", "id"), None);
        assert_eq!(get_param("", "id"), None);
    }

    #[test]
    fn test_get_param_first_wins() {
        assert_eq!(get_param("id=1&id=2", "id"), Some("1".to_string()));
    }

    #[test]
    fn test_get_param_no_value() {
        assert_eq!(get_param("id", "id"), Some(String::new()));
    }

    #[test]
    fn test_get_param_decodes() {
        assert_eq!(
            get_param("q=hello+world%21", "q"),
            Some("hello world!".to_string())
        );
    }

    #[test]
    fn test_get_param_skips_bad_escape() {
        // Truncated escape in the value drops the pair
        assert_eq!(get_param("id=%2", "id"), None);
        assert_eq!(get_param("id=%zz&id=3", "id"), Some("3".to_string()));
    }

    #[test]
    fn test_parse_form_drops_invalid() {
        let pairs = parse_form("a=1&bad=%&b=2&");
        assert_eq!(
            pairs,
            vec![
                ("a".to_string(), "1".to_string()),
                ("b".to_string(), "2".to_string())
            ]
        );
    }

    #[test]
    fn test_encode_form_sorts_keys() {
        let pairs = vec![
            ("title".to_string(), "O snail".to_string()),
            ("content".to_string(), "Climb Mount Fuji".to_string()),
        ];
        assert_eq!(
            encode_form(&pairs),
            "content=Climb+Mount+Fuji&title=O+snail"
        );
    }

    #[test]
    fn test_encode_form_escapes() {
        let pairs = vec![("k".to_string(), "a&b=c".to_string())];
        assert_eq!(encode_form(&pairs), "k=a%26b%3Dc");
    }

    #[test]
    fn test_decode_encode_unicode() {
        let pairs = parse_form("name=%E5%AF%BF%E5%8F%B8");
        assert_eq!(pairs, vec![("name".to_string(), "寿司".to_string())]);
        assert_eq!(encode_form(&pairs), "name=%E5%AF%BF%E5%8F%B8");
    }
}
