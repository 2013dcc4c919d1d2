//! Validation helpers shared by the web handlers.

use url::Url;

/// True when the string parses as an absolute http(s) URL.
pub fn is_valid_http_url(input: &str) -> bool {
    match Url::parse(input) {
        Ok(parsed) => matches!(parsed.scheme(), "http" | "https"),
        Err(_) => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accepts_http_and_https() {
        assert!(is_valid_http_url("https://example.com/a?b=c"));
        assert!(is_valid_http_url("http://blog.example.com/post/1"));
    }

    #[test]
    fn test_rejects_other_schemes_and_garbage() {
        assert!(!is_valid_http_url("ftp://example.com"));
        assert!(!is_valid_http_url("javascript:alert(1)"));
        assert!(!is_valid_http_url("not a url"));
        assert!(!is_valid_http_url("//missing-scheme.com"));
    }
}
