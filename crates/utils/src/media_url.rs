//! Acceptability check for user-supplied image references.

use url::Url;

/// Returns true when `value` is a site-relative path, a `data:` URL, or an
/// absolute http(s) URL with a host.
pub fn is_acceptable(value: &str) -> bool {
    let value = value.trim();
    if value.is_empty() {
        return false;
    }

    if value.starts_with('/') {
        // "//host/x" is scheme-relative and points off-site.
        return !value.starts_with("//");
    }

    if value.starts_with("data:") {
        return value.contains(',');
    }

    match Url::parse(value) {
        Ok(url) => matches!(url.scheme(), "http" | "https") && url.host_str().is_some(),
        Err(_) => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accepts_relative_and_data_urls() {
        assert!(is_acceptable("/uploads/x.png"));
        assert!(is_acceptable("data:image/png;base64,AAAA"));
    }

    #[test]
    fn test_accepts_http_urls() {
        assert!(is_acceptable("https://cdn.example.com/a.jpg"));
        assert!(is_acceptable("http://example.com/a.jpg?size=2"));
    }

    #[test]
    fn test_rejects_other_schemes_and_garbage() {
        assert!(!is_acceptable("javascript:alert(1)"));
        assert!(!is_acceptable("ftp://example.com/a.jpg"));
        assert!(!is_acceptable("http://"));
        assert!(!is_acceptable("not a url"));
        assert!(!is_acceptable("//evil.example.com/a.png"));
        assert!(!is_acceptable("data:nothing"));
    }
}
