//! Destination URL validation.
//!
//! The destination is stored exactly as submitted; it is only checked here, never
//! rewritten, so a redirect always returns the original string.

use url::Url;

/// Longest destination accepted, in bytes.
pub const MAX_URL_LENGTH: usize = 2048;

/// Reasons a destination URL is rejected.
#[derive(Debug, thiserror::Error)]
pub enum UrlValidationError {
    #[error("Invalid URL format: {0}")]
    InvalidFormat(String),

    #[error("Only HTTP and HTTPS protocols are allowed")]
    UnsupportedProtocol,

    #[error("URL has no host")]
    MissingHost,

    #[error("URL is longer than {MAX_URL_LENGTH} characters")]
    TooLong,
}

/// Checks that `input` is a syntactically valid `http` or `https` URL with a host.
///
/// # Errors
///
/// Returns [`UrlValidationError::InvalidFormat`] for malformed input,
/// [`UrlValidationError::UnsupportedProtocol`] for other schemes such as
/// `javascript:` or `ftp:`, and [`UrlValidationError::MissingHost`] when the
/// authority is empty. Inputs over [`MAX_URL_LENGTH`] bytes fail with
/// [`UrlValidationError::TooLong`].
///
/// # Examples
///
/// ```
/// use snaplink::utils::url_validator::validate_url;
///
/// assert!(validate_url("https://example.com/path?q=1").is_ok());
/// assert!(validate_url("not-a-url").is_err());
/// assert!(validate_url("ftp://example.com").is_err());
/// ```
pub fn validate_url(input: &str) -> Result<(), UrlValidationError> {
    if input.len() > MAX_URL_LENGTH {
        return Err(UrlValidationError::TooLong);
    }

    let url = Url::parse(input).map_err(|e| UrlValidationError::InvalidFormat(e.to_string()))?;

    match url.scheme() {
        "http" | "https" => {}
        _ => return Err(UrlValidationError::UnsupportedProtocol),
    }

    match url.host_str() {
        Some(host) if !host.is_empty() => Ok(()),
        _ => Err(UrlValidationError::MissingHost),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_simple_http_and_https() {
        assert!(validate_url("http://example.com").is_ok());
        assert!(validate_url("https://example.com").is_ok());
    }

    #[test]
    fn test_with_port_path_query_fragment() {
        assert!(validate_url("https://example.com:8443/a/b?x=1&y=2#frag").is_ok());
    }

    #[test]
    fn test_ip_and_localhost() {
        assert!(validate_url("http://192.168.1.1:8080/api").is_ok());
        assert!(validate_url("http://localhost:3000/test").is_ok());
    }

    #[test]
    fn test_not_a_url() {
        assert!(matches!(
            validate_url("not-a-url"),
            Err(UrlValidationError::InvalidFormat(_))
        ));
    }

    #[test]
    fn test_empty_string() {
        assert!(matches!(
            validate_url(""),
            Err(UrlValidationError::InvalidFormat(_))
        ));
    }

    #[test]
    fn test_missing_scheme() {
        assert!(matches!(
            validate_url("example.com"),
            Err(UrlValidationError::InvalidFormat(_))
        ));
    }

    #[test]
    fn test_dangerous_protocols() {
        for input in [
            "javascript:alert('xss')",
            "data:text/plain,Hello",
            "mailto:test@example.com",
            "file:///etc/passwd",
            "ftp://example.com/file.txt",
        ] {
            assert!(
                matches!(
                    validate_url(input),
                    Err(UrlValidationError::UnsupportedProtocol)
                ),
                "{input} should be rejected"
            );
        }
    }

    #[test]
    fn test_unicode_domain() {
        assert!(validate_url("https://münchen.de").is_ok());
    }

    #[test]
    fn test_length_limit() {
        let base = "https://example.com/";
        let fits = format!("{base}{}", "a".repeat(MAX_URL_LENGTH - base.len()));
        let over = format!("{fits}a");

        assert!(validate_url(&fits).is_ok());
        assert!(matches!(validate_url(&over), Err(UrlValidationError::TooLong)));
    }
}
