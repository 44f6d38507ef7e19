// ABOUTME: Error types for the extraction engine including the ErrorCode enum and ExtractError struct.
// ABOUTME: Only fetch and document failures are errors; missing fields never surface here.

use std::fmt;

/// Error codes representing the categories of extraction failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCode {
    InvalidUrl,
    Blocked,
    Fetch,
    Status(u16),
    Timeout,
    TooManyRedirects,
    Decode,
    Parse,
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ErrorCode::InvalidUrl => write!(f, "invalid URL"),
            ErrorCode::Blocked => write!(f, "domain not allowed"),
            ErrorCode::Fetch => write!(f, "fetch error"),
            ErrorCode::Status(code) => write!(f, "unexpected status code: {}", code),
            ErrorCode::Timeout => write!(f, "timeout"),
            ErrorCode::TooManyRedirects => write!(f, "too many redirects"),
            ErrorCode::Decode => write!(f, "decode error"),
            ErrorCode::Parse => write!(f, "parse error"),
        }
    }
}

/// The error returned by an extraction call.
#[derive(Debug, thiserror::Error)]
pub struct ExtractError {
    pub code: ErrorCode,
    pub url: String,
    pub op: String,
    #[source]
    pub source: Option<anyhow::Error>,
}

impl fmt::Display for ExtractError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "prodmeta: {} {}: {}", self.op, self.url, self.code)?;
        if let Some(ref src) = self.source {
            write!(f, ": {}", src)?;
        }
        Ok(())
    }
}

impl ExtractError {
    fn new(
        code: ErrorCode,
        url: impl Into<String>,
        op: impl Into<String>,
        source: Option<anyhow::Error>,
    ) -> Self {
        Self {
            code,
            url: url.into(),
            op: op.into(),
            source,
        }
    }

    /// Create an InvalidUrl error.
    pub fn invalid_url(
        url: impl Into<String>,
        op: impl Into<String>,
        source: Option<anyhow::Error>,
    ) -> Self {
        Self::new(ErrorCode::InvalidUrl, url, op, source)
    }

    /// Create a Blocked error for a URL rejected by the domain policy.
    pub fn blocked(url: impl Into<String>, op: impl Into<String>, domain: &str) -> Self {
        Self::new(
            ErrorCode::Blocked,
            url,
            op,
            Some(anyhow::anyhow!("{}", domain)),
        )
    }

    /// Create a Fetch error.
    pub fn fetch(
        url: impl Into<String>,
        op: impl Into<String>,
        source: Option<anyhow::Error>,
    ) -> Self {
        Self::new(ErrorCode::Fetch, url, op, source)
    }

    /// Create a Status error for a non-200 response.
    pub fn status(url: impl Into<String>, op: impl Into<String>, status: u16) -> Self {
        Self::new(ErrorCode::Status(status), url, op, None)
    }

    /// Create a Timeout error.
    pub fn timeout(
        url: impl Into<String>,
        op: impl Into<String>,
        source: Option<anyhow::Error>,
    ) -> Self {
        Self::new(ErrorCode::Timeout, url, op, source)
    }

    /// Create a TooManyRedirects error.
    pub fn too_many_redirects(
        url: impl Into<String>,
        op: impl Into<String>,
        source: Option<anyhow::Error>,
    ) -> Self {
        Self::new(ErrorCode::TooManyRedirects, url, op, source)
    }

    /// Create a Decode error (corrupt content-encoding stream).
    pub fn decode(
        url: impl Into<String>,
        op: impl Into<String>,
        source: Option<anyhow::Error>,
    ) -> Self {
        Self::new(ErrorCode::Decode, url, op, source)
    }

    /// Create a Parse error.
    pub fn parse(
        url: impl Into<String>,
        op: impl Into<String>,
        source: Option<anyhow::Error>,
    ) -> Self {
        Self::new(ErrorCode::Parse, url, op, source)
    }

    /// Classify a transport error from reqwest into the matching error code.
    pub fn from_reqwest(url: impl Into<String>, op: impl Into<String>, err: reqwest::Error) -> Self {
        let code = if err.is_timeout() {
            ErrorCode::Timeout
        } else if err.is_redirect() {
            ErrorCode::TooManyRedirects
        } else if err.is_decode() {
            ErrorCode::Decode
        } else {
            ErrorCode::Fetch
        };
        Self::new(code, url, op, Some(anyhow::Error::new(err)))
    }

    /// Returns true for every failure that happened while retrieving the page.
    pub fn is_fetch_failure(&self) -> bool {
        matches!(
            self.code,
            ErrorCode::Fetch
                | ErrorCode::Status(_)
                | ErrorCode::Timeout
                | ErrorCode::TooManyRedirects
                | ErrorCode::Decode
        )
    }

    /// Returns true if this is a Timeout error.
    pub fn is_timeout(&self) -> bool {
        self.code == ErrorCode::Timeout
    }

    /// Returns true if this is a TooManyRedirects error.
    pub fn is_too_many_redirects(&self) -> bool {
        self.code == ErrorCode::TooManyRedirects
    }

    /// Returns true if this is a Status error.
    pub fn is_status(&self) -> bool {
        matches!(self.code, ErrorCode::Status(_))
    }

    /// Returns the HTTP status carried by a Status error.
    pub fn status_code(&self) -> Option<u16> {
        match self.code {
            ErrorCode::Status(code) => Some(code),
            _ => None,
        }
    }

    /// Returns true if this is a Decode error.
    pub fn is_decode(&self) -> bool {
        self.code == ErrorCode::Decode
    }

    /// Returns true if this is a Parse error.
    pub fn is_parse(&self) -> bool {
        self.code == ErrorCode::Parse
    }

    /// Returns true if this is an InvalidUrl error.
    pub fn is_invalid_url(&self) -> bool {
        self.code == ErrorCode::InvalidUrl
    }

    /// Returns true if this is a Blocked error.
    pub fn is_blocked(&self) -> bool {
        self.code == ErrorCode::Blocked
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_includes_op_url_and_code() {
        let err = ExtractError::status("https://shop.test/p/1", "Fetch", 404);
        assert_eq!(
            err.to_string(),
            "prodmeta: Fetch https://shop.test/p/1: unexpected status code: 404"
        );
    }

    #[test]
    fn display_appends_source() {
        let err = ExtractError::blocked("https://bad.test/x", "Extract", "bad.test");
        assert_eq!(
            err.to_string(),
            "prodmeta: Extract https://bad.test/x: domain not allowed: bad.test"
        );
    }

    #[test]
    fn fetch_failure_classification() {
        assert!(ExtractError::status("u", "Fetch", 500).is_fetch_failure());
        assert!(ExtractError::timeout("u", "Fetch", None).is_fetch_failure());
        assert!(ExtractError::too_many_redirects("u", "Fetch", None).is_fetch_failure());
        assert!(ExtractError::decode("u", "Fetch", None).is_fetch_failure());
        assert!(!ExtractError::parse("u", "Parse", None).is_fetch_failure());
        assert!(!ExtractError::invalid_url("u", "Extract", None).is_fetch_failure());
        assert!(!ExtractError::blocked("u", "Extract", "d").is_fetch_failure());
    }

    #[test]
    fn status_code_accessor() {
        assert_eq!(ExtractError::status("u", "Fetch", 503).status_code(), Some(503));
        assert_eq!(ExtractError::timeout("u", "Fetch", None).status_code(), None);
    }
}
