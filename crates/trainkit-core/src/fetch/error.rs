//! Per-URL fetch failure. The batch driver logs these and moves on.

use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum FetchError {
    /// URL could not be parsed or has no usable host.
    #[error("skipping URI {url}: {reason}")]
    InvalidUrl { url: String, reason: String },

    /// libcurl failed before a response was available (DNS, connect, TLS, ...).
    #[error("skipping URI {url}: {source}")]
    Transport {
        url: String,
        #[source]
        source: curl::Error,
    },

    /// Server answered with a 4xx/5xx status.
    #[error("the server couldn't fulfill the request for {url}: HTTP {code}")]
    Http { url: String, code: u32 },

    /// The page declared a charset that has no known decoder.
    #[error("{url}: unknown charset {label:?}")]
    UnknownCharset { url: String, label: String },

    /// The body is not valid in the charset the page declared.
    #[error("{url}: body is not valid {encoding}")]
    Decode { url: String, encoding: &'static str },

    /// Writing the decoded page failed.
    #[error("{url}: write {}: {source}", .path.display())]
    Io {
        url: String,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl FetchError {
    pub fn url(&self) -> &str {
        match self {
            FetchError::InvalidUrl { url, .. }
            | FetchError::Transport { url, .. }
            | FetchError::Http { url, .. }
            | FetchError::UnknownCharset { url, .. }
            | FetchError::Decode { url, .. }
            | FetchError::Io { url, .. } => url,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn http_error_mentions_url_and_code() {
        let e = FetchError::Http {
            url: "http://example.com/x".to_string(),
            code: 404,
        };
        let msg = e.to_string();
        assert!(msg.contains("http://example.com/x"));
        assert!(msg.contains("404"));
        assert_eq!(e.url(), "http://example.com/x");
    }

    #[test]
    fn io_error_shows_path() {
        let e = FetchError::Io {
            url: "http://example.com/".to_string(),
            path: PathBuf::from("/nope/out.html"),
            source: std::io::Error::new(std::io::ErrorKind::NotFound, "missing"),
        };
        assert!(e.to_string().contains("/nope/out.html"));
        assert!(std::error::Error::source(&e).is_some());
    }
}
