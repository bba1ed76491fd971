//! Page fetcher: one GET per URL, charset detection, UTF-8 output files.
//!
//! Uses the curl crate (libcurl). In normal mode libcurl follows redirects
//! itself; in redirect-only mode it does not, and a redirect's `Location` is
//! handed back to the batch driver instead of writing anything.

mod batch;
mod charset;
mod error;
mod headers;
mod naming;

pub use batch::{read_urls_interactive, run_batch, BatchOptions, BatchSummary};
pub use charset::{
    content_type_charset, decode_body, decode_latin1, sniff_meta_charset, CharsetSource,
    DecodedPage,
};
pub use error::FetchError;
pub use headers::{is_redirect, ResponseHead, REDIRECT_CODES};
pub use naming::{decoded_output_path, name_host, output_filename};

use crate::config::FetchSettings;
use std::fs;
use std::path::PathBuf;
use std::str;
use std::time::Duration;

/// One page to fetch.
#[derive(Debug, Clone)]
pub struct FetchRequest {
    pub url: String,
    /// Destination file; its last component is percent-decoded before opening.
    pub output: PathBuf,
    /// Cookies sent as a single `Cookie: a=1; b=2` header.
    pub cookies: Vec<(String, String)>,
    /// Capture a redirect's `Location` instead of writing the page.
    pub redirect_only: bool,
}

/// What a successful fetch produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchOutcome {
    /// Page decoded and written as UTF-8.
    Written { path: PathBuf, charset: String },
    /// Redirect-only mode: the response was a redirect to this location.
    Redirect(String),
    /// Redirect-only mode: the response was not a redirect; nothing written.
    NotRedirected(u32),
}

/// Fetches a single page. The batch driver only depends on this trait.
pub trait PageFetcher {
    fn fetch(&self, request: &FetchRequest) -> Result<FetchOutcome, FetchError>;
}

/// libcurl-backed fetcher.
#[derive(Debug, Clone)]
pub struct CurlFetcher {
    settings: FetchSettings,
}

impl CurlFetcher {
    pub fn new(settings: FetchSettings) -> Self {
        Self { settings }
    }
}

impl PageFetcher for CurlFetcher {
    fn fetch(&self, request: &FetchRequest) -> Result<FetchOutcome, FetchError> {
        fetch_page(request, &self.settings)
    }
}

/// `name=value` pairs joined into one `Cookie` header value.
pub fn cookie_header(cookies: &[(String, String)]) -> Option<String> {
    if cookies.is_empty() {
        return None;
    }
    Some(
        cookies
            .iter()
            .map(|(name, value)| format!("{}={}", name, value))
            .collect::<Vec<_>>()
            .join("; "),
    )
}

/// Resolves a possibly relative `Location` against the request URL.
/// Absolute locations are returned exactly as sent.
fn resolve_location(base: &str, location: &str) -> String {
    if url::Url::parse(location).is_ok() {
        return location.to_string();
    }
    url::Url::parse(base)
        .and_then(|b| b.join(location))
        .map(|u| u.to_string())
        .unwrap_or_else(|_| location.to_string())
}

/// Performs one GET and acts on the response. Runs in the current thread.
pub fn fetch_page(
    request: &FetchRequest,
    settings: &FetchSettings,
) -> Result<FetchOutcome, FetchError> {
    let url = request.url.trim();
    let curl_err = |source: curl::Error| FetchError::Transport {
        url: url.to_string(),
        source,
    };

    let mut body: Vec<u8> = Vec::new();
    let mut header_lines: Vec<String> = Vec::new();

    let mut easy = curl::easy::Easy::new();
    easy.url(url).map_err(curl_err)?;
    easy.useragent(&settings.user_agent).map_err(curl_err)?;
    if request.redirect_only {
        easy.follow_location(false).map_err(curl_err)?;
    } else {
        easy.follow_location(true).map_err(curl_err)?;
        easy.max_redirections(settings.max_redirects)
            .map_err(curl_err)?;
    }
    if let Some(secs) = settings.connect_timeout_secs {
        easy.connect_timeout(Duration::from_secs(secs))
            .map_err(curl_err)?;
    }

    let mut list = curl::easy::List::new();
    list.append(&format!("Accept-Language: {}", settings.accept_language))
        .map_err(curl_err)?;
    list.append(&format!("Accept: {}", settings.accept))
        .map_err(curl_err)?;
    if let Some(cookie) = cookie_header(&request.cookies) {
        list.append(&format!("Cookie: {}", cookie))
            .map_err(curl_err)?;
    }
    easy.http_headers(list).map_err(curl_err)?;

    {
        let mut transfer = easy.transfer();
        transfer
            .header_function(|data| {
                if let Ok(s) = str::from_utf8(data) {
                    header_lines.push(s.trim_end().to_string());
                }
                true
            })
            .map_err(curl_err)?;
        transfer
            .write_function(|data| {
                body.extend_from_slice(data);
                Ok(data.len())
            })
            .map_err(curl_err)?;
        transfer.perform().map_err(curl_err)?;
    }

    let code = easy.response_code().map_err(curl_err)?;
    tracing::debug!("GET {} -> HTTP {} ({} bytes)", url, code, body.len());
    if code >= 400 {
        return Err(FetchError::Http {
            url: url.to_string(),
            code,
        });
    }

    let head = headers::parse_headers(&header_lines);

    if request.redirect_only {
        if is_redirect(code) {
            if let Some(location) = head.location.as_deref() {
                return Ok(FetchOutcome::Redirect(resolve_location(url, location)));
            }
            tracing::warn!("{}: HTTP {} without Location", url, code);
        }
        return Ok(FetchOutcome::NotRedirected(code));
    }

    let page = decode_body(url, &body, head.content_type.as_deref())?;
    let path = decoded_output_path(&request.output);
    fs::write(&path, page.text.as_bytes()).map_err(|source| FetchError::Io {
        url: url.to_string(),
        path: path.clone(),
        source,
    })?;
    tracing::info!("wrote {} ({})", path.display(), page.charset);

    Ok(FetchOutcome::Written {
        path,
        charset: page.charset,
    })
}
