//! Output file naming for fetched pages.
//!
//! `<language>.UTF-8#<host>-<YYYYMMDD>-<unix-seconds>.html`

use chrono::{DateTime, Local};
use percent_encoding::percent_decode_str;
use std::path::{Path, PathBuf};

use super::FetchError;

/// Host part of the name: `www.` prefix dropped, port kept when explicit.
pub fn name_host(url: &str) -> Result<String, FetchError> {
    let invalid = |reason: &str| FetchError::InvalidUrl {
        url: url.to_string(),
        reason: reason.to_string(),
    };
    let parsed = url::Url::parse(url).map_err(|e| invalid(&e.to_string()))?;
    if parsed.scheme() != "http" && parsed.scheme() != "https" {
        return Err(invalid("not an http(s) URL"));
    }
    let host = parsed.host_str().ok_or_else(|| invalid("no host"))?;
    let host = host.strip_prefix("www.").unwrap_or(host);
    Ok(match parsed.port() {
        Some(port) => format!("{}:{}", host, port),
        None => host.to_string(),
    })
}

/// Builds the output filename for `url` fetched at `now`.
pub fn output_filename(url: &str, language: &str, now: DateTime<Local>) -> Result<String, FetchError> {
    let host = name_host(url)?;
    Ok(format!(
        "{}.UTF-8#{}-{}-{}.html",
        language,
        host,
        now.format("%Y%m%d"),
        now.timestamp()
    ))
}

/// Percent-decodes the final path component. Invalid UTF-8 sequences are
/// replaced. A decoded name that would leave the directory (contains a path
/// separator or NUL, or is `.`/`..`) is kept encoded.
pub fn decoded_output_path(path: &Path) -> PathBuf {
    let Some(name) = path.file_name() else {
        return path.to_path_buf();
    };
    let name = name.to_string_lossy();
    let decoded = percent_decode_str(&name).decode_utf8_lossy();
    if decoded.contains(['/', '\\', '\0'].as_slice()) || decoded == "." || decoded == ".." {
        tracing::warn!("not decoding output name {}: would escape its directory", name);
        return path.to_path_buf();
    }
    match path.parent() {
        Some(parent) => parent.join(decoded.as_ref()),
        None => PathBuf::from(decoded.as_ref()),
    }
}
