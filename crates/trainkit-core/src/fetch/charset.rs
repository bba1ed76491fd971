//! Charset detection and decoding of fetched bodies.
//!
//! Order: `<meta ... charset="X"` in the body, then the `Content-Type`
//! charset parameter, then ISO-8859-1. Latin-1 and ASCII labels are handled
//! here so they keep their literal meaning (every byte is its own code point;
//! only 7-bit bytes are valid). Other labels are resolved with the WHATWG
//! label table (`encoding_rs`).

use encoding_rs::Encoding;
use regex::bytes::Regex;
use std::sync::OnceLock;

use super::FetchError;

/// Where the charset used for decoding came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CharsetSource {
    Meta,
    Header,
    Fallback,
}

#[derive(Debug, Clone)]
pub struct DecodedPage {
    pub text: String,
    /// Canonical name of the encoding used (e.g. "UTF-8", "ISO-8859-1", "KOI8-R").
    pub charset: String,
    pub source: CharsetSource,
}

const LATIN1_LABELS: &[&str] = &[
    "iso-8859-1",
    "iso8859-1",
    "iso_8859-1",
    "iso_8859-1:1987",
    "8859",
    "latin1",
    "latin-1",
    "latin_1",
    "latin",
    "l1",
    "cp819",
    "ibm819",
    "iso-ir-100",
    "csisolatin1",
];

const ASCII_LABELS: &[&str] = &[
    "us-ascii",
    "ascii",
    "us",
    "646",
    "iso646-us",
    "ansi_x3.4-1968",
    "cp367",
    "ibm367",
    "csascii",
];

/// A resolved charset label.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Charset {
    Latin1,
    Ascii,
    Whatwg(&'static Encoding),
}

impl Charset {
    fn for_label(label: &str) -> Option<Self> {
        let label = label.trim().to_ascii_lowercase();
        if LATIN1_LABELS.contains(&label.as_str()) {
            return Some(Charset::Latin1);
        }
        if ASCII_LABELS.contains(&label.as_str()) {
            return Some(Charset::Ascii);
        }
        Encoding::for_label(label.as_bytes()).map(Charset::Whatwg)
    }

    fn name(self) -> &'static str {
        match self {
            Charset::Latin1 => "ISO-8859-1",
            Charset::Ascii => "US-ASCII",
            Charset::Whatwg(encoding) => encoding.name(),
        }
    }

    /// `None` when `body` is not valid in this charset.
    fn decode(self, body: &[u8]) -> Option<String> {
        match self {
            Charset::Latin1 => Some(decode_latin1(body)),
            Charset::Ascii => {
                if body.is_ascii() {
                    String::from_utf8(body.to_vec()).ok()
                } else {
                    None
                }
            }
            Charset::Whatwg(encoding) => encoding
                .decode_without_bom_handling_and_without_replacement(body)
                .map(|text| text.into_owned()),
        }
    }
}

fn meta_charset_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r#"(?is)<meta [^>]*?charset="?([^">]*?)""#).expect("static regex")
    })
}

/// Charset declared by the first `<meta ...charset=...">` tag, if non-empty.
pub fn sniff_meta_charset(body: &[u8]) -> Option<String> {
    let caps = meta_charset_re().captures(body)?;
    let label = caps.get(1)?.as_bytes();
    let label = String::from_utf8_lossy(label).trim().to_string();
    if label.is_empty() {
        None
    } else {
        Some(label)
    }
}

/// `charset` parameter of a `Content-Type` value. The last occurrence wins.
pub fn content_type_charset(content_type: &str) -> Option<String> {
    let lower = content_type.to_ascii_lowercase();
    let start = lower.rfind("charset=")? + "charset=".len();
    let value = content_type[start..].split(';').next()?;
    let value = value.trim().trim_matches(|c| c == '"' || c == '\'').trim();
    if value.is_empty() {
        None
    } else {
        Some(value.to_string())
    }
}

/// ISO-8859-1: every byte maps to the code point of the same value.
pub fn decode_latin1(body: &[u8]) -> String {
    body.iter().map(|&b| char::from(b)).collect()
}

/// Decode `body` using the first charset source that works.
///
/// A charset declared in the body is authoritative: an unknown label or bytes
/// that are invalid in it fail the page. A header charset that is unknown or
/// does not decode falls through to ISO-8859-1.
pub fn decode_body(
    url: &str,
    body: &[u8],
    content_type: Option<&str>,
) -> Result<DecodedPage, FetchError> {
    if let Some(label) = sniff_meta_charset(body) {
        let charset = Charset::for_label(&label).ok_or_else(|| FetchError::UnknownCharset {
            url: url.to_string(),
            label: label.clone(),
        })?;
        let text = charset.decode(body).ok_or_else(|| FetchError::Decode {
            url: url.to_string(),
            encoding: charset.name(),
        })?;
        return Ok(DecodedPage {
            text,
            charset: charset.name().to_string(),
            source: CharsetSource::Meta,
        });
    }

    if let Some(label) = content_type.and_then(content_type_charset) {
        match Charset::for_label(&label) {
            Some(charset) => {
                if let Some(text) = charset.decode(body) {
                    return Ok(DecodedPage {
                        text,
                        charset: charset.name().to_string(),
                        source: CharsetSource::Header,
                    });
                }
                tracing::debug!(
                    "{}: body is not valid {}, using {}",
                    url,
                    charset.name(),
                    Charset::Latin1.name()
                );
            }
            None => tracing::debug!("{}: unknown header charset {:?}", url, label),
        }
    }

    Ok(DecodedPage {
        text: decode_latin1(body),
        charset: Charset::Latin1.name().to_string(),
        source: CharsetSource::Fallback,
    })
}
