//! Parse HTTP response header lines into the fields the fetcher needs.

/// Status codes treated as a capturable redirect in redirect-only mode.
pub const REDIRECT_CODES: [u32; 5] = [301, 302, 303, 307, 308];

pub fn is_redirect(code: u32) -> bool {
    REDIRECT_CODES.contains(&code)
}

/// Headers of the last response seen on a transfer.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResponseHead {
    /// Status from the last `HTTP/x y` line; 0 if none was seen.
    pub status: u32,
    pub content_type: Option<String>,
    pub location: Option<String>,
}

/// Parse collected header lines. libcurl reports the headers of every hop when
/// following redirects, so a new status line starts a fresh response.
pub(crate) fn parse_headers(lines: &[String]) -> ResponseHead {
    let mut head = ResponseHead::default();

    for line in lines {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        if line.starts_with("HTTP/") {
            head = ResponseHead {
                status: parse_status_line(line).unwrap_or(0),
                ..ResponseHead::default()
            };
            continue;
        }
        if let Some((name, value)) = line.split_once(':') {
            let name = name.trim();
            let value = value.trim();
            if name.eq_ignore_ascii_case("content-type") {
                head.content_type = Some(value.to_string());
            }
            if name.eq_ignore_ascii_case("location") {
                head.location = Some(value.to_string());
            }
        }
    }

    head
}

fn parse_status_line(line: &str) -> Option<u32> {
    line.split_whitespace().nth(1)?.parse().ok()
}
