//! `Link` response header parsing for cursor-style pagination.
//!
//! GitHub Link headers look like:
//! `<https://api.github.com/search/issues?q=...&page=2>; rel="next", <...&page=5>; rel="last"`

use reqwest::header::{HeaderMap, LINK};

const NEXT_MARKER: &str = "rel=\"next\"";

/// Return the URL of the `rel="next"` segment, if any.
///
/// Never fails: empty or malformed input yields `None`, which callers treat
/// as the end of pagination. The marker match is case-sensitive.
pub fn next_link(link_header: &str) -> Option<String> {
    link_header.split(',').find_map(|part| {
        let (target, params) = part.split_once(';')?;
        if !params.split(';').any(|p| p.trim() == NEXT_MARKER) {
            return None;
        }
        let url = target.trim().strip_prefix('<')?.strip_suffix('>')?;
        (!url.is_empty()).then(|| url.to_string())
    })
}

/// Read the `Link` header from a response and extract the next page URL.
pub fn next_link_from(headers: &HeaderMap) -> Option<String> {
    headers
        .get(LINK)
        .and_then(|v| v.to_str().ok())
        .and_then(next_link)
}
