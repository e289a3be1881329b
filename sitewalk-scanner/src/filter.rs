use std::collections::HashSet;
use url::Url;

/// True when `url` has the same scheme, host and port as `base_url`.
///
/// Unparseable strings and opaque-origin URLs are never in scope.
pub fn in_scope(url: &str, base_url: &Url) -> bool {
    let Ok(parsed) = Url::parse(url) else {
        return false;
    };
    let origin = parsed.origin();
    origin.is_tuple() && origin == base_url.origin()
}

/// Page-like paths: ending in `.html`, or a final segment without any `.`.
///
/// Only the last segment is inspected, so `/v1.2/page` qualifies and
/// `/page.v2` does not.
pub fn has_page_extension(path: &str) -> bool {
    if path.ends_with(".html") {
        return true;
    }
    let last_segment = path.rsplit('/').next().unwrap_or(path);
    !last_segment.contains('.')
}

/// Whether an in-scope canonical URL should be descended into.
pub fn is_crawlable(url: &str, seen: &HashSet<String>) -> bool {
    if seen.contains(url) {
        return false;
    }
    match Url::parse(url) {
        Ok(parsed) => has_page_extension(parsed.path()),
        Err(_) => false,
    }
}
