//! Turning raw href strings into canonical absolute URLs.
//!
//! Resolution happens in two steps. [`normalize_link`] classifies the raw
//! reference (absolute, root-relative or sibling) and joins it against the
//! right context, then [`canonicalize`] rewrites the path lexically so that
//! two spellings of the same page compare equal as strings.

use tracing::debug;
use url::Url;

const ABSOLUTE_SCHEMES: [&str; 2] = ["http:", "https:"];

/// Everything before the first `#`.
pub fn strip_fragment(raw: &str) -> &str {
    raw.split_once('#').map_or(raw, |(head, _)| head)
}

fn has_absolute_scheme(link: &str) -> bool {
    ABSOLUTE_SCHEMES.iter().any(|scheme| {
        link.get(..scheme.len())
            .is_some_and(|prefix| prefix.eq_ignore_ascii_case(scheme))
    })
}

/// Produce an absolute, fragment-free URL string for `raw_link` found on
/// `current_url`.
///
/// - `http:`/`https:` links are taken as they are.
/// - Links starting with `/` are resolved against the origin of `base_url`,
///   never against the current page.
/// - Anything else is a sibling of `current_url`.
///
/// Never fails. A link that cannot be joined comes back as the
/// fragment-stripped input and will not match the crawl scope later.
pub fn normalize_link(base_url: &Url, current_url: &Url, raw_link: &str) -> String {
    let link = strip_fragment(raw_link);

    if has_absolute_scheme(link) {
        return link.to_string();
    }

    let context = if link.starts_with('/') {
        base_url
    } else {
        current_url
    };

    match context.join(link) {
        Ok(joined) => joined.to_string(),
        Err(e) => {
            debug!("Could not join {:?} onto {}: {}", link, context, e);
            link.to_string()
        }
    }
}

/// Collapse `.`, `..` and repeated separators in an absolute path.
///
/// `..` at the root is dropped, so the result never climbs above `/`.
/// A trailing separator survives when there is something left to trail, so
/// `/docs` and `/docs/` stay two distinct pages.
pub fn canonicalize_path(path: &str) -> String {
    let mut segments: Vec<&str> = Vec::new();
    for segment in path.split('/') {
        match segment {
            "" | "." => {}
            ".." => {
                segments.pop();
            }
            other => segments.push(other),
        }
    }

    let mut canonical = String::with_capacity(path.len().max(1));
    for segment in &segments {
        canonical.push('/');
        canonical.push_str(segment);
    }
    if canonical.is_empty() {
        canonical.push('/');
    } else if path.ends_with('/') {
        canonical.push('/');
    }
    canonical
}

/// Rewrite only the path of `url` with [`canonicalize_path`].
///
/// Unparseable strings and URLs without a hierarchical path (`mailto:` and
/// friends) are returned unchanged.
pub fn canonicalize(url: &str) -> String {
    let Ok(mut parsed) = Url::parse(url) else {
        return url.to_string();
    };
    if parsed.cannot_be_a_base() {
        return url.to_string();
    }

    let path = canonicalize_path(parsed.path());
    parsed.set_path(&path);
    parsed.to_string()
}

/// [`normalize_link`] followed by [`canonicalize`].
pub fn resolve_link(base_url: &Url, current_url: &Url, raw_link: &str) -> String {
    canonicalize(&normalize_link(base_url, current_url, raw_link))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn url(s: &str) -> Url {
        Url::parse(s).unwrap()
    }

    #[test]
    fn test_dot_segments_collapse() {
        assert_eq!(
            canonicalize("https://base.com/pages/2/../../other_pages/1"),
            "https://base.com/other_pages/1"
        );
    }

    #[test]
    fn test_dot_segments_never_climb_above_root() {
        assert_eq!(canonicalize("https://base.com/a/../../../b"), "https://base.com/b");
        assert_eq!(canonicalize_path("/../../x"), "/x");
        assert_eq!(canonicalize_path("/.."), "/");
    }

    #[test]
    fn test_canonicalize_path_rules() {
        assert_eq!(canonicalize_path(""), "/");
        assert_eq!(canonicalize_path("/"), "/");
        assert_eq!(canonicalize_path("/a/./b/../c"), "/a/c");
        assert_eq!(canonicalize_path("//a///b//"), "/a/b/");
        assert_eq!(canonicalize_path("/dir/"), "/dir/");
    }

    #[test]
    fn test_trailing_slash_is_a_distinct_page() {
        assert_eq!(canonicalize("https://base.com/docs/"), "https://base.com/docs/");
        assert_eq!(canonicalize("https://base.com/docs"), "https://base.com/docs");
        assert_ne!(
            canonicalize("https://base.com/docs"),
            canonicalize("https://base.com/docs/")
        );
        assert_eq!(canonicalize("https://base.com/docs/./"), "https://base.com/docs/");
    }

    #[test]
    fn test_repeated_separators_collapse() {
        assert_eq!(canonicalize("https://base.com//a///b/"), "https://base.com/a/b/");
    }

    #[test]
    fn test_query_is_untouched() {
        assert_eq!(
            canonicalize("https://base.com/a/./b?next=../up//twice"),
            "https://base.com/a/b?next=../up//twice"
        );
    }

    #[test]
    fn test_root_relative_uses_base_domain() {
        let base = url("https://base.com/");
        for current in ["https://base.com/", "https://base.com/deep/er/page.html"] {
            assert_eq!(
                resolve_link(&base, &url(current), "/page"),
                "https://base.com/page"
            );
        }
    }

    #[test]
    fn test_root_relative_ignores_base_path() {
        let base = url("https://www.spacejam.com/1996/");
        let current = url("https://www.spacejam.com/1996/jam.html");
        assert_eq!(
            resolve_link(&base, &current, "/cmp/index.html"),
            "https://www.spacejam.com/cmp/index.html"
        );
    }

    #[test]
    fn test_sibling_resolution() {
        let base = url("https://base.com/");
        let current = url("https://base.com/page/1");
        assert_eq!(resolve_link(&base, &current, "2"), "https://base.com/page/2");
        assert_eq!(
            resolve_link(&base, &current, "../other/3"),
            "https://base.com/other/3"
        );
    }

    #[test]
    fn test_fragment_is_stripped() {
        let base = url("https://base.com/");
        let current = url("https://base.com/docs/");
        assert_eq!(
            resolve_link(&base, &current, "page.html#section"),
            resolve_link(&base, &current, "page.html")
        );
        assert_eq!(strip_fragment("a#b#c"), "a");
        assert_eq!(strip_fragment("#top"), "");
    }

    #[test]
    fn test_bare_fragment_resolves_to_current_page() {
        let base = url("https://base.com/");
        let current = url("https://base.com/docs/intro.html");
        assert_eq!(
            resolve_link(&base, &current, "#top"),
            "https://base.com/docs/intro.html"
        );
    }

    #[test]
    fn test_absolute_links_are_kept() {
        let base = url("https://base.com/");
        let current = url("https://base.com/a/b");
        assert_eq!(
            resolve_link(&base, &current, "https://other.com/"),
            "https://other.com/"
        );
        assert_eq!(
            resolve_link(&base, &current, "HTTP://Other.com/x//y/../z"),
            "http://other.com/x/z"
        );
    }

    #[test]
    fn test_protocol_relative_lands_on_its_own_host() {
        let base = url("https://base.com/");
        let current = url("https://base.com/a");
        assert_eq!(
            resolve_link(&base, &current, "//cdn.example.com/lib.js"),
            "https://cdn.example.com/lib.js"
        );
    }

    #[test]
    fn test_non_hierarchical_links_pass_through() {
        let base = url("https://base.com/");
        let current = url("https://base.com/contact");
        assert_eq!(
            resolve_link(&base, &current, "mailto:someone@base.com"),
            "mailto:someone@base.com"
        );
    }

    #[test]
    fn test_malformed_link_is_returned_as_written() {
        let base = url("https://base.com/");
        let current = url("https://base.com/");
        assert_eq!(resolve_link(&base, &current, "http://[::1"), "http://[::1");
    }

    #[test]
    fn test_canonicalize_is_idempotent() {
        let samples = [
            "https://base.com/",
            "https://base.com/pages/2/../../other_pages/1",
            "https://base.com//a/./b/",
            "https://base.com:8443/x/../y?q=1",
            "mailto:someone@base.com",
            "not a url",
        ];
        for sample in samples {
            let once = canonicalize(sample);
            assert_eq!(canonicalize(&once), once, "not idempotent for {}", sample);
        }
    }
}
