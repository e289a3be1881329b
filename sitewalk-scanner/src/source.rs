use std::future::Future;
use url::Url;

/// What a [`LinkSource`] produced for one page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchOutcome {
    /// Raw `href` values in document order, unresolved and not deduplicated.
    Links(Vec<String>),
    /// Every attempt failed. Carries the last failure.
    Failed(String),
}

/// Supplies the raw links of a page to the traversal engine.
///
/// Retries, timeouts and transport concerns belong to the implementation;
/// the engine calls `fetch_links` at most once per canonical URL.
pub trait LinkSource {
    fn fetch_links(&self, url: &Url) -> impl Future<Output = FetchOutcome> + Send;
}
