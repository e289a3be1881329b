use crate::error::{Result, ScanError};
use crate::filter::{in_scope, is_crawlable};
use crate::resolve::{canonicalize_path, resolve_link};
use crate::result::{CrawlResult, LinkKind, LinkRecord, PageRecord, PageStatus};
use crate::source::{FetchOutcome, LinkSource};
use std::sync::Arc;
use std::vec;
use tracing::{debug, info, warn};
use url::Url;

/// Called once per visited page with the number of pages visited so far.
pub type ProgressCallback = Arc<dyn Fn(usize, String) + Send + Sync>;

/// Depth-first walk of every page reachable from a seed inside its origin.
pub struct Crawler<S> {
    source: S,
    max_pages: Option<usize>,
    progress_callback: Option<ProgressCallback>,
}

impl<S: LinkSource> Crawler<S> {
    pub fn new(source: S) -> Self {
        Self {
            source,
            max_pages: None,
            progress_callback: None,
        }
    }

    pub fn with_max_pages(mut self, max_pages: usize) -> Self {
        self.max_pages = Some(max_pages);
        self
    }

    pub fn with_progress_callback(mut self, callback: ProgressCallback) -> Self {
        self.progress_callback = Some(callback);
        self
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    /// Crawl everything reachable from `base_url`.
    ///
    /// Fails only when the seed itself is not a usable http(s) URL. Pages
    /// that cannot be fetched are recorded as [`PageStatus::FetchFailed`]
    /// and the walk carries on.
    pub async fn crawl(&self, base_url: &str) -> Result<CrawlResult> {
        let base = parse_seed(base_url)?;
        info!("Starting crawl of {}", base);

        let mut traversal = Traversal::new(base);
        traversal.run(self).await;
        let result = traversal.into_result();

        info!(
            "Crawl complete. Visited {} pages, saw {} links, {} fetches failed",
            result.visited_count(),
            result.seen_count(),
            result.failed_count()
        );
        Ok(result)
    }
}

fn parse_seed(base_url: &str) -> Result<Url> {
    let mut base = Url::parse(base_url)
        .map_err(|e| ScanError::InvalidUrl(format!("{}: {}", base_url, e)))?;

    if base.cannot_be_a_base() || !base.origin().is_tuple() {
        return Err(ScanError::InvalidUrl(format!("{}: not a crawlable origin", base_url)));
    }

    let path = canonicalize_path(base.path());
    base.set_path(&path);
    base.set_fragment(None);
    Ok(base)
}

/// A page whose links are still being worked through.
struct Frame {
    url: Url,
    links: vec::IntoIter<String>,
}

/// State of a single crawl run.
///
/// The frame stack stands in for call-stack recursion: the top frame is the
/// page currently being processed and a followed link pushes a new frame
/// before the next sibling is looked at, which gives the same order as a
/// recursive descent.
struct Traversal {
    base: Url,
    result: CrawlResult,
    stack: Vec<Frame>,
}

impl Traversal {
    fn new(base: Url) -> Self {
        let result = CrawlResult::new(base.to_string());
        Self {
            base,
            result,
            stack: Vec::new(),
        }
    }

    async fn run<S: LinkSource>(&mut self, crawler: &Crawler<S>) {
        self.visit(self.base.clone(), crawler).await;

        while let Some(frame) = self.stack.last_mut() {
            let Some(raw_link) = frame.links.next() else {
                self.stack.pop();
                continue;
            };

            let canonical = resolve_link(&self.base, &frame.url, &raw_link);
            let mut kind = if !in_scope(&canonical, &self.base) {
                LinkKind::OutOfScope
            } else if is_crawlable(&canonical, &self.result.seen) {
                LinkKind::Followed
            } else {
                LinkKind::NotCrawlable
            };

            // Only frames are pushed by a visit, so recording the link
            // afterwards leaves the walk order untouched.
            if kind == LinkKind::Followed {
                let visited = match Url::parse(&canonical) {
                    Ok(next) => self.visit(next, crawler).await,
                    Err(_) => false,
                };
                if !visited {
                    kind = LinkKind::Skipped;
                }
            }

            if self.result.seen.insert(canonical.clone()) {
                debug!("Found link: {} -> {} ({:?})", raw_link, canonical, kind);
                self.result.links.push(LinkRecord {
                    url: canonical,
                    kind,
                });
            }
        }
    }

    /// Returns `false` when the page was already visited or the page limit
    /// has been reached.
    async fn visit<S: LinkSource>(&mut self, url: Url, crawler: &Crawler<S>) -> bool {
        let key = url.to_string();
        if self.result.visited.contains(&key) {
            return false;
        }
        if let Some(max_pages) = crawler.max_pages
            && self.result.visited.len() >= max_pages
        {
            debug!("Page limit {} reached, not visiting {}", max_pages, key);
            return false;
        }

        self.result.visited.insert(key.clone());
        if let Some(ref callback) = crawler.progress_callback {
            callback(self.result.visited.len(), key.clone());
        }

        debug!("Visiting {}", key);
        let links = match crawler.source.fetch_links(&url).await {
            FetchOutcome::Links(links) => {
                self.result.pages.push(PageRecord {
                    url: key,
                    status: PageStatus::Fetched {
                        links_found: links.len(),
                    },
                });
                links
            }
            FetchOutcome::Failed(reason) => {
                warn!("Crawl error for {}: {}", key, reason);
                self.result.pages.push(PageRecord {
                    url: key,
                    status: PageStatus::FetchFailed { reason },
                });
                Vec::new()
            }
        };

        self.stack.push(Frame {
            url,
            links: links.into_iter(),
        });
        true
    }

    fn into_result(self) -> CrawlResult {
        self.result
    }
}
