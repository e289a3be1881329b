use serde::{Deserialize, Serialize};
use std::collections::HashSet;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "kebab-case")]
pub enum PageStatus {
    Fetched { links_found: usize },
    FetchFailed { reason: String },
}

/// One visited page, in visit order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PageRecord {
    pub url: String,
    pub status: PageStatus,
}

/// How a link was classified the first time it was seen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum LinkKind {
    Followed,
    OutOfScope,
    NotCrawlable,
    /// In scope and crawlable, but already visited or past the page limit.
    Skipped,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LinkRecord {
    pub url: String,
    pub kind: LinkKind,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CrawlResult {
    pub base_url: String,
    pub visited: HashSet<String>,
    pub seen: HashSet<String>,
    pub pages: Vec<PageRecord>,
    pub links: Vec<LinkRecord>,
}

impl CrawlResult {
    pub fn new(base_url: String) -> Self {
        Self {
            base_url,
            visited: HashSet::new(),
            seen: HashSet::new(),
            pages: Vec::new(),
            links: Vec::new(),
        }
    }

    pub fn visited_count(&self) -> usize {
        self.visited.len()
    }

    pub fn seen_count(&self) -> usize {
        self.seen.len()
    }

    pub fn failed_count(&self) -> usize {
        self.failed_pages().count()
    }

    pub fn failed_pages(&self) -> impl Iterator<Item = &PageRecord> {
        self.pages
            .iter()
            .filter(|page| matches!(page.status, PageStatus::FetchFailed { .. }))
    }

    pub fn links_of_kind(&self, kind: LinkKind) -> impl Iterator<Item = &LinkRecord> {
        self.links.iter().filter(move |link| link.kind == kind)
    }
}
