// Report generation from crawl results

use chrono::Utc;
use serde::{Deserialize, Serialize};
use sitewalk_scanner::{CrawlResult, LinkKind, PageStatus};
use std::fs;
use std::path::Path;

const DIVIDER: &str = "━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ReportFormat {
    Text,
    Json,
}

impl ReportFormat {
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "text" | "txt" => Some(ReportFormat::Text),
            "json" => Some(ReportFormat::Json),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportData {
    pub generated_at: String,
    pub summary: Summary,
    pub crawls: Vec<SeedReport>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Summary {
    pub seeds: usize,
    pub pages_visited: usize,
    pub links_seen: usize,
    pub fetch_failures: usize,
    pub out_of_scope: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SeedReport {
    pub base_url: String,
    pub visited_count: usize,
    pub seen_count: usize,
    pub visited: Vec<String>,
    pub seen: Vec<String>,
    pub failed: Vec<FailedPage>,
    pub out_of_scope: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FailedPage {
    pub url: String,
    pub reason: String,
}

fn sorted<'a>(urls: impl Iterator<Item = &'a String>) -> Vec<String> {
    let mut urls: Vec<String> = urls.cloned().collect();
    urls.sort();
    urls
}

impl SeedReport {
    fn from_result(result: &CrawlResult) -> Self {
        let failed = result
            .failed_pages()
            .filter_map(|page| match &page.status {
                PageStatus::FetchFailed { reason } => Some(FailedPage {
                    url: page.url.clone(),
                    reason: reason.clone(),
                }),
                PageStatus::Fetched { .. } => None,
            })
            .collect();

        Self {
            base_url: result.base_url.clone(),
            visited_count: result.visited_count(),
            seen_count: result.seen_count(),
            visited: sorted(result.visited.iter()),
            seen: sorted(result.seen.iter()),
            failed,
            out_of_scope: sorted(
                result
                    .links_of_kind(LinkKind::OutOfScope)
                    .map(|link| &link.url),
            ),
        }
    }
}

pub fn build_report_data(results: &[CrawlResult]) -> ReportData {
    let crawls: Vec<SeedReport> = results.iter().map(SeedReport::from_result).collect();

    let summary = crawls.iter().fold(
        Summary {
            seeds: crawls.len(),
            ..Summary::default()
        },
        |mut summary, crawl| {
            summary.pages_visited += crawl.visited_count;
            summary.links_seen += crawl.seen_count;
            summary.fetch_failures += crawl.failed.len();
            summary.out_of_scope += crawl.out_of_scope.len();
            summary
        },
    );

    ReportData {
        generated_at: Utc::now().to_rfc3339(),
        summary,
        crawls,
    }
}

/// Generate a crawl report from results
pub fn generate_crawl_report(
    results: &[CrawlResult],
    format: ReportFormat,
) -> Result<String, String> {
    let data = build_report_data(results);
    match format {
        ReportFormat::Text => Ok(render_text(&data)),
        ReportFormat::Json => serde_json::to_string_pretty(&data)
            .map_err(|e| format!("Failed to serialize report: {}", e)),
    }
}

fn render_text(data: &ReportData) -> String {
    let mut report = String::new();
    report.push_str(DIVIDER);
    report.push_str("\n\n# Summary:\n");
    report.push_str(&format!("  Seeds crawled: {}\n", data.summary.seeds));
    report.push_str(&format!("  Pages visited: {}\n", data.summary.pages_visited));
    report.push_str(&format!("  Links seen: {}\n", data.summary.links_seen));
    report.push_str(&format!("  Fetch failures: {}\n", data.summary.fetch_failures));
    report.push_str(&format!("  Out-of-scope links: {}\n", data.summary.out_of_scope));
    report.push('\n');
    report.push_str(DIVIDER);
    report.push_str("\n\n");

    for crawl in &data.crawls {
        report.push_str(&format!("## {}\n", crawl.base_url));
        report.push_str(&format!(
            "  {} pages visited, {} links seen\n\n",
            crawl.visited_count, crawl.seen_count
        ));

        report.push_str("  Visited:\n");
        for url in &crawl.visited {
            match crawl.failed.iter().find(|failed| &failed.url == url) {
                Some(failed) => {
                    report.push_str(&format!("    {} [fetch failed: {}]\n", url, failed.reason))
                }
                None => report.push_str(&format!("    {}\n", url)),
            }
        }

        if !crawl.out_of_scope.is_empty() {
            report.push_str("\n  Out of scope:\n");
            for url in &crawl.out_of_scope {
                report.push_str(&format!("    {}\n", url));
            }
        }
        report.push('\n');
    }

    report
}

/// Write a rendered report, creating parent directories as needed.
pub fn write_report(path: &Path, contents: &str) -> Result<(), String> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        fs::create_dir_all(parent)
            .map_err(|e| format!("Failed to create {}: {}", parent.display(), e))?;
    }
    fs::write(path, contents).map_err(|e| format!("Failed to write {}: {}", path.display(), e))
}
