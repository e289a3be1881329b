use indicatif::{ProgressBar, ProgressStyle};
use sitewalk_scanner::fetcher::{DEFAULT_MAX_ATTEMPTS, DEFAULT_RETRY_DELAY, DEFAULT_TIMEOUT_SECS};
use sitewalk_scanner::{CrawlResult, Crawler, HttpLinkSource, ProgressCallback};
use std::sync::Arc;
use std::time::Duration;
use tracing::warn;
use url::Url;

/// Options for configuring a crawl operation
pub struct CrawlOptions {
    pub urls: Vec<String>,
    pub max_attempts: usize,
    pub timeout_secs: u64,
    pub retry_delay: Duration,
    pub max_pages: Option<usize>,
    pub show_progress_bars: bool,
}

impl CrawlOptions {
    pub fn new(urls: Vec<String>) -> Self {
        Self {
            urls,
            max_attempts: DEFAULT_MAX_ATTEMPTS,
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            retry_delay: DEFAULT_RETRY_DELAY,
            max_pages: None,
            show_progress_bars: false,
        }
    }
}

/// Callback for reporting crawl progress
pub type CrawlProgressCallback = Arc<dyn Fn(String) + Send + Sync>;

/// Extract the path component from a URL
pub fn extract_url_path(url: &str) -> String {
    Url::parse(url)
        .ok()
        .map(|u| {
            let path = u.path().to_string();
            if path.is_empty() || path == "/" {
                "/".to_string()
            } else {
                path
            }
        })
        .unwrap_or_else(|| url.to_string())
}

fn spinner() -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    let style = ProgressStyle::default_spinner()
        .template("{spinner:.cyan} {msg}")
        .unwrap_or_else(|_| ProgressStyle::default_spinner());
    pb.set_style(style);
    pb.enable_steady_tick(Duration::from_millis(100));
    pb.set_message("Starting crawl...");
    pb
}

/// Crawl every seed in `options.urls`, one after the other.
///
/// Seeds that cannot be crawled at all are reported through
/// `progress_callback` and left out of the returned results.
pub async fn execute_crawl(
    options: CrawlOptions,
    progress_callback: Option<CrawlProgressCallback>,
) -> Result<Vec<CrawlResult>, String> {
    let CrawlOptions {
        urls,
        max_attempts,
        timeout_secs,
        retry_delay,
        max_pages,
        show_progress_bars,
    } = options;

    let source = HttpLinkSource::with_timeout(timeout_secs)
        .map_err(|e| format!("Failed to create HTTP client: {}", e))?
        .with_max_attempts(max_attempts)
        .with_retry_delay(retry_delay);

    let progress_bar = show_progress_bars.then(|| Arc::new(spinner()));

    let page_callback: ProgressCallback = match progress_bar.clone() {
        Some(pb) => Arc::new(move |visited: usize, url: String| {
            pb.set_message(format!(
                "Crawling... {} pages visited ({})",
                visited,
                extract_url_path(&url)
            ));
        }),
        None => Arc::new(|_visited: usize, _url: String| {}),
    };

    let mut crawler = Crawler::new(source).with_progress_callback(page_callback);
    if let Some(max_pages) = max_pages {
        crawler = crawler.with_max_pages(max_pages);
    }

    let mut all_results = Vec::new();
    for (idx, url_str) in urls.iter().enumerate() {
        if let Some(ref callback) = progress_callback
            && urls.len() > 1
        {
            callback(format!(
                "Crawling host {}/{}: {}",
                idx + 1,
                urls.len(),
                url_str
            ));
        }

        match crawler.crawl(url_str).await {
            Ok(result) => all_results.push(result),
            Err(e) => {
                warn!("Failed to crawl {}: {}", url_str, e);
                if let Some(ref callback) = progress_callback {
                    callback(format!("[!]  Failed to crawl {}: {}", url_str, e));
                }
            }
        }
    }

    if let Some(ref pb) = progress_bar {
        let total: usize = all_results.iter().map(CrawlResult::visited_count).sum();
        pb.finish_with_message(format!("Crawl complete! {} pages visited", total));
    }

    Ok(all_results)
}
