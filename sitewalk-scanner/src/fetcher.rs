use crate::error::{Result, ScanError};
use crate::source::{FetchOutcome, LinkSource};
use reqwest::Client;
use reqwest::header::CONTENT_TYPE;
use scraper::{Html, Selector};
use std::time::Duration;
use tracing::debug;
use url::Url;

pub const DEFAULT_MAX_ATTEMPTS: usize = 3;
pub const DEFAULT_TIMEOUT_SECS: u64 = 10;
pub const DEFAULT_RETRY_DELAY: Duration = Duration::from_millis(250);

/// [`LinkSource`] that downloads pages over HTTP and pulls out `a[href]`.
pub struct HttpLinkSource {
    client: Client,
    max_attempts: usize,
    retry_delay: Duration,
}

impl HttpLinkSource {
    pub fn new() -> Result<Self> {
        Self::with_timeout(DEFAULT_TIMEOUT_SECS)
    }

    pub fn with_timeout(timeout_secs: u64) -> Result<Self> {
        let client = Client::builder()
            .user_agent(concat!("sitewalk/", env!("CARGO_PKG_VERSION")))
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs((timeout_secs / 2).max(1)))
            .pool_max_idle_per_host(10)
            .pool_idle_timeout(Duration::from_secs(90))
            .tcp_keepalive(Duration::from_secs(60))
            .redirect(reqwest::redirect::Policy::limited(5))
            .build()?;

        Ok(Self {
            client,
            max_attempts: DEFAULT_MAX_ATTEMPTS,
            retry_delay: DEFAULT_RETRY_DELAY,
        })
    }

    /// At least one attempt is always made.
    pub fn with_max_attempts(mut self, max_attempts: usize) -> Self {
        self.max_attempts = max_attempts.max(1);
        self
    }

    pub fn with_retry_delay(mut self, retry_delay: Duration) -> Self {
        self.retry_delay = retry_delay;
        self
    }

    async fn fetch_once(&self, url: &Url) -> Result<Vec<String>> {
        let response = self.client.get(url.clone()).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(ScanError::Status(status.as_u16()));
        }

        let parse_body = is_html(
            response
                .headers()
                .get(CONTENT_TYPE)
                .and_then(|v| v.to_str().ok()),
        );

        let body = response.text().await?;
        if !parse_body {
            debug!("Skipping non-HTML body of {}", url);
            return Ok(Vec::new());
        }

        extract_links(&body)
    }
}

impl LinkSource for HttpLinkSource {
    async fn fetch_links(&self, url: &Url) -> FetchOutcome {
        let mut last_error = String::new();

        for attempt in 1..=self.max_attempts {
            debug!("Fetching {} (attempt {}/{})", url, attempt, self.max_attempts);
            match self.fetch_once(url).await {
                Ok(links) => {
                    debug!("Found {} links on {}", links.len(), url);
                    return FetchOutcome::Links(links);
                }
                Err(e) => {
                    debug!("Attempt {} for {} failed: {}", attempt, url, e);
                    let retryable = e.is_retryable();
                    last_error = e.to_string();
                    if !retryable {
                        break;
                    }
                    if attempt < self.max_attempts && !self.retry_delay.is_zero() {
                        tokio::time::sleep(self.retry_delay).await;
                    }
                }
            }
        }

        FetchOutcome::Failed(last_error)
    }
}

/// Whether a body with this `content-type` should be searched for anchors.
///
/// A missing header and any `text/*` type are parsed, since servers often
/// label HTML as `text/plain`.
pub fn is_html(content_type: Option<&str>) -> bool {
    let Some(content_type) = content_type else {
        return true;
    };
    let mime = content_type
        .split(';')
        .next()
        .unwrap_or_default()
        .trim()
        .to_ascii_lowercase();
    mime.starts_with("text/") || mime.contains("html")
}

/// Raw `href` values of every anchor, in document order.
pub fn extract_links(html: &str) -> Result<Vec<String>> {
    let document = Html::parse_document(html);
    let selector =
        Selector::parse("a[href]").map_err(|e| ScanError::ParseError(e.to_string()))?;

    Ok(document
        .select(&selector)
        .filter_map(|element| element.value().attr("href"))
        .map(str::to_string)
        .collect())
}
