pub mod crawler;
pub mod error;
pub mod fetcher;
pub mod filter;
pub mod resolve;
pub mod result;
pub mod source;

pub use crawler::{Crawler, ProgressCallback};
pub use error::ScanError;
pub use fetcher::HttpLinkSource;
pub use result::{CrawlResult, LinkKind, LinkRecord, PageRecord, PageStatus};
pub use source::{FetchOutcome, LinkSource};
