use anyhow::{Context, bail};
use clap::ArgMatches;
use colored::Colorize;
use sitewalk_core::crawl::{CrawlOptions, CrawlProgressCallback, execute_crawl};
use sitewalk_core::report::{ReportFormat, generate_crawl_report, write_report};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{Level, warn};
use url::Url;

/// Install the stderr log subscriber. `--verbose` wins over the default,
/// `--quiet` keeps only warnings.
pub fn init_logging(verbose: bool, quiet: bool) {
    let level = if verbose {
        Level::DEBUG
    } else if quiet {
        Level::WARN
    } else {
        Level::INFO
    };

    // A subscriber may already be installed (tests)
    let _ = tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

/// Expand a leading `~` in a user supplied path
pub fn expand_path(path: &Path) -> PathBuf {
    PathBuf::from(shellexpand::tilde(&path.to_string_lossy()).as_ref())
}

// Helper functions for crawl handler

/// Load URLs from either a file or a single URL argument
pub fn load_urls_from_source(
    url: Option<&Url>,
    hosts_file: Option<&Path>,
) -> Result<Vec<String>, String> {
    if let Some(hosts_file_path) = hosts_file {
        load_urls_from_file(hosts_file_path)
    } else if let Some(url) = url {
        Ok(vec![url.as_str().to_string()])
    } else {
        Err("Either --url or --hosts-file must be provided".to_string())
    }
}

/// Load and parse URLs from a file. Blank lines and `#` comments are skipped.
pub fn load_urls_from_file(path: &Path) -> Result<Vec<String>, String> {
    let content = fs::read_to_string(path)
        .map_err(|e| format!("Failed to read hosts file {}: {}", path.display(), e))?;

    let urls: Vec<String> = content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .filter_map(parse_url_line)
        .collect();

    if urls.is_empty() {
        return Err(format!("No valid URLs found in {}", path.display()));
    }

    Ok(urls)
}

/// Parse a single line as an http(s) URL, trying to add http:// if needed
pub fn parse_url_line(line: &str) -> Option<String> {
    if let Ok(url) = Url::parse(line)
        && matches!(url.scheme(), "http" | "https")
    {
        return Some(line.to_string());
    }

    let with_scheme = format!("http://{}", line);
    if Url::parse(&with_scheme).is_ok() {
        return Some(with_scheme);
    }

    warn!("Skipping invalid URL '{}'", line);
    None
}

pub async fn handle_crawl(sub_matches: &ArgMatches) -> anyhow::Result<()> {
    let quiet = sub_matches.get_flag("quiet");
    let url = sub_matches.get_one::<Url>("url");
    let hosts_file = sub_matches
        .get_one::<PathBuf>("hosts-file")
        .map(|p| expand_path(p));
    let output = sub_matches
        .get_one::<PathBuf>("output")
        .map(|p| expand_path(p));
    let attempts = *sub_matches.get_one::<usize>("attempts").unwrap_or(&3);
    let timeout = *sub_matches.get_one::<u64>("timeout").unwrap_or(&10);
    let max_pages = sub_matches.get_one::<usize>("max-pages").copied();
    let format = sub_matches
        .get_one::<String>("format")
        .and_then(|f| ReportFormat::from_str(f))
        .unwrap_or(ReportFormat::Text);

    let urls = load_urls_from_source(url, hosts_file.as_deref()).map_err(anyhow::Error::msg)?;

    if !quiet {
        println!("\n🕷️  Crawling {} host(s)", urls.len().to_string().bright_white());
        println!("Attempts per page: {}", attempts);
        println!("Timeout: {}s", timeout);
        match max_pages {
            Some(max_pages) => println!("Page limit: {}\n", max_pages),
            None => println!("Page limit: none\n"),
        }
    }

    let mut options = CrawlOptions::new(urls);
    options.max_attempts = attempts;
    options.timeout_secs = timeout;
    options.max_pages = max_pages;
    options.show_progress_bars = !quiet;

    let progress_callback: CrawlProgressCallback = Arc::new(move |msg: String| {
        if !quiet {
            println!("{}", msg);
        }
    });

    let all_results = execute_crawl(options, Some(progress_callback))
        .await
        .map_err(anyhow::Error::msg)
        .context("Crawl failed")?;

    if all_results.is_empty() {
        bail!("None of the seed URLs could be crawled");
    }

    if !quiet {
        println!("\n{} Crawl complete!\n", "✓".green().bold());
    }

    let report = generate_crawl_report(&all_results, format).map_err(anyhow::Error::msg)?;
    match output {
        Some(path) => {
            write_report(&path, &report).map_err(anyhow::Error::msg)?;
            if !quiet {
                println!(
                    "{} Report saved to {}",
                    "✓".green().bold(),
                    path.display().to_string().bright_white()
                );
            }
        }
        None => print!("{}", report),
    }

    Ok(())
}
