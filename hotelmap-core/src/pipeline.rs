use crate::error::Result;
use crate::export::write_hotels_json;
use hotelmap_scanner::fetcher::DEFAULT_TIMEOUT_SECS;
use hotelmap_scanner::{Fetcher, Hotel, Site, locate_sitemaps, process_sitemap};
use indicatif::{ProgressBar, ProgressStyle};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tracing::info;

/// Options for a single extraction run
#[derive(Debug)]
pub struct PipelineOptions {
    pub site: Site,
    pub output: PathBuf,
    pub timeout_secs: u64,
    pub show_progress: bool,
}

impl PipelineOptions {
    pub fn new(site: Site, output: PathBuf) -> Self {
        Self {
            site,
            output,
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            show_progress: false,
        }
    }
}

/// What a finished run produced
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunSummary {
    pub sitemaps: usize,
    pub hotels: usize,
    pub output: PathBuf,
}

/// Callback for reporting pipeline progress
pub type ProgressCallback = Arc<dyn Fn(String) + Send + Sync>;

/// Locate the hotel sitemaps and process them one after another,
/// accumulating records in sitemap order then document order.
///
/// Returns the records and the number of sitemaps processed. The first
/// failing fetch or parse aborts the whole collection.
pub async fn collect_hotels(
    fetcher: &Fetcher,
    site: &Site,
    progress_callback: Option<&ProgressCallback>,
) -> Result<(Vec<Hotel>, usize)> {
    let sitemap_urls = locate_sitemaps(fetcher, site).await?;

    let mut hotels = Vec::new();
    for (idx, url) in sitemap_urls.iter().enumerate() {
        if let Some(callback) = progress_callback {
            callback(format!(
                "Processing sitemap {}/{}: {}",
                idx + 1,
                sitemap_urls.len(),
                url
            ));
        }

        hotels.extend(process_sitemap(fetcher, site, url).await?);
    }

    Ok((hotels, sitemap_urls.len()))
}

/// Run the whole extraction: robots.txt, every hotel sitemap, then the
/// JSON file.
///
/// Nothing is written unless every fetch and parse succeeded.
pub async fn run_pipeline(
    options: PipelineOptions,
    progress_callback: Option<ProgressCallback>,
) -> Result<RunSummary> {
    let PipelineOptions {
        site,
        output,
        timeout_secs,
        show_progress,
    } = options;

    let progress_bar = if show_progress {
        let pb = ProgressBar::new_spinner();
        pb.set_style(ProgressStyle::default_spinner().template("{spinner:.cyan} {msg}")?);
        pb.enable_steady_tick(Duration::from_millis(100));
        pb.set_message(format!("Reading {}", site.robots_url()));
        Some(Arc::new(pb))
    } else {
        None
    };

    // Forward messages to the spinner as well as the caller's callback
    let internal_callback: Option<ProgressCallback> = match (&progress_bar, progress_callback) {
        (Some(pb), cb) => {
            let pb_clone = pb.clone();
            let forward: ProgressCallback = Arc::new(move |msg: String| {
                pb_clone.set_message(msg.clone());
                if let Some(ref cb) = cb {
                    cb(msg);
                }
            });
            Some(forward)
        }
        (None, cb) => cb,
    };

    info!("Starting hotel extraction from {}", site.base_url());

    // The fetcher is dropped at the end of this match on every path
    let collected = match Fetcher::with_timeout(timeout_secs) {
        Ok(fetcher) => collect_hotels(&fetcher, &site, internal_callback.as_ref()).await,
        Err(e) => Err(e.into()),
    };

    let (hotels, sitemaps) = match collected {
        Ok(collected) => collected,
        Err(e) => {
            if let Some(ref pb) = progress_bar {
                pb.abandon_with_message("Extraction failed");
            }
            return Err(e);
        }
    };

    write_hotels_json(&output, &hotels)?;

    if let Some(ref pb) = progress_bar {
        pb.finish_with_message(format!(
            "Extraction complete! {} hotels from {} sitemap(s)",
            hotels.len(),
            sitemaps
        ));
    }

    Ok(RunSummary {
        sitemaps,
        hotels: hotels.len(),
        output,
    })
}

/// Short human-readable summary of a finished run
pub fn generate_run_report(summary: &RunSummary) -> String {
    let mut report = String::new();
    report.push_str("# Summary:\n");
    report.push_str(&format!("  Sitemaps processed: {}\n", summary.sitemaps));
    report.push_str(&format!("  Hotels extracted: {}\n", summary.hotels));
    report.push_str(&format!("  Output: {}\n", summary.output.display()));
    report
}
