//! Find the hotel detail sitemaps advertised in robots.txt.
//!
//! The body is scanned as plain text for the sitemap URL pattern rather
//! than parsed as robots.txt directives, so a URL mentioned anywhere in
//! the file counts.

use crate::error::Result;
use crate::fetcher::Fetcher;
use crate::site::Site;
use tracing::info;

/// Fetch the site's robots.txt and return every hotel detail sitemap URL
/// in it, in order of appearance.
pub async fn locate_sitemaps(fetcher: &Fetcher, site: &Site) -> Result<Vec<String>> {
    let robots_url = site.robots_url();
    let body = fetcher.fetch_text(&robots_url).await?;

    let sitemaps = site.sitemap_urls_in(&body);
    info!("Found {} hotel sitemap(s) in {}", sitemaps.len(), robots_url);
    Ok(sitemaps)
}
