//! URL patterns for the travel site being scanned.

use crate::error::{Result, ScanError};
use regex::Regex;
use url::Url;

pub const DEFAULT_SITE: &str = "https://www.id90travel.com";

/// Path of the hotel detail sitemaps, with an optional `_<n>` suffix.
const SITEMAP_PATH_PATTERN: &str = r"/sitemaps/sitemap_hotel_details_?\d*\.xml";

/// Prefix every hotel detail page shares.
pub const HOTEL_DETAIL_PREFIX: &str = "/hotels/details/";

/// A travel site and the patterns used to find its hotel sitemaps and
/// hotel detail pages.
#[derive(Debug, Clone)]
pub struct Site {
    base_url: String,
    sitemap_pattern: Regex,
    hotel_detail_pattern: Regex,
}

impl Site {
    pub fn new(base_url: &str) -> Result<Self> {
        let parsed = Url::parse(base_url)
            .map_err(|e| ScanError::InvalidUrl(format!("{}: {}", base_url, e)))?;
        if !matches!(parsed.scheme(), "http" | "https") || parsed.host_str().is_none() {
            return Err(ScanError::InvalidUrl(format!(
                "{}: not an absolute http(s) URL",
                base_url
            )));
        }

        let base_url = base_url.trim_end_matches('/').to_string();
        let escaped = regex::escape(&base_url);

        let sitemap_pattern = Regex::new(&format!("{}{}", escaped, SITEMAP_PATH_PATTERN))
            .map_err(|e| ScanError::Other(format!("Bad sitemap pattern: {}", e)))?;
        let hotel_detail_pattern = Regex::new(&format!(
            "^{}{}.+$",
            escaped,
            regex::escape(HOTEL_DETAIL_PREFIX)
        ))
        .map_err(|e| ScanError::Other(format!("Bad hotel detail pattern: {}", e)))?;

        Ok(Self {
            base_url,
            sitemap_pattern,
            hotel_detail_pattern,
        })
    }

    pub fn id90travel() -> Result<Self> {
        Self::new(DEFAULT_SITE)
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn robots_url(&self) -> String {
        format!("{}/robots.txt", self.base_url)
    }

    /// Every hotel detail sitemap URL in `text`, in order of appearance.
    /// Duplicates are kept.
    pub fn sitemap_urls_in(&self, text: &str) -> Vec<String> {
        self.sitemap_pattern
            .find_iter(text)
            .map(|m| m.as_str().to_string())
            .collect()
    }

    pub fn is_hotel_detail_url(&self, url: &str) -> bool {
        self.hotel_detail_pattern.is_match(url)
    }
}
