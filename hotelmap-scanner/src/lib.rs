pub mod error;
pub mod fetcher;
pub mod hotel;
pub mod robots;
pub mod site;
pub mod sitemap;

pub use error::ScanError;
pub use fetcher::Fetcher;
pub use hotel::Hotel;
pub use robots::locate_sitemaps;
pub use site::Site;
pub use sitemap::process_sitemap;
