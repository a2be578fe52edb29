//! Link discovery from fetched content

pub mod links;
pub mod sitemap;

pub use links::extract_links;
pub use sitemap::extract_sitemap_urls;
