//! Shelfcrawl: listing, review and book-detail crawler for Korean bookstores
//!
//! This crate walks paginated search and category listings on Yes24 and Kyobo,
//! fans out to per-book review and detail pages, and exports the collected
//! records as CSV.

pub mod category;
pub mod config;
pub mod crawler;
pub mod output;
pub mod records;
pub mod sites;

use thiserror::Error;

/// Main error type for shelfcrawl operations
#[derive(Debug, Error)]
pub enum CrawlerError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("HTTP error for {url}: {source}")]
    Http { url: String, source: reqwest::Error },

    #[error("HTTP {status} from {url}")]
    Status { url: String, status: u16 },

    #[error("Request timeout for {url}")]
    Timeout { url: String },

    #[error("URL parse error: {0}")]
    UrlParse(#[from] url::ParseError),

    #[error("HTTP client error: {0}")]
    Reqwest(#[from] reqwest::Error),

    #[error("Malformed response: {0}")]
    Malformed(String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("{site} does not support {capability}")]
    Unsupported {
        site: &'static str,
        capability: &'static str,
    },

    #[error("Unknown sort order '{token}' for {site}")]
    InvalidOrder { site: &'static str, token: String },

    #[error("Category cache error: {0}")]
    Cache(String),

    #[error("Output error: {0}")]
    Output(#[from] output::OutputError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Configuration-specific errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid URL in config: {0}")]
    InvalidUrl(String),
}

/// Result type alias for shelfcrawl operations
pub type Result<T> = std::result::Result<T, CrawlerError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

// Re-export commonly used types
pub use category::{CategoryLoader, CategoryNode, CategoryTree};
pub use config::Config;
pub use crawler::{Fetcher, Pipeline, PipelineResult, PipelineStatus, ResultSet};
pub use records::{BookDetail, ItemSummary, ListingRecord, ReviewRecord, ReviewRow};
pub use sites::{site_for, Kyobo, ListingQuery, Site, SiteKind, Yes24};
