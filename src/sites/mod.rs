//! Per-bookstore URL building and extraction
//!
//! Each bookstore implements [`Site`]: the set of URL builders and parsers the
//! paginator, collectors and pipeline are written against. Implementations are
//! pure (no I/O); all requests go through [`crate::crawler::Fetcher`].

mod html;
mod kyobo;
mod yes24;

pub use kyobo::Kyobo;
pub use yes24::Yes24;

use crate::config::Config;
use crate::records::{BookDetail, ListingRecord, ReviewRecord};
use crate::{CrawlerError, Result};
use std::fmt;
use std::str::FromStr;
use url::Url;

/// Where a listing scan starts
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ListingQuery {
    /// Keyword search, with an optional site-specific sort token
    Keyword { text: String, order: Option<String> },

    /// New arrivals of a category
    NewArrivals { category: String },

    /// Editor-featured new arrivals of a category
    FeaturedArrivals { category: String },
}

impl ListingQuery {
    pub fn keyword(text: impl Into<String>) -> Self {
        Self::Keyword {
            text: text.into(),
            order: None,
        }
    }

    /// Short label used in log lines and export filenames
    pub fn label(&self) -> &str {
        match self {
            Self::Keyword { text, .. } => text,
            Self::NewArrivals { category } | Self::FeaturedArrivals { category } => category,
        }
    }
}

/// One parsed listing page
#[derive(Debug, Clone, Default)]
pub struct ListingPage {
    /// Records in page order
    pub records: Vec<ListingRecord>,

    /// Whether the page advertises a following page
    pub has_next: bool,
}

/// One parsed review page
#[derive(Debug, Clone, Default)]
pub struct ReviewPage {
    /// Reviews with non-empty content, in page order
    pub reviews: Vec<ReviewRecord>,

    /// Review entries on the page before empty ones were dropped
    pub raw_count: usize,

    /// Last page number reported by the site, if it reports one
    pub last_page: Option<u32>,
}

/// A sort order accepted by a site's search endpoint
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SortOrder {
    /// Value sent in the query string
    pub token: &'static str,

    /// Human-readable description
    pub label: &'static str,
}

/// URL builders and extractors for one bookstore
pub trait Site: Send + Sync {
    /// Short lowercase site name
    fn name(&self) -> &'static str;

    /// Accepted sort orders; the first one is the default
    fn sort_orders(&self) -> &'static [SortOrder];

    /// Page visited once before a listing scan to obtain session cookies
    fn prime_url(&self) -> Option<Url> {
        None
    }

    /// First-page URL of a listing scan
    fn listing_url(&self, query: &ListingQuery) -> Result<Url>;

    /// Query parameter carrying the page number for `query`
    fn page_param(&self, query: &ListingQuery) -> &'static str;

    /// Extracts items and the next-page signal from a listing page
    fn parse_listing(&self, body: &str) -> ListingPage;

    /// URL of one page of an item's reviews
    fn review_url(&self, item_id: &str, page: u32) -> Result<Url>;

    /// Page size requested from the review endpoint, if the site takes one
    fn review_page_size(&self) -> Option<usize> {
        None
    }

    /// Extracts reviews from one review page
    ///
    /// An `Err` means the response was not in the expected shape.
    fn parse_reviews(&self, body: &str) -> Result<ReviewPage>;

    /// Whether items have a detail page [`Site::parse_detail`] understands
    fn supports_details(&self) -> bool {
        false
    }

    /// URL of an item's detail page
    fn detail_url(&self, _item_id: &str) -> Result<Url> {
        Err(self.unsupported("detail pages"))
    }

    /// Extracts book metadata from a detail page
    fn parse_detail(&self, _item_id: &str, _body: &str) -> Result<BookDetail> {
        Err(self.unsupported("detail pages"))
    }

    /// URL of the page listing the categories below `root_id`
    fn category_url(&self, _root_id: &str) -> Result<Url> {
        Err(self.unsupported("category listings"))
    }

    /// Extracts `(identifier, name)` pairs from a category page, in page order
    fn parse_categories(&self, _body: &str) -> Vec<(String, String)> {
        Vec::new()
    }

    /// Error for a capability this site lacks
    fn unsupported(&self, capability: &'static str) -> CrawlerError {
        CrawlerError::Unsupported {
            site: self.name(),
            capability,
        }
    }

    /// Resolves an optional sort token against [`Site::sort_orders`]
    fn resolve_order(&self, token: Option<&str>) -> Result<&'static str> {
        let orders = self.sort_orders();
        match token {
            None => Ok(orders.first().map(|o| o.token).unwrap_or("")),
            Some(token) => orders
                .iter()
                .find(|o| o.token.eq_ignore_ascii_case(token))
                .map(|o| o.token)
                .ok_or_else(|| CrawlerError::InvalidOrder {
                    site: self.name(),
                    token: token.to_string(),
                }),
        }
    }
}

/// Supported bookstores
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SiteKind {
    Yes24,
    Kyobo,
}

impl fmt::Display for SiteKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Yes24 => write!(f, "yes24"),
            Self::Kyobo => write!(f, "kyobo"),
        }
    }
}

impl FromStr for SiteKind {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "yes24" => Ok(Self::Yes24),
            "kyobo" => Ok(Self::Kyobo),
            other => Err(format!("unknown site '{}' (expected yes24 or kyobo)", other)),
        }
    }
}

/// Builds the site implementation for `kind` from the configuration
pub fn site_for(kind: SiteKind, config: &Config) -> Box<dyn Site> {
    match kind {
        SiteKind::Yes24 => Box::new(Yes24::new(config.yes24.clone())),
        SiteKind::Kyobo => Box::new(Kyobo::new(config.kyobo.clone())),
    }
}

/// Joins `path` onto a configured base URL
pub(crate) fn join_base(base: &str, path: &str) -> Result<Url> {
    Ok(Url::parse(base)?.join(path)?)
}
