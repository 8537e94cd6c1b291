//! Crawler module for listing scans and per-item collection
//!
//! This module contains the site-independent crawling logic, including:
//! - HTTP fetching with a shared cookie-keeping client
//! - Listing pagination into an ordered, de-duplicated result set
//! - Review and detail collection for a single item
//! - Pipeline orchestration with progress reporting

mod collector;
mod fetcher;
mod paginator;
mod pipeline;

pub use collector::Collector;
pub use fetcher::{build_http_client, Fetcher};
pub use paginator::{collect_listing, with_page_param, ResultSet};
pub use pipeline::{Pipeline, PipelineResult, PipelineStatus, Progress};
