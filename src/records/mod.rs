//! Records produced by a crawl
//!
//! - `ListingRecord`: one item of a search or category listing
//! - `ReviewRecord` / `ReviewRow`: one review, bare and tagged with its book
//! - `BookDetail`: metadata scraped from a book's detail page
//! - `ItemSummary`: per-item outcome of a pipeline run

mod detail;
mod listing;
mod review;

pub use detail::BookDetail;
pub use listing::{ItemSummary, ListingRecord};
pub use review::{ReviewRecord, ReviewRow};
