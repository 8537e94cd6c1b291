use crate::records::ListingRecord;
use serde::{Deserialize, Serialize};

/// A single review as extracted from a review page
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReviewRecord {
    /// Rating on the site's 0-10 scale, when present
    pub rating: Option<u8>,

    /// Review text; records without it are never produced
    pub content: String,

    pub author: String,

    /// `YYYY-MM-DD` or the site's own date text
    pub date: String,
}

impl ReviewRecord {
    /// Tags the review with the book it belongs to
    pub fn into_row(self, item: &ListingRecord) -> ReviewRow {
        ReviewRow {
            title: item.title.clone(),
            identifier: item.identifier.clone(),
            rating: self.rating,
            content: self.content,
            author: self.author,
            date: self.date,
        }
    }
}

/// Flat export shape of a review
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReviewRow {
    pub title: String,
    pub identifier: String,
    pub rating: Option<u8>,
    pub content: String,
    pub author: String,
    pub date: String,
}
