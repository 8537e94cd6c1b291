use serde::{Deserialize, Serialize};

/// One item found on a listing page
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListingRecord {
    /// Display title, never empty
    pub title: String,

    /// Site-specific item key (Yes24: numeric string, Kyobo: `S` + digits)
    pub identifier: String,
}

impl ListingRecord {
    /// Builds a record, rejecting empty titles or identifiers
    pub fn new(title: impl Into<String>, identifier: impl Into<String>) -> Option<Self> {
        let title = title.into();
        let identifier = identifier.into();

        if title.is_empty() || identifier.is_empty() {
            return None;
        }

        Some(Self { title, identifier })
    }
}

/// Outcome of one item within a pipeline run
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ItemSummary {
    pub title: String,
    pub identifier: String,

    /// Records collected for the item; `None` when its collection failed
    pub record_count: Option<usize>,
}

impl ItemSummary {
    pub fn collected(item: &ListingRecord, count: usize) -> Self {
        Self {
            title: item.title.clone(),
            identifier: item.identifier.clone(),
            record_count: Some(count),
        }
    }

    pub fn failed(item: &ListingRecord) -> Self {
        Self {
            title: item.title.clone(),
            identifier: item.identifier.clone(),
            record_count: None,
        }
    }

    pub fn is_failure(&self) -> bool {
        self.record_count.is_none()
    }
}
