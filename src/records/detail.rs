use serde::Serialize;

/// Metadata scraped from a book's detail page
///
/// Every field is empty when the page lacks the corresponding block.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct BookDetail {
    pub identifier: String,
    pub title: String,
    pub author: String,
    pub publisher: String,
    pub publication_date: String,
    pub page_count: String,
    pub dimensions: String,

    /// Up to four breadcrumb labels joined by `" > "`
    pub category_path: String,

    pub description: String,

    /// Set by category pipelines only
    pub category_id: String,
    pub category_name: String,
}

impl BookDetail {
    pub fn empty(identifier: impl Into<String>) -> Self {
        Self {
            identifier: identifier.into(),
            ..Default::default()
        }
    }
}
