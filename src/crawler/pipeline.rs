//! Pipeline orchestration
//!
//! A pipeline run scans a listing, then visits every listed item in order to
//! collect its reviews or details. One failing item never aborts the run: it
//! is reported through the progress callback and skipped.

use crate::config::CrawlerConfig;
use crate::crawler::collector::Collector;
use crate::crawler::paginator::{collect_listing, ResultSet};
use crate::crawler::Fetcher;
use crate::records::{BookDetail, ItemSummary, ListingRecord, ReviewRow};
use crate::sites::{ListingQuery, Site};
use crate::{CrawlerError, Result};
use serde::Serialize;
use std::future::Future;
use std::time::Duration;

/// Progress callback: `(current_index, total, message)`, 1-based index
pub type Progress<'p> = dyn FnMut(usize, usize, &str) + 'p;

/// Overall outcome of a pipeline run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PipelineStatus {
    Success,
    Error,
}

/// Result handed to the presentation layer
#[derive(Debug, Clone, Serialize)]
pub struct PipelineResult<T> {
    pub status: PipelineStatus,
    pub message: String,
    pub data: Vec<T>,
    pub count: usize,

    /// One entry per listed item, in listing order
    pub summary: Vec<ItemSummary>,
}

impl<T> PipelineResult<T> {
    pub fn success(message: impl Into<String>, data: Vec<T>, summary: Vec<ItemSummary>) -> Self {
        Self {
            status: PipelineStatus::Success,
            message: message.into(),
            count: data.len(),
            data,
            summary,
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            status: PipelineStatus::Error,
            message: message.into(),
            data: Vec::new(),
            count: 0,
            summary: Vec::new(),
        }
    }

    pub fn is_success(&self) -> bool {
        self.status == PipelineStatus::Success
    }
}

/// Listing scan followed by per-item collection on one site
pub struct Pipeline<'a> {
    fetcher: &'a Fetcher,
    site: &'a dyn Site,
    config: &'a CrawlerConfig,
}

impl<'a> Pipeline<'a> {
    pub fn new(fetcher: &'a Fetcher, site: &'a dyn Site, config: &'a CrawlerConfig) -> Self {
        Self {
            fetcher,
            site,
            config,
        }
    }

    fn collector(&self) -> Collector<'a> {
        Collector::new(self.fetcher, self.site, self.config)
    }

    /// Search, then collect up to `max_reviews` reviews per listed book
    pub async fn search_reviews(
        &self,
        query: &ListingQuery,
        max_items: usize,
        max_reviews: usize,
        progress: &mut Progress<'_>,
    ) -> PipelineResult<ReviewRow> {
        let items = match self.listing(query, max_items).await {
            Ok(items) if !items.is_empty() => items,
            Ok(_) => return PipelineResult::error("No search results found."),
            Err(e) => return PipelineResult::error(format!("Search failed: {}", e)),
        };

        let collector = &self.collector();
        let (data, summary) = self
            .for_each_item(items, "collecting reviews", progress, |item| async move {
                let reviews = collector
                    .collect_reviews(&item.identifier, max_reviews)
                    .await;
                let rows: Vec<ReviewRow> =
                    reviews.into_iter().map(|r| r.into_row(&item)).collect();
                Ok::<_, CrawlerError>(rows)
            })
            .await;

        PipelineResult::success(format!("Collected {} reviews.", data.len()), data, summary)
    }

    /// Search, then fetch the detail page of every listed book
    pub async fn search_details(
        &self,
        query: &ListingQuery,
        max_items: usize,
        progress: &mut Progress<'_>,
    ) -> PipelineResult<BookDetail> {
        if !self.site.supports_details() {
            return PipelineResult::error(self.site.unsupported("detail pages").to_string());
        }

        let items = match self.listing(query, max_items).await {
            Ok(items) if !items.is_empty() => items,
            Ok(_) => return PipelineResult::error("No search results found."),
            Err(e) => return PipelineResult::error(format!("Search failed: {}", e)),
        };

        let collector = &self.collector();
        let (data, summary) = self
            .for_each_item(items, "extracting details", progress, |item| async move {
                let detail = collector.collect_detail(&item.identifier).await?;
                Ok::<_, CrawlerError>(vec![detail])
            })
            .await;

        PipelineResult::success(
            format!("Extracted {} book details.", data.len()),
            data,
            summary,
        )
    }

    /// New arrivals of a category, then the detail page of every listed book
    ///
    /// Each detail is tagged with `category_id` and `category_name`.
    pub async fn category_details(
        &self,
        category_id: &str,
        category_name: &str,
        max_items: usize,
        progress: &mut Progress<'_>,
    ) -> PipelineResult<BookDetail> {
        let query = ListingQuery::NewArrivals {
            category: category_id.to_string(),
        };
        self.arrival_details(&query, category_name, max_items, progress)
            .await
    }

    /// Same as [`Pipeline::category_details`] over the featured new arrivals
    pub async fn featured_category_details(
        &self,
        category_id: &str,
        category_name: &str,
        max_items: usize,
        progress: &mut Progress<'_>,
    ) -> PipelineResult<BookDetail> {
        let query = ListingQuery::FeaturedArrivals {
            category: category_id.to_string(),
        };
        self.arrival_details(&query, category_name, max_items, progress)
            .await
    }

    async fn arrival_details(
        &self,
        query: &ListingQuery,
        category_name: &str,
        max_items: usize,
        progress: &mut Progress<'_>,
    ) -> PipelineResult<BookDetail> {
        if !self.site.supports_details() {
            return PipelineResult::error(self.site.unsupported("detail pages").to_string());
        }

        let items = match self.listing(query, max_items).await {
            Ok(items) if !items.is_empty() => items,
            Ok(_) => return PipelineResult::error("No new books found in this category."),
            Err(e) => return PipelineResult::error(format!("Category listing failed: {}", e)),
        };

        let category_id = query.label();
        let collector = &self.collector();
        let (data, summary) = self
            .for_each_item(items, "extracting details", progress, |item| async move {
                let mut detail = collector.collect_detail(&item.identifier).await?;
                detail.category_id = category_id.to_string();
                detail.category_name = category_name.to_string();
                Ok::<_, CrawlerError>(vec![detail])
            })
            .await;

        PipelineResult::success(
            format!("Extracted {} book details.", data.len()),
            data,
            summary,
        )
    }

    async fn listing(&self, query: &ListingQuery, max_items: usize) -> Result<ResultSet> {
        collect_listing(self.fetcher, self.site, query, max_items, self.config).await
    }

    /// Runs `collect` for every item in order, isolating failures
    async fn for_each_item<T, F, Fut>(
        &self,
        items: ResultSet,
        activity: &str,
        progress: &mut Progress<'_>,
        mut collect: F,
    ) -> (Vec<T>, Vec<ItemSummary>)
    where
        F: FnMut(ListingRecord) -> Fut,
        Fut: Future<Output = Result<Vec<T>>>,
    {
        let total = items.len();
        let mut data = Vec::new();
        let mut summary = Vec::with_capacity(total);

        for (index, item) in items.into_iter().enumerate() {
            let current = index + 1;
            progress(
                current,
                total,
                &format!("{}... {}", truncate_chars(&item.title, 50), activity),
            );

            match collect(item.clone()).await {
                Ok(records) => {
                    summary.push(ItemSummary::collected(&item, records.len()));
                    data.extend(records);
                }
                Err(e) => {
                    tracing::warn!(
                        "{} item {} ({}) failed: {}",
                        self.site.name(),
                        item.identifier,
                        item.title,
                        e
                    );
                    progress(
                        current,
                        total,
                        &format!(
                            "failed: {}... - {}",
                            truncate_chars(&item.title, 30),
                            truncate_chars(&e.to_string(), 50)
                        ),
                    );
                    summary.push(ItemSummary::failed(&item));
                }
            }

            tokio::time::sleep(Duration::from_millis(self.config.item_delay_ms)).await;
        }

        (data, summary)
    }
}

/// First `max` characters of `text`
fn truncate_chars(text: &str, max: usize) -> String {
    text.chars().take(max).collect()
}
