//! Per-item collection: paginated reviews and single-page book details

use crate::config::CrawlerConfig;
use crate::crawler::Fetcher;
use crate::records::{BookDetail, ReviewRecord};
use crate::sites::Site;
use crate::Result;
use std::time::Duration;

/// Collects per-item reviews and details for one site
pub struct Collector<'a> {
    fetcher: &'a Fetcher,
    site: &'a dyn Site,
    config: &'a CrawlerConfig,
}

impl<'a> Collector<'a> {
    pub fn new(fetcher: &'a Fetcher, site: &'a dyn Site, config: &'a CrawlerConfig) -> Self {
        Self {
            fetcher,
            site,
            config,
        }
    }

    /// Collects up to `max_reviews` reviews of `item_id`, in arrival order
    ///
    /// The last page is taken from the first page's pagination data. Reviews
    /// without content are skipped and do not count toward the cap. A failed
    /// fetch or malformed page ends collection with what was gathered so far.
    pub async fn collect_reviews(&self, item_id: &str, max_reviews: usize) -> Vec<ReviewRecord> {
        let mut reviews: Vec<ReviewRecord> = Vec::new();
        if max_reviews == 0 {
            return reviews;
        }

        let mut last_page: Option<u32> = None;
        let mut page = 1u32;

        loop {
            let url = match self.site.review_url(item_id, page) {
                Ok(url) => url,
                Err(e) => {
                    tracing::warn!("Cannot build review URL for {}: {}", item_id, e);
                    break;
                }
            };

            let parsed = match self.fetcher.get_text(&url).await {
                Ok(body) => self.site.parse_reviews(&body),
                Err(e) => Err(e),
            };
            let parsed = match parsed {
                Ok(parsed) => parsed,
                Err(e) => {
                    tracing::warn!(
                        "{} reviews for {} stopped at page {}: {}",
                        self.site.name(),
                        item_id,
                        page,
                        e
                    );
                    break;
                }
            };

            if page == 1 {
                last_page = parsed.last_page;
                tracing::debug!(
                    "{} reviews for {}: {:?} pages reported",
                    self.site.name(),
                    item_id,
                    last_page
                );
            }

            tracing::debug!(
                "{} reviews for {} page {}: {} entries, {} with content",
                self.site.name(),
                item_id,
                page,
                parsed.raw_count,
                parsed.reviews.len()
            );

            if parsed.raw_count == 0 {
                break;
            }

            reviews.extend(parsed.reviews);
            if reviews.len() >= max_reviews {
                reviews.truncate(max_reviews);
                tracing::debug!("Reached {} reviews for {}", max_reviews, item_id);
                break;
            }

            if last_page.is_some_and(|last| page >= last) {
                tracing::debug!("Collected all review pages for {}", item_id);
                break;
            }

            if let Some(size) = self.site.review_page_size() {
                if parsed.raw_count < size {
                    break;
                }
            }

            if page >= self.config.max_pages {
                tracing::warn!(
                    "{} reviews for {} hit the {} page ceiling",
                    self.site.name(),
                    item_id,
                    self.config.max_pages
                );
                break;
            }

            page += 1;
            tokio::time::sleep(Duration::from_millis(self.config.page_delay_ms)).await;
        }

        tracing::info!(
            "Collected {} {} reviews for {}",
            reviews.len(),
            self.site.name(),
            item_id
        );
        reviews
    }

    /// Fetches and parses the detail page of `item_id`
    ///
    /// Missing page sections leave the matching fields empty. Fetch failures
    /// and sites without detail pages are errors.
    pub async fn collect_detail(&self, item_id: &str) -> Result<BookDetail> {
        let url = self.site.detail_url(item_id)?;
        let body = self.fetcher.get_text(&url).await?;
        self.site.parse_detail(item_id, &body)
    }
}
