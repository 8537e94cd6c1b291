//! Outer listing scan
//!
//! Walks the pages of a search or category listing, merging the items of each
//! page into one ordered [`ResultSet`] until the cap is reached or the listing
//! runs out.

use crate::config::CrawlerConfig;
use crate::crawler::Fetcher;
use crate::records::ListingRecord;
use crate::sites::{ListingQuery, Site};
use crate::Result;
use std::collections::HashMap;
use std::time::Duration;
use url::Url;

/// Ordered listing items keyed by identifier
///
/// Items keep the position of their first insertion. Inserting an identifier
/// that is already present replaces its title in place.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResultSet {
    records: Vec<ListingRecord>,
    positions: HashMap<String, usize>,
}

impl ResultSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts or updates a record, returning the new length
    pub fn insert(&mut self, record: ListingRecord) -> usize {
        match self.positions.get(&record.identifier) {
            Some(&index) => self.records[index].title = record.title,
            None => {
                self.positions
                    .insert(record.identifier.clone(), self.records.len());
                self.records.push(record);
            }
        }
        self.records.len()
    }

    /// Keeps the first `max` records
    pub fn truncate(&mut self, max: usize) {
        if self.records.len() <= max {
            return;
        }
        for dropped in self.records.drain(max..) {
            self.positions.remove(&dropped.identifier);
        }
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &ListingRecord> {
        self.records.iter()
    }

    pub fn get(&self, identifier: &str) -> Option<&ListingRecord> {
        self.positions
            .get(identifier)
            .map(|&index| &self.records[index])
    }

    /// `(title, identifier)` pairs in insertion order
    pub fn pairs(&self) -> Vec<(&str, &str)> {
        self.records
            .iter()
            .map(|r| (r.title.as_str(), r.identifier.as_str()))
            .collect()
    }

    pub fn into_records(self) -> Vec<ListingRecord> {
        self.records
    }
}

impl IntoIterator for ResultSet {
    type Item = ListingRecord;
    type IntoIter = std::vec::IntoIter<ListingRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.into_iter()
    }
}

/// Returns `url` with `param` set to `page`
///
/// An existing `param` pair is replaced where it stands; otherwise the pair is
/// appended. Other pairs keep their order.
pub fn with_page_param(url: &Url, param: &str, page: u32) -> Url {
    let page = page.to_string();
    let mut replaced = false;

    let pairs: Vec<(String, String)> = url
        .query_pairs()
        .into_owned()
        .map(|(key, value)| {
            if key == param {
                replaced = true;
                (key, page.clone())
            } else {
                (key, value)
            }
        })
        .collect();

    let mut paged = url.clone();
    {
        let mut query = paged.query_pairs_mut();
        query.clear();
        for (key, value) in &pairs {
            query.append_pair(key, value);
        }
        if !replaced {
            query.append_pair(param, &page);
        }
    }
    paged
}

/// Scans a listing until `max_records` items are collected or it runs out
///
/// The scan stops when a page yields no items, when the page has no next-page
/// affordance, or after `max_pages` pages. A failed fetch ends the scan with
/// whatever was collected so far.
pub async fn collect_listing(
    fetcher: &Fetcher,
    site: &dyn Site,
    query: &ListingQuery,
    max_records: usize,
    config: &CrawlerConfig,
) -> Result<ResultSet> {
    let mut results = ResultSet::new();
    if max_records == 0 {
        return Ok(results);
    }

    let base_url = site.listing_url(query)?;
    let param = site.page_param(query);

    if let Some(prime_url) = site.prime_url() {
        fetcher.prime(&prime_url).await;
    }

    let mut page = 1u32;
    loop {
        let url = with_page_param(&base_url, param, page);

        let body = match fetcher.get_text(&url).await {
            Ok(body) => body,
            Err(e) => {
                tracing::warn!(
                    "{} listing '{}' stopped at page {}: {}",
                    site.name(),
                    query.label(),
                    page,
                    e
                );
                break;
            }
        };

        let parsed = site.parse_listing(&body);
        tracing::debug!(
            "{} listing page {}: {} items",
            site.name(),
            page,
            parsed.records.len()
        );

        if parsed.records.is_empty() {
            break;
        }

        for record in parsed.records {
            if results.insert(record) >= max_records {
                results.truncate(max_records);
                tracing::info!(
                    "{} listing '{}' reached {} items on page {}",
                    site.name(),
                    query.label(),
                    max_records,
                    page
                );
                return Ok(results);
            }
        }

        if !parsed.has_next {
            break;
        }

        if page >= config.max_pages {
            tracing::warn!(
                "{} listing '{}' hit the {} page ceiling",
                site.name(),
                query.label(),
                config.max_pages
            );
            break;
        }

        page += 1;
        tokio::time::sleep(Duration::from_millis(config.page_delay_ms)).await;
    }

    tracing::info!(
        "{} listing '{}' collected {} items",
        site.name(),
        query.label(),
        results.len()
    );
    Ok(results)
}
