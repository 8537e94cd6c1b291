//! Kyobo (kyobobook.co.kr)
//!
//! Search results live on `search.kyobobook.co.kr` as `a.prod_info` anchors
//! pointing at `/detail/S…` product pages. Reviews come from a JSON API on
//! `product.kyobobook.co.kr` that reports its own status code and total count.

use crate::config::KyoboConfig;
use crate::records::{ListingRecord, ReviewRecord};
use crate::sites::html::{all, first_number, first_text};
use crate::sites::{join_base, ListingPage, ListingQuery, ReviewPage, Site, SortOrder};
use crate::{CrawlerError, Result};
use regex::Regex;
use scraper::Html;
use serde::Deserialize;
use serde_json::Value;
use std::sync::LazyLock;
use url::Url;

const SORT_ORDERS: &[SortOrder] = &[
    SortOrder {
        token: "",
        label: "popularity",
    },
    SortOrder {
        token: "qntt",
        label: "sales",
    },
    SortOrder {
        token: "date",
        label: "newest",
    },
    SortOrder {
        token: "kcont",
        label: "clover review count",
    },
    SortOrder {
        token: "krvgr",
        label: "clover rating",
    },
];

/// Product links on search pages
static DETAIL_LINK: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"/detail/(S\d+)").unwrap());

/// Status code the review API reports on success
const API_OK: i64 = 200;

/// Kyobo URL builders and extractors
#[derive(Debug, Clone)]
pub struct Kyobo {
    config: KyoboConfig,
}

impl Kyobo {
    pub fn new(config: KyoboConfig) -> Self {
        Self { config }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ReviewEnvelope {
    status_code: Option<i64>,
    result_message: Option<String>,
    data: Option<ReviewData>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ReviewData {
    #[serde(default)]
    review_list: Vec<ApiReview>,
    #[serde(default)]
    total_count: u64,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ApiReview {
    revw_rvgr: Option<Value>,
    revw_cntt: Option<String>,
    mmbr_id: Option<String>,
    cret_dttm: Option<String>,
}

impl ApiReview {
    fn into_record(self) -> Option<ReviewRecord> {
        let content = self.revw_cntt.unwrap_or_default().trim().to_string();
        if content.is_empty() {
            return None;
        }

        Some(ReviewRecord {
            rating: self.revw_rvgr.as_ref().and_then(rating_from_value),
            content,
            author: self.mmbr_id.unwrap_or_default(),
            date: self
                .cret_dttm
                .map(|d| d.chars().take(10).collect())
                .unwrap_or_default(),
        })
    }
}

/// Ratings arrive as numbers or numeric strings
fn rating_from_value(value: &Value) -> Option<u8> {
    let n = match value {
        Value::Number(n) => n.as_u64().or_else(|| n.as_f64().map(|f| f.round() as u64))?,
        Value::String(s) => first_number(s)?,
        _ => return None,
    };
    u8::try_from(n).ok()
}

impl Site for Kyobo {
    fn name(&self) -> &'static str {
        "kyobo"
    }

    fn sort_orders(&self) -> &'static [SortOrder] {
        SORT_ORDERS
    }

    fn listing_url(&self, query: &ListingQuery) -> Result<Url> {
        match query {
            ListingQuery::Keyword { text, order } => {
                let order = self.resolve_order(order.as_deref())?;
                let mut url = join_base(&self.config.search_url, "/search")?;
                url.query_pairs_mut()
                    .append_pair("keyword", text)
                    .append_pair("page", "1")
                    .append_pair("ra", order)
                    .append_pair("len", &self.config.search_page_size.to_string());
                Ok(url)
            }
            ListingQuery::NewArrivals { .. } | ListingQuery::FeaturedArrivals { .. } => {
                Err(self.unsupported("category listings"))
            }
        }
    }

    fn page_param(&self, _query: &ListingQuery) -> &'static str {
        "page"
    }

    /// Kyobo search pages carry no usable next-page marker; a page holding
    /// fewer products than requested is the last one.
    fn parse_listing(&self, body: &str) -> ListingPage {
        let document = Html::parse_document(body);
        let mut records = Vec::new();
        let mut anchors = 0usize;

        for link in all(document.root_element(), "a.prod_info") {
            let href = link.value().attr("href").unwrap_or("");
            let Some(caps) = DETAIL_LINK.captures(href) else {
                continue;
            };
            anchors += 1;

            let identifier = &caps[1];
            let title = first_text(link, &format!("span[id=\"cmdtName_{}\"]", identifier));
            if let Some(record) = ListingRecord::new(title, identifier) {
                records.push(record);
            }
        }

        ListingPage {
            has_next: anchors >= self.config.search_page_size as usize,
            records,
        }
    }

    fn review_url(&self, item_id: &str, page: u32) -> Result<Url> {
        let mut url = join_base(&self.config.product_url, "/api/review/list")?;
        url.query_pairs_mut()
            .append_pair("page", &page.to_string())
            .append_pair("pageLimit", &self.config.review_page_size.to_string())
            .append_pair("reviewSort", "001")
            .append_pair("revwPatrCode", "002")
            .append_pair("saleCmdtid", item_id);
        Ok(url)
    }

    fn review_page_size(&self) -> Option<usize> {
        Some(self.config.review_page_size as usize)
    }

    fn parse_reviews(&self, body: &str) -> Result<ReviewPage> {
        let envelope: ReviewEnvelope = serde_json::from_str(body)?;

        if envelope.status_code != Some(API_OK) {
            return Err(CrawlerError::Malformed(format!(
                "review API returned status {:?}: {}",
                envelope.status_code,
                envelope.result_message.unwrap_or_default()
            )));
        }

        let data = envelope.data.unwrap_or_default();
        let raw_count = data.review_list.len();
        let page_size = u64::from(self.config.review_page_size.max(1));
        let last_page = data.total_count.div_ceil(page_size).max(1);

        Ok(ReviewPage {
            reviews: data
                .review_list
                .into_iter()
                .filter_map(ApiReview::into_record)
                .collect(),
            raw_count,
            last_page: Some(u32::try_from(last_page).unwrap_or(u32::MAX)),
        })
    }
}
