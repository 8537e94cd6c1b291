//! Yes24 (www.yes24.com)
//!
//! Listings are server-rendered `li[data-goods-no]` items with an enabled
//! `.next` button when more pages follow. Reviews come from the community
//! module endpoint, which renders a page of `.reviewInfoGrp` blocks plus a
//! page-number strip used to learn the last page.

use crate::config::Yes24Config;
use crate::records::{BookDetail, ListingRecord, ReviewRecord};
use crate::sites::html::{all, first, first_number, first_text, stripped_text};
use crate::sites::{join_base, ListingPage, ListingQuery, ReviewPage, Site, SortOrder};
use crate::Result;
use regex::Regex;
use scraper::{ElementRef, Html};
use std::sync::LazyLock;
use url::Url;

const SORT_ORDERS: &[SortOrder] = &[
    SortOrder {
        token: "RELATION",
        label: "accuracy",
    },
    SortOrder {
        token: "RECENT",
        label: "newest",
    },
    SortOrder {
        token: "SINDEX_ONLY",
        label: "popularity",
    },
    SortOrder {
        token: "REG_DTS",
        label: "registration date",
    },
    SortOrder {
        token: "CONT_CNT",
        label: "rating",
    },
    SortOrder {
        token: "REVIE_CNT",
        label: "review count",
    },
];

static PAGE_COUNT: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(\d+)쪽").unwrap());

/// Breadcrumb labels kept in `category_path`
const MAX_CATEGORY_LEVELS: usize = 4;

/// Yes24 URL builders and extractors
#[derive(Debug, Clone)]
pub struct Yes24 {
    config: Yes24Config,
}

impl Yes24 {
    pub fn new(config: Yes24Config) -> Self {
        Self { config }
    }

    fn url(&self, path: &str) -> Result<Url> {
        join_base(&self.config.base_url, path)
    }
}

impl Site for Yes24 {
    fn name(&self) -> &'static str {
        "yes24"
    }

    fn sort_orders(&self) -> &'static [SortOrder] {
        SORT_ORDERS
    }

    fn prime_url(&self) -> Option<Url> {
        self.url("/").ok()
    }

    fn listing_url(&self, query: &ListingQuery) -> Result<Url> {
        let url = match query {
            ListingQuery::Keyword { text, order } => {
                let order = self.resolve_order(order.as_deref())?;
                let mut url = self.url("/product/search")?;
                url.query_pairs_mut()
                    .append_pair("domain", "ALL")
                    .append_pair("query", text)
                    .append_pair("page", "1")
                    .append_pair("size", &self.config.search_page_size.to_string())
                    .append_pair("order", order);
                url
            }
            ListingQuery::NewArrivals { category } => {
                let mut url = self.url("/product/category/newproduct")?;
                url.query_pairs_mut()
                    .append_pair("categoryNumber", category);
                url
            }
            ListingQuery::FeaturedArrivals { category } => {
                let mut url = self.url("/product/category/attentionnewproduct")?;
                url.query_pairs_mut()
                    .append_pair("categoryNumber", category);
                url
            }
        };
        Ok(url)
    }

    fn page_param(&self, query: &ListingQuery) -> &'static str {
        match query {
            ListingQuery::Keyword { .. } => "page",
            ListingQuery::NewArrivals { .. } | ListingQuery::FeaturedArrivals { .. } => {
                "pageNumber"
            }
        }
    }

    fn parse_listing(&self, body: &str) -> ListingPage {
        let document = Html::parse_document(body);
        let root = document.root_element();

        let records = all(root, "li[data-goods-no]")
            .into_iter()
            .filter_map(|item| {
                let identifier = item.value().attr("data-goods-no").unwrap_or("").trim();
                ListingRecord::new(first_text(item, "a.gd_name"), identifier)
            })
            .collect();

        let has_next = first(root, ".yesUI_pagen .next:not(.dim)").is_some();

        ListingPage { records, has_next }
    }

    fn review_url(&self, item_id: &str, page: u32) -> Result<Url> {
        let mut url = self.url(&format!(
            "/Product/communityModules/GoodsReviewList/{}",
            item_id
        ))?;
        url.query_pairs_mut()
            .append_pair("goodsSetYn", "N")
            .append_pair("Sort", "1")
            .append_pair("PageNumber", &page.to_string())
            .append_pair("Type", "ALL");
        Ok(url)
    }

    fn parse_reviews(&self, body: &str) -> Result<ReviewPage> {
        let document = Html::parse_document(body);
        let root = document.root_element();

        let items = all(root, ".reviewInfoGrp");
        let raw_count = items.len();
        let reviews = items.into_iter().filter_map(parse_review).collect();

        Ok(ReviewPage {
            reviews,
            raw_count,
            last_page: Some(last_review_page(root)),
        })
    }

    fn supports_details(&self) -> bool {
        true
    }

    fn detail_url(&self, item_id: &str) -> Result<Url> {
        self.url(&format!("/product/goods/{}", item_id))
    }

    fn parse_detail(&self, item_id: &str, body: &str) -> Result<BookDetail> {
        let document = Html::parse_document(body);
        let root = document.root_element();

        let mut detail = BookDetail::empty(item_id);
        detail.title = first_text(root, ".gd_name");

        if let Some(pub_area) = first(root, ".gd_pubArea") {
            detail.author = first_text(pub_area, ".gd_auth a");
            detail.publisher = first_text(pub_area, ".gd_pub a");
            detail.publication_date = first_text(pub_area, ".gd_date");
        }

        if let Some(spec) = first(root, "#infoset_specific") {
            let (pages, dimensions) = parse_spec_table(spec);
            detail.page_count = pages;
            detail.dimensions = dimensions;
        }

        if let Some(categories) = first(root, "#infoset_goodsCate") {
            detail.category_path = parse_category_path(categories);
        }

        if let Some(intro) = first(root, "#infoset_introduce") {
            detail.description = parse_description(intro);
        }

        Ok(detail)
    }

    fn category_url(&self, root_id: &str) -> Result<Url> {
        let mut url = self.url("/product/category/newproduct")?;
        url.query_pairs_mut().append_pair("categoryNumber", root_id);
        Ok(url)
    }

    fn parse_categories(&self, body: &str) -> Vec<(String, String)> {
        let document = Html::parse_document(body);

        let categories = all(document.root_element(), "li[id^=\"category\"]")
            .into_iter()
            .filter_map(|item| {
                let id = item.value().attr("id")?.strip_prefix("category")?;
                let name = first_text(item, "em.txt");
                if id.is_empty() || name.is_empty() {
                    return None;
                }
                Some((id.to_string(), name))
            })
            .collect();
        categories
    }
}

fn parse_review(item: ElementRef<'_>) -> Option<ReviewRecord> {
    let content = first_text(item, ".reviewInfoBot.origin .review_cont");
    if content.is_empty() {
        return None;
    }

    let rating = first(item, ".review_rating .total_rating")
        .and_then(|el| first_number(&stripped_text(el)))
        .and_then(|n| u8::try_from(n).ok());

    Some(ReviewRecord {
        rating,
        content,
        author: first_text(item, ".txt_id .lnk_id"),
        date: first_text(item, ".txt_date"),
    })
}

/// Largest number in the review page strip, 1 when there is no strip
fn last_review_page(root: ElementRef<'_>) -> u32 {
    all(root, ".yesUI_pagenS .num")
        .into_iter()
        .filter_map(|num| stripped_text(num).parse::<u32>().ok())
        .fold(1, u32::max)
}

/// Page count and dimensions from the "쪽수, 무게, 크기" row
///
/// The cell reads like `160쪽 | 350g | 215*285*20mm`: the page count is in the
/// first segment and the dimensions in the last.
fn parse_spec_table(spec: ElementRef<'_>) -> (String, String) {
    let mut pages = String::new();
    let mut dimensions = String::new();

    for row in all(spec, "tr") {
        let (Some(th), Some(td)) = (first(row, "th"), first(row, "td")) else {
            continue;
        };

        let header = stripped_text(th);
        if !header.contains("쪽수") && !header.contains("무게") {
            continue;
        }

        let value = stripped_text(td);
        let parts: Vec<&str> = value.split('|').collect();

        pages = parts
            .first()
            .and_then(|segment| PAGE_COUNT.captures(segment))
            .map(|caps| caps[1].to_string())
            .unwrap_or_default();

        if parts.len() >= 2 {
            dimensions = parts[parts.len() - 1].trim().to_string();
        }
    }

    (pages, dimensions)
}

/// First breadcrumb path, de-duplicated and capped at four levels
fn parse_category_path(section: ElementRef<'_>) -> String {
    let mut parts: Vec<String> = Vec::new();

    for link in all(section, "a") {
        let text = stripped_text(link);
        if text.is_empty() || parts.contains(&text) {
            continue;
        }
        parts.push(text);
        if parts.len() >= MAX_CATEGORY_LEVELS {
            break;
        }
    }

    parts.join(" > ")
}

fn parse_description(intro: ElementRef<'_>) -> String {
    match first(intro, ".infoWrap_txtInner") {
        Some(inner) => match first(inner, "textarea") {
            Some(textarea) => stripped_text(textarea),
            None => stripped_text(inner),
        },
        None => stripped_text(intro)
            .replacen("책소개", "", 1)
            .trim()
            .to_string(),
    }
}
