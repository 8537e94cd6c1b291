//! Review collection tests

use crate::common::{fetcher, html, json_body, test_config, yes24_reviews};
use serde_json::json;
use shelfcrawl::crawler::Collector;
use shelfcrawl::{Kyobo, Yes24};
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer};

const YES24_REVIEWS: &str = "/Product/communityModules/GoodsReviewList/1001";

async fn mount_yes24_review_page(server: &MockServer, page: &str, body: String, hits: u64) {
    Mock::given(method("GET"))
        .and(path(YES24_REVIEWS))
        .and(query_param("PageNumber", page))
        .respond_with(html(body))
        .expect(hits)
        .mount(server)
        .await;
}

#[tokio::test]
async fn test_review_cap_across_pages() {
    let server = MockServer::start().await;
    mount_yes24_review_page(
        &server,
        "1",
        yes24_reviews(&[("u1", "r1"), ("u2", "r2"), ("u3", "r3")], 4),
        1,
    )
    .await;
    mount_yes24_review_page(
        &server,
        "2",
        yes24_reviews(&[("u4", "r4"), ("u5", "r5"), ("u6", "r6")], 4),
        1,
    )
    .await;
    for page in ["3", "4"] {
        mount_yes24_review_page(&server, page, yes24_reviews(&[("x", "x")], 4), 0).await;
    }

    let config = test_config(&server.uri());
    let site = Yes24::new(config.yes24.clone());
    let fetcher = fetcher(&config);
    let collector = Collector::new(&fetcher, &site, &config.crawler);

    let reviews = collector.collect_reviews("1001", 5).await;
    let contents: Vec<&str> = reviews.iter().map(|r| r.content.as_str()).collect();
    assert_eq!(contents, vec!["r1", "r2", "r3", "r4", "r5"]);
    assert_eq!(reviews[0].author, "u1");
    assert_eq!(reviews[0].rating, Some(10));
    assert_eq!(reviews[0].date, "2024-03-01");
}

#[tokio::test]
async fn test_reviews_stop_at_last_page() {
    let server = MockServer::start().await;
    mount_yes24_review_page(&server, "1", yes24_reviews(&[("u1", "r1")], 2), 1).await;
    mount_yes24_review_page(&server, "2", yes24_reviews(&[("u2", "r2")], 2), 1).await;
    mount_yes24_review_page(&server, "3", yes24_reviews(&[("u3", "r3")], 2), 0).await;

    let config = test_config(&server.uri());
    let site = Yes24::new(config.yes24.clone());
    let fetcher = fetcher(&config);
    let collector = Collector::new(&fetcher, &site, &config.crawler);

    let reviews = collector.collect_reviews("1001", 50).await;
    assert_eq!(reviews.len(), 2);
}

#[tokio::test]
async fn test_reviews_without_content_are_skipped() {
    let server = MockServer::start().await;
    mount_yes24_review_page(
        &server,
        "1",
        yes24_reviews(&[("u1", "first"), ("u2", "   "), ("u3", "third")], 1),
        1,
    )
    .await;

    let config = test_config(&server.uri());
    let site = Yes24::new(config.yes24.clone());
    let fetcher = fetcher(&config);
    let collector = Collector::new(&fetcher, &site, &config.crawler);

    let reviews = collector.collect_reviews("1001", 50).await;
    let authors: Vec<&str> = reviews.iter().map(|r| r.author.as_str()).collect();
    assert_eq!(authors, vec!["u1", "u3"]);
}

#[tokio::test]
async fn test_reviews_without_content_do_not_fill_cap() {
    let server = MockServer::start().await;
    mount_yes24_review_page(
        &server,
        "1",
        yes24_reviews(&[("u1", "r1"), ("u2", " "), ("u3", " ")], 2),
        1,
    )
    .await;
    mount_yes24_review_page(
        &server,
        "2",
        yes24_reviews(&[("u4", "r2"), ("u5", "r3")], 2),
        1,
    )
    .await;

    let config = test_config(&server.uri());
    let site = Yes24::new(config.yes24.clone());
    let fetcher = fetcher(&config);
    let collector = Collector::new(&fetcher, &site, &config.crawler);

    let reviews = collector.collect_reviews("1001", 2).await;
    let contents: Vec<&str> = reviews.iter().map(|r| r.content.as_str()).collect();
    assert_eq!(contents, vec!["r1", "r2"]);
}

fn kyobo_review_page(start: usize, count: usize, total: usize) -> serde_json::Value {
    let list: Vec<serde_json::Value> = (start..start + count)
        .map(|n| {
            json!({
                "revwRvgr": 8,
                "revwCntt": format!("review {}", n),
                "mmbrId": format!("member{}", n),
                "cretDttm": "2024-02-03 10:11:12"
            })
        })
        .collect();
    json!({
        "statusCode": 200,
        "resultMessage": "OK",
        "data": { "totalCount": total, "reviewList": list }
    })
}

async fn mount_kyobo_review_page(
    server: &MockServer,
    page: &str,
    body: serde_json::Value,
    hits: u64,
) {
    Mock::given(method("GET"))
        .and(path("/api/review/list"))
        .and(query_param("saleCmdtid", "S000001"))
        .and(query_param("page", page))
        .respond_with(json_body(body))
        .expect(hits)
        .mount(server)
        .await;
}

#[tokio::test]
async fn test_kyobo_api_error_stops_collection() {
    let server = MockServer::start().await;
    mount_kyobo_review_page(&server, "1", kyobo_review_page(1, 3, 9), 1).await;
    mount_kyobo_review_page(
        &server,
        "2",
        json!({"statusCode": 500, "resultMessage": "server busy"}),
        1,
    )
    .await;
    mount_kyobo_review_page(&server, "3", kyobo_review_page(7, 3, 9), 0).await;

    let mut config = test_config(&server.uri());
    config.kyobo.review_page_size = 3;
    let site = Kyobo::new(config.kyobo.clone());
    let fetcher = fetcher(&config);
    let collector = Collector::new(&fetcher, &site, &config.crawler);

    let reviews = collector.collect_reviews("S000001", 50).await;
    assert_eq!(reviews.len(), 3);
    assert_eq!(reviews[0].date, "2024-02-03");
    assert_eq!(reviews[2].author, "member3");
}

#[tokio::test]
async fn test_kyobo_short_page_is_last() {
    let server = MockServer::start().await;
    mount_kyobo_review_page(&server, "1", kyobo_review_page(1, 2, 100), 1).await;
    mount_kyobo_review_page(&server, "2", kyobo_review_page(3, 3, 100), 0).await;

    let mut config = test_config(&server.uri());
    config.kyobo.review_page_size = 3;
    let site = Kyobo::new(config.kyobo.clone());
    let fetcher = fetcher(&config);
    let collector = Collector::new(&fetcher, &site, &config.crawler);

    let reviews = collector.collect_reviews("S000001", 50).await;
    assert_eq!(reviews.len(), 2);
}

#[tokio::test]
async fn test_kyobo_total_count_bounds_pages() {
    let server = MockServer::start().await;
    mount_kyobo_review_page(&server, "1", kyobo_review_page(1, 3, 6), 1).await;
    mount_kyobo_review_page(&server, "2", kyobo_review_page(4, 3, 6), 1).await;
    mount_kyobo_review_page(&server, "3", kyobo_review_page(7, 3, 6), 0).await;

    let mut config = test_config(&server.uri());
    config.kyobo.review_page_size = 3;
    let site = Kyobo::new(config.kyobo.clone());
    let fetcher = fetcher(&config);
    let collector = Collector::new(&fetcher, &site, &config.crawler);

    let reviews = collector.collect_reviews("S000001", 50).await;
    assert_eq!(reviews.len(), 6);
    assert_eq!(reviews[5].content, "review 6");
}
