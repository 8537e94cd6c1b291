//! Listing pagination tests

use crate::common::{fetcher, html, mount_home, test_config, yes24_listing};
use shelfcrawl::crawler::collect_listing;
use shelfcrawl::{Kyobo, ListingQuery, Yes24};
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer};

async fn mount_search_page(server: &MockServer, page: &str, body: String, hits: u64) {
    Mock::given(method("GET"))
        .and(path("/product/search"))
        .and(query_param("page", page))
        .respond_with(html(body))
        .expect(hits)
        .mount(server)
        .await;
}

#[tokio::test]
async fn test_listing_stops_at_cap() {
    let server = MockServer::start().await;
    mount_home(&server).await;
    mount_search_page(
        &server,
        "1",
        yes24_listing(&[("1", "A"), ("2", "B"), ("3", "C")], true),
        1,
    )
    .await;
    mount_search_page(
        &server,
        "2",
        yes24_listing(&[("4", "D"), ("5", "E"), ("6", "F")], true),
        1,
    )
    .await;
    mount_search_page(&server, "3", yes24_listing(&[("7", "G")], false), 0).await;

    let config = test_config(&server.uri());
    let site = Yes24::new(config.yes24.clone());
    let results = collect_listing(
        &fetcher(&config),
        &site,
        &ListingQuery::keyword("rust"),
        4,
        &config.crawler,
    )
    .await
    .unwrap();

    assert_eq!(
        results.pairs(),
        vec![("A", "1"), ("B", "2"), ("C", "3"), ("D", "4")]
    );
}

#[tokio::test]
async fn test_empty_first_page_makes_one_request() {
    let server = MockServer::start().await;
    mount_home(&server).await;
    mount_search_page(&server, "1", yes24_listing(&[], true), 1).await;
    mount_search_page(&server, "2", yes24_listing(&[("1", "A")], false), 0).await;

    let config = test_config(&server.uri());
    let site = Yes24::new(config.yes24.clone());
    let results = collect_listing(
        &fetcher(&config),
        &site,
        &ListingQuery::keyword("nothing"),
        10,
        &config.crawler,
    )
    .await
    .unwrap();

    assert!(results.is_empty());
}

#[tokio::test]
async fn test_next_marker_on_first_page_only() {
    let server = MockServer::start().await;
    mount_home(&server).await;
    mount_search_page(
        &server,
        "1",
        yes24_listing(&[("1", "A"), ("2", "B"), ("3", "C")], true),
        1,
    )
    .await;
    mount_search_page(
        &server,
        "2",
        yes24_listing(&[("4", "D"), ("5", "E"), ("6", "F")], false),
        1,
    )
    .await;
    mount_search_page(&server, "3", yes24_listing(&[("7", "G")], false), 0).await;

    let config = test_config(&server.uri());
    let site = Yes24::new(config.yes24.clone());
    let results = collect_listing(
        &fetcher(&config),
        &site,
        &ListingQuery::keyword("rust"),
        100,
        &config.crawler,
    )
    .await
    .unwrap();

    assert_eq!(results.len(), 6);
}

#[tokio::test]
async fn test_short_listing_keeps_page_order() {
    let server = MockServer::start().await;
    mount_home(&server).await;
    mount_search_page(&server, "1", yes24_listing(&[("1", "A"), ("2", "B")], true), 1).await;
    mount_search_page(&server, "2", yes24_listing(&[("3", "C")], false), 1).await;

    let config = test_config(&server.uri());
    let site = Yes24::new(config.yes24.clone());
    let results = collect_listing(
        &fetcher(&config),
        &site,
        &ListingQuery::keyword("abc"),
        10,
        &config.crawler,
    )
    .await
    .unwrap();

    assert_eq!(results.pairs(), vec![("A", "1"), ("B", "2"), ("C", "3")]);
}

#[tokio::test]
async fn test_repeated_item_keeps_position() {
    let server = MockServer::start().await;
    mount_home(&server).await;
    mount_search_page(&server, "1", yes24_listing(&[("1", "A"), ("2", "B")], true), 1).await;
    mount_search_page(
        &server,
        "2",
        yes24_listing(&[("1", "A (revised)"), ("3", "C")], false),
        1,
    )
    .await;

    let config = test_config(&server.uri());
    let site = Yes24::new(config.yes24.clone());
    let results = collect_listing(
        &fetcher(&config),
        &site,
        &ListingQuery::keyword("abc"),
        10,
        &config.crawler,
    )
    .await
    .unwrap();

    assert_eq!(
        results.pairs(),
        vec![("A (revised)", "1"), ("B", "2"), ("C", "3")]
    );
}

#[tokio::test]
async fn test_page_ceiling_bounds_endless_listing() {
    let server = MockServer::start().await;
    mount_home(&server).await;
    for page in 1..=3 {
        let id = page.to_string();
        let title = format!("T{}", page);
        mount_search_page(
            &server,
            &id,
            yes24_listing(&[(id.as_str(), title.as_str())], true),
            u64::from(page <= 2),
        )
        .await;
    }

    let mut config = test_config(&server.uri());
    config.crawler.max_pages = 2;
    let site = Yes24::new(config.yes24.clone());
    let results = collect_listing(
        &fetcher(&config),
        &site,
        &ListingQuery::keyword("loop"),
        100,
        &config.crawler,
    )
    .await
    .unwrap();

    assert_eq!(results.len(), 2);
}

#[tokio::test]
async fn test_category_listing_uses_page_number() {
    let server = MockServer::start().await;
    mount_home(&server).await;
    Mock::given(method("GET"))
        .and(path("/product/category/newproduct"))
        .and(query_param("categoryNumber", "001001"))
        .and(query_param("pageNumber", "1"))
        .respond_with(html(yes24_listing(&[("10", "New")], false)))
        .expect(1)
        .mount(&server)
        .await;

    let config = test_config(&server.uri());
    let site = Yes24::new(config.yes24.clone());
    let query = ListingQuery::NewArrivals {
        category: "001001".to_string(),
    };
    let results = collect_listing(&fetcher(&config), &site, &query, 5, &config.crawler)
        .await
        .unwrap();

    assert_eq!(results.pairs(), vec![("New", "10")]);
}

fn kyobo_listing(ids: &[&str]) -> String {
    let anchors: String = ids
        .iter()
        .map(|id| {
            format!(
                r#"<a class="prod_info" href="/detail/{}"><span id="cmdtName_{}">Book {}</span></a>"#,
                id, id, id
            )
        })
        .collect();
    format!("<html><body>{}</body></html>", anchors)
}

#[tokio::test]
async fn test_kyobo_short_page_ends_listing() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/search"))
        .and(query_param("page", "1"))
        .respond_with(html(kyobo_listing(&["S01", "S02"])))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/search"))
        .and(query_param("page", "2"))
        .respond_with(html(kyobo_listing(&["S03"])))
        .expect(1)
        .mount(&server)
        .await;

    let mut config = test_config(&server.uri());
    config.kyobo.search_page_size = 2;
    let site = Kyobo::new(config.kyobo.clone());
    let results = collect_listing(
        &fetcher(&config),
        &site,
        &ListingQuery::keyword("토익"),
        10,
        &config.crawler,
    )
    .await
    .unwrap();

    assert_eq!(
        results.pairs(),
        vec![("Book S01", "S01"), ("Book S02", "S02"), ("Book S03", "S03")]
    );
}

#[tokio::test]
async fn test_failed_page_keeps_collected_items() {
    let server = MockServer::start().await;
    mount_home(&server).await;
    mount_search_page(&server, "1", yes24_listing(&[("1", "A")], true), 1).await;
    Mock::given(method("GET"))
        .and(path("/product/search"))
        .and(query_param("page", "2"))
        .respond_with(wiremock::ResponseTemplate::new(503))
        .expect(1)
        .mount(&server)
        .await;

    let config = test_config(&server.uri());
    let site = Yes24::new(config.yes24.clone());
    let results = collect_listing(
        &fetcher(&config),
        &site,
        &ListingQuery::keyword("abc"),
        10,
        &config.crawler,
    )
    .await
    .unwrap();

    assert_eq!(results.pairs(), vec![("A", "1")]);
}
