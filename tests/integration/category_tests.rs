//! Category tree loading tests

use crate::common::{fetcher, html, test_config};
use shelfcrawl::{CategoryLoader, Yes24};
use std::fs;
use tempfile::TempDir;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer};

const CATEGORY_PAGE: &str = r#"<html><body><ul>
    <li id="category001"><a><em class="txt">국내도서</em></a></li>
    <li id="category001001"><a><em class="txt">경제 경영</em></a></li>
    <li id="category001001003"><a><em class="txt">마케팅</em></a></li>
    <li id="category001002"><a><em class="txt">소설</em></a></li>
    <li id="category001003"><a></a></li>
    <li id="category001009004"><a><em class="txt">고아</em></a></li>
</ul></body></html>"#;

const FOREIGN_CATEGORY_PAGE: &str = r#"<html><body><ul>
    <li id="category002"><a><em class="txt">외국도서</em></a></li>
    <li id="category002001"><a><em class="txt">영미소설</em></a></li>
</ul></body></html>"#;

async fn mount_categories(server: &MockServer, hits: u64) {
    mount_root(server, "001", CATEGORY_PAGE, hits).await;
}

async fn mount_root(server: &MockServer, root: &str, page: &str, hits: u64) {
    Mock::given(method("GET"))
        .and(path("/product/category/newproduct"))
        .and(query_param("categoryNumber", root))
        .respond_with(html(page))
        .expect(hits)
        .mount(server)
        .await;
}

#[tokio::test]
async fn test_build_then_reload_from_cache() {
    let server = MockServer::start().await;
    mount_categories(&server, 1).await;
    let dir = TempDir::new().unwrap();
    let cache_path = dir.path().join("categories_cache.json");

    let config = test_config(&server.uri());
    let site = Yes24::new(config.yes24.clone());
    let fetcher = fetcher(&config);
    let loader = CategoryLoader::new(&fetcher, &site, &cache_path);

    let built = loader.load("001", true).await.unwrap();
    assert!(loader.cache_file("001").exists());

    let reloaded = loader.load("001", true).await.unwrap();
    assert_eq!(reloaded, built);

    assert_eq!(built.len(), 5);
    assert!(built.get("001003").is_none());
    assert_eq!(
        built.get("001001003").unwrap().parent.as_deref(),
        Some("001001")
    );
    // 001009 is not listed, so the orphan hangs off the root
    assert_eq!(
        built.get("001009004").unwrap().parent.as_deref(),
        Some("001")
    );
    assert_eq!(built.roots().count(), 1);
}

#[tokio::test]
async fn test_no_cache_always_fetches() {
    let server = MockServer::start().await;
    mount_categories(&server, 2).await;
    let dir = TempDir::new().unwrap();
    let cache_path = dir.path().join("categories_cache.json");

    let config = test_config(&server.uri());
    let site = Yes24::new(config.yes24.clone());
    let fetcher = fetcher(&config);
    let loader = CategoryLoader::new(&fetcher, &site, &cache_path);

    let first = loader.load("001", false).await.unwrap();
    let second = loader.load("001", false).await.unwrap();
    assert_eq!(first, second);
    assert!(!loader.cache_file("001").exists());
}

#[tokio::test]
async fn test_corrupt_cache_is_rebuilt() {
    let server = MockServer::start().await;
    mount_categories(&server, 1).await;
    let dir = TempDir::new().unwrap();
    let cache_path = dir.path().join("categories_cache.json");

    let config = test_config(&server.uri());
    let site = Yes24::new(config.yes24.clone());
    let fetcher = fetcher(&config);
    let loader = CategoryLoader::new(&fetcher, &site, &cache_path);
    let cache_file = loader.cache_file("001");
    fs::write(&cache_file, "not json at all").unwrap();

    let tree = loader.load("001", true).await.unwrap();
    assert_eq!(tree.flat().get("001002").map(String::as_str), Some("소설"));

    // The rebuilt tree replaced the corrupt file
    let cached = fs::read_to_string(&cache_file).unwrap();
    assert!(cached.contains("마케팅"));
}

#[tokio::test]
async fn test_each_root_has_its_own_cache() {
    let server = MockServer::start().await;
    mount_categories(&server, 1).await;
    mount_root(&server, "002", FOREIGN_CATEGORY_PAGE, 1).await;
    let dir = TempDir::new().unwrap();
    let cache_path = dir.path().join("categories_cache.json");

    let config = test_config(&server.uri());
    let site = Yes24::new(config.yes24.clone());
    let fetcher = fetcher(&config);
    let loader = CategoryLoader::new(&fetcher, &site, &cache_path);

    let domestic = loader.load("001", true).await.unwrap();
    let foreign = loader.load("002", true).await.unwrap();
    assert!(domestic.get("001").is_some());
    assert!(foreign.get("002").is_some());
    assert!(foreign.get("001").is_none());
    assert_eq!(foreign.len(), 2);

    // Both roots now come from their own cache files
    assert_eq!(loader.load("001", true).await.unwrap(), domestic);
    assert_eq!(loader.load("002", true).await.unwrap(), foreign);
}
