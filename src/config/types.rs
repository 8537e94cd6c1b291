use serde::Deserialize;

/// Main configuration structure for shelfcrawl
///
/// Every section is optional in the TOML file; missing sections and keys fall
/// back to the values that match the live bookstore sites.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub crawler: CrawlerConfig,
    #[serde(rename = "user-agent")]
    pub user_agent: UserAgentConfig,
    pub yes24: Yes24Config,
    pub kyobo: KyoboConfig,
    pub output: OutputConfig,
}

/// Pacing and limits shared by every pagination loop
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CrawlerConfig {
    /// Sleep between two listing or review pages (milliseconds)
    #[serde(rename = "page-delay-ms")]
    pub page_delay_ms: u64,

    /// Sleep after each item of a pipeline run (milliseconds)
    #[serde(rename = "item-delay-ms")]
    pub item_delay_ms: u64,

    /// Hard ceiling on pages fetched by a single pagination loop
    #[serde(rename = "max-pages")]
    pub max_pages: u32,

    /// Whole-request timeout (seconds)
    #[serde(rename = "request-timeout-secs")]
    pub request_timeout_secs: u64,

    /// Connect timeout (seconds)
    #[serde(rename = "connect-timeout-secs")]
    pub connect_timeout_secs: u64,
}

impl Default for CrawlerConfig {
    fn default() -> Self {
        Self {
            page_delay_ms: 500,
            item_delay_ms: 300,
            max_pages: 50,
            request_timeout_secs: 30,
            connect_timeout_secs: 10,
        }
    }
}

/// Static request headers sent with every request
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct UserAgentConfig {
    /// User-Agent header value
    pub value: String,

    /// Accept-Language header value
    #[serde(rename = "accept-language")]
    pub accept_language: String,
}

impl Default for UserAgentConfig {
    fn default() -> Self {
        Self {
            value: "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 \
                    (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36"
                .to_string(),
            accept_language: "ko-KR,ko;q=0.9,en-US;q=0.8,en;q=0.7".to_string(),
        }
    }
}

/// Yes24 endpoints
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Yes24Config {
    #[serde(rename = "base-url")]
    pub base_url: String,

    /// Results per search page (the site accepts 24, 40, 80 or 120)
    #[serde(rename = "search-page-size")]
    pub search_page_size: u32,
}

impl Default for Yes24Config {
    fn default() -> Self {
        Self {
            base_url: "https://www.yes24.com".to_string(),
            search_page_size: 40,
        }
    }
}

/// Kyobo endpoints
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct KyoboConfig {
    #[serde(rename = "search-url")]
    pub search_url: String,

    #[serde(rename = "product-url")]
    pub product_url: String,

    #[serde(rename = "search-page-size")]
    pub search_page_size: u32,

    /// `pageLimit` sent to the review API
    #[serde(rename = "review-page-size")]
    pub review_page_size: u32,
}

impl Default for KyoboConfig {
    fn default() -> Self {
        Self {
            search_url: "https://search.kyobobook.co.kr".to_string(),
            product_url: "https://product.kyobobook.co.kr".to_string(),
            search_page_size: 40,
            review_page_size: 50,
        }
    }
}

/// Output configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Directory receiving CSV exports
    #[serde(rename = "results-dir")]
    pub results_dir: String,

    /// JSON file caching category trees
    #[serde(rename = "category-cache-path")]
    pub category_cache_path: String,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            results_dir: "./results".to_string(),
            category_cache_path: "./categories_cache.json".to_string(),
        }
    }
}
