//! Configuration module for shelfcrawl
//!
//! This module handles loading, parsing, and validating TOML configuration files.
//!
//! # Example
//!
//! ```no_run
//! use shelfcrawl::config::load_config;
//! use std::path::Path;
//!
//! let config = load_config(Path::new("shelfcrawl.toml")).unwrap();
//! println!("Page delay: {}ms", config.crawler.page_delay_ms);
//! ```

mod parser;
mod types;
mod validation;

// Re-export types
pub use types::{
    Config, CrawlerConfig, KyoboConfig, OutputConfig, UserAgentConfig, Yes24Config,
};

// Re-export parser functions
pub use parser::{compute_config_hash, load_config, load_config_with_hash};
pub use validation::validate;
