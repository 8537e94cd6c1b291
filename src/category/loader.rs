//! Category tree loading with an optional JSON cache

use crate::category::{cache, CategoryTree};
use crate::crawler::Fetcher;
use crate::sites::Site;
use crate::Result;
use std::path::{Path, PathBuf};

/// Loads category trees from a site, reusing a cached copy when allowed
///
/// Each root is cached in its own file beside the configured path: with
/// `categories_cache.json` configured, root `001` lives in
/// `categories_cache_001.json`.
pub struct CategoryLoader<'a> {
    fetcher: &'a Fetcher,
    site: &'a dyn Site,
    cache_path: PathBuf,
}

impl<'a> CategoryLoader<'a> {
    pub fn new(fetcher: &'a Fetcher, site: &'a dyn Site, cache_path: impl Into<PathBuf>) -> Self {
        Self {
            fetcher,
            site,
            cache_path: cache_path.into(),
        }
    }

    /// Cache file holding the tree under `root_id`
    pub fn cache_file(&self, root_id: &str) -> PathBuf {
        keyed_path(&self.cache_path, root_id)
    }

    /// Returns the category tree under `root_id`
    ///
    /// With `use_cache`, an existing cache file is returned as-is and a freshly
    /// built tree is written back. A cache that cannot be read is rebuilt, and
    /// a failed write only logs a warning.
    pub async fn load(&self, root_id: &str, use_cache: bool) -> Result<CategoryTree> {
        let cache_file = self.cache_file(root_id);

        if use_cache && cache_file.exists() {
            match cache::load(&cache_file) {
                Ok(tree) => {
                    tracing::info!(
                        "Loaded {} categories from {}",
                        tree.len(),
                        cache_file.display()
                    );
                    return Ok(tree);
                }
                Err(e) => tracing::warn!("Ignoring unreadable category cache: {}", e),
            }
        }

        let url = self.site.category_url(root_id)?;
        let body = self.fetcher.get_text(&url).await?;
        let tree = CategoryTree::from_entries(self.site.parse_categories(&body));
        tracing::info!(
            "Built {} {} categories under {}",
            tree.len(),
            self.site.name(),
            root_id
        );

        if use_cache {
            match cache::save(&cache_file, &tree) {
                Ok(()) => tracing::debug!("Cached categories at {}", cache_file.display()),
                Err(e) => tracing::warn!("Failed to cache categories: {}", e),
            }
        }

        Ok(tree)
    }
}

/// `dir/name.ext` becomes `dir/name_<root_id>.ext`
fn keyed_path(path: &Path, root_id: &str) -> PathBuf {
    let stem = path
        .file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_else(|| "categories_cache".to_string());
    let file_name = match path.extension() {
        Some(ext) => format!("{}_{}.{}", stem, root_id, ext.to_string_lossy()),
        None => format!("{}_{}", stem, root_id),
    };
    path.with_file_name(file_name)
}
