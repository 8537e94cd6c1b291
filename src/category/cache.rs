//! On-disk JSON cache for category trees
//!
//! The whole tree is stored and restored wholesale; there is no expiry.

use crate::category::CategoryTree;
use crate::{CrawlerError, Result};
use std::fs;
use std::path::Path;

/// Reads a cached tree from `path`
///
/// # Errors
///
/// Returns `CrawlerError::Io` when the file cannot be read and
/// `CrawlerError::Cache` when it does not decode as a category tree.
pub fn load(path: &Path) -> Result<CategoryTree> {
    let contents = fs::read_to_string(path)?;
    serde_json::from_str(&contents)
        .map_err(|e| CrawlerError::Cache(format!("{}: {}", path.display(), e)))
}

/// Writes `tree` to `path`, creating parent directories as needed
pub fn save(path: &Path, tree: &CategoryTree) -> Result<()> {
    if let Some(dir) = path.parent().filter(|dir| !dir.as_os_str().is_empty()) {
        fs::create_dir_all(dir)?;
    }

    let json = serde_json::to_string_pretty(tree)
        .map_err(|e| CrawlerError::Cache(format!("{}: {}", path.display(), e)))?;
    fs::write(path, json)?;
    Ok(())
}
