//! Category forest built from flat `(identifier, name)` pairs
//!
//! Category identifiers are hierarchical: each level appends a fixed-width
//! segment to its parent's identifier (`001` > `001001` > `001001003`).

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

/// Width of one identifier segment
pub const SEGMENT_WIDTH: usize = 3;

/// One category in the tree
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryNode {
    pub identifier: String,
    pub name: String,

    /// 1-based depth, one level per identifier segment
    pub depth: usize,

    /// Nearest registered ancestor, if any
    pub parent: Option<String>,

    pub children: BTreeSet<String>,
}

/// Identifier-ordered map of category nodes
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CategoryTree {
    nodes: BTreeMap<String, CategoryNode>,
}

impl CategoryTree {
    /// Builds the tree from `(identifier, name)` pairs
    ///
    /// A node's parent is its identifier minus the last segment. When that
    /// category was not listed, successively shorter prefixes are tried down
    /// to the first segment; if none is registered the node has no parent.
    /// A repeated identifier keeps the last name seen.
    pub fn from_entries<I, S, N>(entries: I) -> Self
    where
        I: IntoIterator<Item = (S, N)>,
        S: Into<String>,
        N: Into<String>,
    {
        let mut nodes: BTreeMap<String, CategoryNode> = BTreeMap::new();
        for (identifier, name) in entries {
            let identifier = identifier.into();
            let node = CategoryNode {
                depth: identifier.len() / SEGMENT_WIDTH,
                identifier: identifier.clone(),
                name: name.into(),
                parent: None,
                children: BTreeSet::new(),
            };
            nodes.insert(identifier, node);
        }

        let links: Vec<(String, String)> = nodes
            .keys()
            .filter_map(|id| {
                nearest_ancestor(id, |candidate| nodes.contains_key(candidate))
                    .map(|parent| (id.clone(), parent))
            })
            .collect();

        for (child, parent) in links {
            if let Some(node) = nodes.get_mut(&child) {
                node.parent = Some(parent.clone());
            }
            if let Some(node) = nodes.get_mut(&parent) {
                node.children.insert(child);
            }
        }

        Self { nodes }
    }

    pub fn get(&self, identifier: &str) -> Option<&CategoryNode> {
        self.nodes.get(identifier)
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn nodes(&self) -> impl Iterator<Item = &CategoryNode> {
        self.nodes.values()
    }

    /// Nodes without a parent, in identifier order
    pub fn roots(&self) -> impl Iterator<Item = &CategoryNode> {
        self.nodes.values().filter(|node| node.parent.is_none())
    }

    /// `{identifier: name}` view of every node
    pub fn flat(&self) -> BTreeMap<String, String> {
        self.nodes
            .iter()
            .map(|(id, node)| (id.clone(), node.name.clone()))
            .collect()
    }

    /// One line per node, ordered by depth then identifier
    ///
    /// Each line is indented two spaces per level below the first.
    pub fn render(&self) -> Vec<String> {
        let mut ordered: Vec<&CategoryNode> = self.nodes.values().collect();
        ordered.sort_by(|a, b| (a.depth, &a.identifier).cmp(&(b.depth, &b.identifier)));

        ordered
            .into_iter()
            .map(|node| {
                format!(
                    "{}{} ({})",
                    "  ".repeat(node.depth.saturating_sub(1)),
                    node.name,
                    node.identifier
                )
            })
            .collect()
    }
}

/// Longest proper prefix of `identifier`, cut at segment boundaries, that
/// satisfies `registered`
fn nearest_ancestor(identifier: &str, registered: impl Fn(&str) -> bool) -> Option<String> {
    let mut end = identifier.len().checked_sub(SEGMENT_WIDTH)?;
    while end >= SEGMENT_WIDTH {
        let candidate = identifier.get(..end)?;
        if registered(candidate) {
            return Some(candidate.to_string());
        }
        end -= SEGMENT_WIDTH;
    }
    None
}
