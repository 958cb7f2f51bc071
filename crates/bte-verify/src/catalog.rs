//! Cross-tree lookups used by the structural checks

use bte_model::Tree;
use std::collections::BTreeMap;

/// Read-only view of trees filed by category
///
/// Implementors only provide [`TreeCatalog::trees`]; the lookups are linear
/// scans over it.
pub trait TreeCatalog {
    /// Every `(category, filename, tree)` in the catalog
    fn trees(&self) -> Box<dyn Iterator<Item = (&str, &str, &Tree)> + '_>;

    /// `(root_id, tree_name)` for every tree filed under `category`
    fn root_nodes_by_category(&self, category: &str) -> Vec<(&str, &str)> {
        self.trees()
            .filter(|(c, _, _)| *c == category)
            .map(|(_, _, tree)| (tree.root.as_str(), tree.name.as_str()))
            .collect()
    }

    /// Category of the first tree whose root is `node_id`
    fn category_of_root(&self, node_id: &str) -> Option<&str> {
        self.trees()
            .find(|(_, _, tree)| tree.root == node_id)
            .map(|(category, _, _)| category)
    }

    /// First tree whose `name` is `name`, in any category
    fn tree_by_name(&self, name: &str) -> Option<&Tree> {
        self.trees()
            .find(|(_, _, tree)| tree.name == name)
            .map(|(_, _, tree)| tree)
    }
}

impl TreeCatalog for BTreeMap<String, BTreeMap<String, Tree>> {
    fn trees(&self) -> Box<dyn Iterator<Item = (&str, &str, &Tree)> + '_> {
        Box::new(self.iter().flat_map(|(category, trees)| {
            trees
                .iter()
                .map(move |(filename, tree)| (category.as_str(), filename.as_str(), tree))
        }))
    }
}

/// Catalog with no trees
#[derive(Debug, Clone, Copy, Default)]
pub struct EmptyCatalog;

impl TreeCatalog for EmptyCatalog {
    fn trees(&self) -> Box<dyn Iterator<Item = (&str, &str, &Tree)> + '_> {
        Box::new(std::iter::empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bte_test_utils::{layered_catalog, ROLES, STRATEGIES, TACTICS};

    #[test]
    fn root_lookup() {
        let catalog = layered_catalog();
        assert_eq!(catalog.root_nodes_by_category(STRATEGIES), vec![("sr", "Attack")]);
        assert!(catalog.root_nodes_by_category("keeper").is_empty());
        assert_eq!(catalog.category_of_root("tr"), Some(TACTICS));
        assert_eq!(catalog.category_of_root("rs"), Some(ROLES));
        assert_eq!(catalog.category_of_root("rk"), None);
    }

    #[test]
    fn name_lookup() {
        let catalog = layered_catalog();
        assert_eq!(catalog.tree_by_name("Offend").map(|t| t.root.as_str()), Some("tr"));
        assert!(catalog.tree_by_name("Offend.json").is_none());
        assert!(EmptyCatalog.tree_by_name("Offend").is_none());
    }
}
