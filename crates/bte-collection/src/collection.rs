//! Trees filed by category, backed by a directory
//!
//! ```text
//! <jsons>/
//!   strategies/Attack.json
//!   tactics/Offend.json
//!   roles/Striker.json
//! ```
//!
//! Trees are keyed by filename (including `.json`) within their category.

use crate::error::{CollectionError, CollectionResult};
use crate::fs::{read_json, write_json};
use bte_model::{NodeTypes, Settings, Tree};
use bte_verify::{verify_mathematical_properties, verify_tree, TreeCatalog, Violation, VerifyOptions};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, error, info, warn};

const TREE_EXTENSION: &str = "json";

/// Category → filename → tree
pub type TreeMap = BTreeMap<String, BTreeMap<String, Tree>>;

/// In-memory collection of trees
#[derive(Debug, Clone, Default)]
pub struct Collection {
    collection: TreeMap,
    path: Option<PathBuf>,
    node_types: NodeTypes,
    settings: Settings,
}

/// Equality compares trees and source path only
impl PartialEq for Collection {
    fn eq(&self, other: &Self) -> bool {
        self.collection == other.collection && self.path == other.path
    }
}

impl Collection {
    /// Create collection from in-memory trees
    #[must_use]
    pub fn new(collection: TreeMap) -> Self {
        Self {
            collection,
            ..Self::default()
        }
    }

    /// Load a collection directory with default settings
    ///
    /// With `verify`, trees failing the graph-shape checks are left out.
    ///
    /// # Errors
    /// Returns [`CollectionError::Io`] if `path` cannot be listed.
    pub fn from_path(path: impl AsRef<Path>, verify: bool) -> CollectionResult<Self> {
        let mut collection = Self::default();
        collection.build_collection(Some(path.as_ref()), verify)?;
        Ok(collection)
    }

    /// Load the configured collection directory
    ///
    /// # Errors
    /// Returns [`CollectionError::Io`] if the directory cannot be listed.
    pub fn from_settings(
        settings: &Settings,
        node_types: &NodeTypes,
        verify: bool,
    ) -> CollectionResult<Self> {
        let mut collection = Self {
            node_types: node_types.clone(),
            settings: settings.clone(),
            ..Self::default()
        };
        collection.build_collection(None, verify)?;
        Ok(collection)
    }

    /// With node-type registry used for domain checks
    #[inline]
    #[must_use]
    pub fn with_node_types(mut self, node_types: NodeTypes) -> Self {
        self.node_types = node_types;
        self
    }

    /// With settings supplying the default path and categories
    #[inline]
    #[must_use]
    pub fn with_settings(mut self, settings: Settings) -> Self {
        self.settings = settings;
        self
    }

    /// Node-type registry
    #[inline]
    #[must_use]
    pub fn node_types(&self) -> &NodeTypes {
        &self.node_types
    }

    /// Replace the contents with the trees found under `path`
    ///
    /// `path` defaults to the configured json folder. Every default category
    /// exists afterwards, even if it has no directory. Hidden entries (`.` or
    /// `_` prefix), non-JSON files and files that fail to parse are skipped
    /// with a log line.
    ///
    /// # Errors
    /// Returns [`CollectionError::Io`] only if `path` itself cannot be listed;
    /// problems below it are logged and skipped.
    pub fn build_collection(&mut self, path: Option<&Path>, verify: bool) -> CollectionResult<()> {
        let root = path.map_or_else(|| self.settings.default_json_folder.clone(), Path::to_path_buf);
        let entries = fs::read_dir(&root).map_err(|e| CollectionError::io_error(&root, e))?;

        let mut collection: TreeMap = self
            .settings
            .default_collection_categories
            .iter()
            .map(|category| (category.clone(), BTreeMap::new()))
            .collect();

        for entry in entries {
            let entry = entry.map_err(|e| CollectionError::io_error(&root, e))?;
            let dir = entry.path();
            let category = entry.file_name().to_string_lossy().into_owned();
            if !dir.is_dir() {
                continue;
            }
            if category.starts_with('.') || category.starts_with('_') {
                debug!(dir = %dir.display(), "skipping hidden directory");
                continue;
            }

            let trees = collection.entry(category).or_default();
            let files = match fs::read_dir(&dir) {
                Ok(files) => files,
                Err(e) => {
                    error!(dir = %dir.display(), error = %e, "could not read category directory");
                    continue;
                }
            };
            for file in files.flatten() {
                let path = file.path();
                let filename = file.file_name().to_string_lossy().into_owned();
                if !path.is_file() {
                    continue;
                }
                if filename.starts_with('.') {
                    info!(file = %path.display(), "hidden file, skipping");
                    continue;
                }
                if path.extension().and_then(|e| e.to_str()) != Some(TREE_EXTENSION) {
                    info!(file = %path.display(), "not a .json file, skipping");
                    continue;
                }

                let tree = match load_tree(&path) {
                    Ok(tree) => tree,
                    Err(e) => {
                        error!(file = %path.display(), error = %e, "not a valid tree, not loading");
                        continue;
                    }
                };
                if verify && !verify_mathematical_properties(&tree).is_empty() {
                    warn!(
                        tree = %tree.name,
                        file = %path.display(),
                        "unable to verify tree, not adding it to the collection"
                    );
                    continue;
                }
                trees.insert(filename, tree);
            }
        }

        self.collection = collection;
        self.path = Some(root);
        Ok(())
    }

    /// Write every tree below `path`, one directory per category
    ///
    /// `path` defaults to [`Collection::jsons_path`]. Each tree gets the
    /// graph-shape checks only. Failures are collected, never fatal.
    pub fn write_collection(&self, path: Option<&Path>) -> Vec<String> {
        let root = path.unwrap_or_else(|| self.jsons_path());
        let mut errors = Vec::new();

        for (category, trees) in &self.collection {
            let dir = root.join(category);
            if let Err(e) = fs::create_dir_all(&dir) {
                let message = format!("Could not create directory {}: {e}", dir.display());
                error!("{message}");
                errors.push(message);
                continue;
            }
            for (filename, tree) in trees {
                errors.extend(self.write_tree(tree, &dir.join(filename), None, true));
            }
        }
        errors
    }

    /// Verify and write one tree
    ///
    /// Nothing is written if verification finds anything; the violations
    /// are returned followed by a summary line. A write failure becomes one
    /// entry in the result.
    pub fn write_tree(
        &self,
        tree: &Tree,
        path: &Path,
        category: Option<&str>,
        math_only: bool,
    ) -> Vec<String> {
        let violations = self.verify_tree(tree, category, math_only);
        if !violations.is_empty() {
            let mut errors: Vec<String> = violations.iter().map(ToString::to_string).collect();
            let message = format!(
                "Tree {} could not be written as there were errors during verification",
                tree.name
            );
            error!("{message}");
            errors.push(message);
            return errors;
        }

        match write_json(path, &tree.to_json()) {
            Ok(()) => Vec::new(),
            Err(e) => {
                let message = format!("An exception occurred when writing tree {}: {e}", tree.name);
                error!("{message}");
                vec![message]
            }
        }
    }

    /// Verify a tree against this collection
    #[must_use]
    pub fn verify_tree(&self, tree: &Tree, category: Option<&str>, math_only: bool) -> Vec<Violation> {
        verify_tree(
            self,
            &self.node_types,
            tree,
            VerifyOptions {
                category,
                math_only,
            },
        )
    }

    /// Add or replace a tree, creating the category if needed
    pub fn add_tree(&mut self, category: &str, filename: &str, tree: Tree) {
        self.collection
            .entry(category.to_string())
            .or_default()
            .insert(filename.to_string(), tree);
    }

    /// Remove a tree by filename
    ///
    /// # Errors
    /// Returns [`CollectionError::TreeNotFound`] if there is no such tree.
    pub fn remove_tree(&mut self, category: &str, filename: &str) -> CollectionResult<Tree> {
        self.collection
            .get_mut(category)
            .and_then(|trees| trees.remove(filename))
            .ok_or_else(|| {
                warn!(category, filename, "requested tree to be removed could not be found");
                CollectionError::tree_not_found(category, filename)
            })
    }

    /// Remove the first tree in `category` whose name is `name`
    ///
    /// # Errors
    /// Returns [`CollectionError::TreeNotFound`] if there is no such tree.
    pub fn remove_tree_by_name(&mut self, category: &str, name: &str) -> CollectionResult<Tree> {
        let filename = self.collection.get(category).and_then(|trees| {
            trees
                .iter()
                .find(|(_, tree)| tree.name == name)
                .map(|(filename, _)| filename.clone())
        });
        match filename {
            Some(filename) => self.remove_tree(category, &filename),
            None => {
                warn!(category, name, "requested tree to be removed could not be found");
                Err(CollectionError::tree_not_found(category, name))
            }
        }
    }

    /// Tree by category and filename
    #[inline]
    #[must_use]
    pub fn get_tree(&self, category: &str, filename: &str) -> Option<&Tree> {
        self.collection.get(category)?.get(filename)
    }

    /// First tree with this name in any category
    #[must_use]
    pub fn get_tree_by_name(&self, name: &str) -> Option<&Tree> {
        let tree = self.tree_by_name(name);
        if tree.is_none() {
            warn!(name, "requested tree does not exist");
        }
        tree
    }

    /// `(root_id, tree_name)` for every tree in `category`
    #[inline]
    #[must_use]
    pub fn get_root_nodes_by_category(&self, category: &str) -> Vec<(&str, &str)> {
        self.root_nodes_by_category(category)
    }

    /// Category of the tree whose root is `node_id`
    #[inline]
    #[must_use]
    pub fn get_category_from_node(&self, node_id: &str) -> Option<&str> {
        self.category_of_root(node_id)
    }

    /// Sorted filenames per category
    #[must_use]
    pub fn categories_and_filenames(&self) -> BTreeMap<&str, Vec<&str>> {
        self.collection
            .iter()
            .map(|(category, trees)| {
                (category.as_str(), trees.keys().map(String::as_str).collect())
            })
            .collect()
    }

    /// Directory the collection was loaded from, else the configured default
    #[must_use]
    pub fn jsons_path(&self) -> &Path {
        self.path
            .as_deref()
            .unwrap_or(&self.settings.default_json_folder)
    }

    /// Category names
    pub fn categories(&self) -> impl Iterator<Item = &str> {
        self.collection.keys().map(String::as_str)
    }

    /// Trees of one category by filename
    #[inline]
    #[must_use]
    pub fn trees_in(&self, category: &str) -> Option<&BTreeMap<String, Tree>> {
        self.collection.get(category)
    }

    /// Number of trees over all categories
    #[must_use]
    pub fn len(&self) -> usize {
        self.collection.values().map(BTreeMap::len).sum()
    }

    /// Check if there are no trees
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Underlying map
    #[inline]
    #[must_use]
    pub fn as_map(&self) -> &TreeMap {
        &self.collection
    }
}

impl TreeCatalog for Collection {
    fn trees(&self) -> Box<dyn Iterator<Item = (&str, &str, &Tree)> + '_> {
        self.collection.trees()
    }
}

fn load_tree(path: &Path) -> CollectionResult<Tree> {
    let value = read_json(path)?;
    Tree::from_json(&value).map_err(|e| CollectionError::format_error(path, e))
}
