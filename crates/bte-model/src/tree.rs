//! Behaviour trees and their file format
//!
//! A [`Tree`] is an arena of [`Node`]s keyed by id plus a designated root.
//! Edges are child id strings, so the structure can be inconsistent while it
//! is being edited (dangling root, dangling children, cycles). Catching that
//! is the verifier's job, not the data structure's.
//!
//! # File format
//!
//! ```text
//! {
//!   "name": "<tree name>",
//!   "data": {
//!     "trees": [
//!       { "title": "<tree name>", "root": "<node id>", "nodes": { "<id>": { ... } } }
//!     ]
//!   }
//! }
//! ```

use crate::error::{json_type_name, NodeError, TreeError, TreeFormatError};
use crate::node::{Node, ID_ALPHABET, PROPERTIES_KEY, ROLE_PROPERTY};
use serde_json::{json, Map, Value};
use std::collections::{BTreeMap, HashSet};
use tracing::{debug, warn};

/// Placeholder tree name used in errors raised before `name` is known
const UNNAMED: &str = "<unnamed>";

/// Fresh-id attempts at one size before the id is made one character longer
const ID_ATTEMPTS_PER_SIZE: usize = 16;

/// A named, rooted structure of nodes
///
/// An empty `root` means "no root". Every node stored under key `k` has
/// `id == k`.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Tree {
    /// Tree name (`name` at file level, `title` at the nested level)
    pub name: String,
    /// Root node id, empty when the tree has no root
    pub root: String,
    /// Nodes keyed by id
    pub nodes: BTreeMap<String, Node>,
}

impl Tree {
    /// Create an empty tree
    #[inline]
    #[must_use]
    pub fn new(name: impl Into<String>, root: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            root: root.into(),
            nodes: BTreeMap::new(),
        }
    }

    /// Add a node, builder style
    #[inline]
    #[must_use]
    pub fn with_node(mut self, node: Node) -> Self {
        self.add_node(node);
        self
    }

    /// Parse a tree document
    ///
    /// Checks, in order: `name` → `data` → `data.trees` (exactly one
    /// element) → `trees[0]` → `root`, `title`, `nodes` (non-empty), then
    /// every node. The first failure is returned.
    ///
    /// # Errors
    /// Returns [`TreeFormatError`] describing the first failed check.
    pub fn from_json(value: &Value) -> Result<Self, TreeFormatError> {
        let Value::Object(file) = value else {
            return Err(TreeFormatError::NotAnObject);
        };

        let name = match file.get("name") {
            Some(Value::String(name)) => name.clone(),
            Some(other) => {
                return Err(TreeFormatError::wrong_type(
                    UNNAMED,
                    "name",
                    "string",
                    json_type_name(other),
                ))
            }
            None => return Err(TreeFormatError::missing(UNNAMED, "name")),
        };

        let data = field(&name, file, "data")?;
        let data = as_object(&name, "data", data)?;

        let trees = field(&name, data, "trees")?;
        let Value::Array(trees) = trees else {
            return Err(TreeFormatError::wrong_type(
                name,
                "trees",
                "array",
                json_type_name(trees),
            ));
        };
        if trees.len() != 1 {
            return Err(TreeFormatError::TreesLength {
                tree: name,
                len: trees.len(),
            });
        }
        let inner = as_object(&name, "trees[0]", &trees[0])?;

        let root = as_string(&name, "root", field(&name, inner, "root")?)?;
        let title = as_string(&name, "title", field(&name, inner, "title")?)?;
        let nodes = as_object(&name, "nodes", field(&name, inner, "nodes")?)?;
        if nodes.is_empty() {
            return Err(TreeFormatError::EmptyNodes { tree: name });
        }
        if title != name {
            debug!(tree = %name, title = %title, "tree title differs from file name");
        }

        let mut parsed = BTreeMap::new();
        for (key, value) in nodes {
            let node = Node::from_json(value).map_err(|source| TreeFormatError::Node {
                tree: name.clone(),
                key: key.clone(),
                source,
            })?;
            if node.id != *key {
                return Err(TreeFormatError::Node {
                    tree: name,
                    key: key.clone(),
                    source: NodeError::malformed(format!(
                        "id {} does not match its key",
                        node.id
                    )),
                });
            }
            parsed.insert(key.clone(), node);
        }

        Ok(Self {
            name,
            root: root.to_string(),
            nodes: parsed,
        })
    }

    /// Serialize to the file format; the inverse of [`Tree::from_json`]
    #[must_use]
    pub fn to_json(&self) -> Value {
        let nodes: Map<String, Value> = self
            .nodes
            .iter()
            .map(|(id, node)| (id.clone(), node.to_json()))
            .collect();
        json!({
            "name": self.name,
            "data": {
                "trees": [{
                    "title": self.name,
                    "root": self.root,
                    "nodes": nodes,
                }]
            }
        })
    }

    /// Number of nodes
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Check if the tree has no nodes
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Check if a node id exists
    #[inline]
    #[must_use]
    pub fn contains(&self, id: &str) -> bool {
        self.nodes.contains_key(id)
    }

    /// Get a node by id
    #[inline]
    #[must_use]
    pub fn get_node(&self, id: &str) -> Option<&Node> {
        self.nodes.get(id)
    }

    /// Get a mutable node by id
    #[inline]
    pub fn get_node_mut(&mut self, id: &str) -> Option<&mut Node> {
        self.nodes.get_mut(id)
    }

    /// Root node, if `root` names an existing node
    #[inline]
    #[must_use]
    pub fn root_node(&self) -> Option<&Node> {
        self.nodes.get(&self.root)
    }

    /// Insert a node, overwriting any node with the same id
    #[inline]
    pub fn add_node(&mut self, node: Node) {
        self.nodes.insert(node.id.clone(), node);
    }

    /// Remove a node if the stored node equals `node`
    ///
    /// Removing the root resets `root` to empty. Returns `false` if not found.
    pub fn remove_node(&mut self, node: &Node) -> bool {
        if self.nodes.get(&node.id) != Some(node) {
            warn!(tree = %self.name, node = %node.id, "attempted to remove non-existent node");
            return false;
        }
        self.remove_node_by_id(&node.id)
    }

    /// Remove a node by id, without touching its children
    ///
    /// Removing the root resets `root` to empty. Returns `false` if not found.
    pub fn remove_node_by_id(&mut self, id: &str) -> bool {
        if self.nodes.remove(id).is_none() {
            warn!(tree = %self.name, node = id, "attempted to remove non-existent node");
            return false;
        }
        if self.root == id {
            self.root.clear();
        }
        true
    }

    /// Remove a node and its whole descendant subtree
    ///
    /// Each id is visited at most once, so cycles cannot loop; child ids that
    /// do not exist are skipped. Returns `false` only if `id` itself is
    /// missing.
    pub fn remove_node_and_children_by_id(&mut self, id: &str) -> bool {
        if !self.nodes.contains_key(id) {
            warn!(tree = %self.name, node = id, "attempted to remove non-existent node");
            return false;
        }
        let mut doomed = self.descendants(id);
        doomed.push(id.to_string());
        for node_id in &doomed {
            self.nodes.remove(node_id);
            if self.root == *node_id {
                self.root.clear();
            }
        }
        true
    }

    /// Node that lists `id` among its children, if any
    #[must_use]
    pub fn find_parent(&self, id: &str) -> Option<&Node> {
        self.nodes
            .values()
            .find(|node| node.children.iter().any(|child| child == id))
    }

    /// Ids of every node below `id`, depth-first pre-order, excluding `id`
    ///
    /// Visited-set guarded; missing children are skipped with a warning.
    #[must_use]
    pub fn descendants(&self, id: &str) -> Vec<String> {
        let mut seen: HashSet<&str> = HashSet::from([id]);
        let mut out = Vec::new();
        let mut stack: Vec<&str> = match self.nodes.get(id) {
            Some(node) => node.children.iter().rev().map(String::as_str).collect(),
            None => return out,
        };

        while let Some(current) = stack.pop() {
            if !seen.insert(current) {
                continue;
            }
            let Some(node) = self.nodes.get(current) else {
                warn!(tree = %self.name, node = current, "child node does not exist");
                continue;
            };
            out.push(current.to_string());
            stack.extend(node.children.iter().rev().map(String::as_str));
        }
        out
    }

    /// Copy the subtree of `source` rooted at `start` below node `below`
    ///
    /// `start` defaults to `source.root`. Every copied node gets a fresh id
    /// of (at least) `id_size` characters that is unused in this tree.
    /// Returns the id of the copied subtree root.
    ///
    /// # Errors
    /// Returns [`TreeError::NodeNotFound`] if `below` is not in this tree or
    /// `start` is not in `source`.
    pub fn add_subtree(
        &mut self,
        source: &Tree,
        below: &str,
        start: Option<&str>,
        id_size: usize,
    ) -> Result<String, TreeError> {
        if !self.nodes.contains_key(below) {
            return Err(TreeError::node_not_found(&self.name, below));
        }
        let start = start.unwrap_or(&source.root);
        if !source.nodes.contains_key(start) {
            return Err(TreeError::node_not_found(&source.name, start));
        }

        let mut seen: HashSet<&str> = HashSet::new();
        let mut stack: Vec<(&str, String)> = vec![(start, below.to_string())];
        let mut copied_root = None;

        while let Some((source_id, parent_id)) = stack.pop() {
            if !seen.insert(source_id) {
                continue;
            }
            let Some(original) = source.nodes.get(source_id) else {
                warn!(tree = %source.name, node = source_id, "child node does not exist");
                continue;
            };

            let new_id = self.fresh_id(id_size);
            let mut copy = original.clone();
            copy.id.clone_from(&new_id);
            copy.children.clear();
            self.add_node(copy);
            if let Some(parent) = self.nodes.get_mut(&parent_id) {
                parent.add_child(new_id.clone());
            }
            copied_root.get_or_insert_with(|| new_id.clone());

            for child in original.children.iter().rev() {
                stack.push((child.as_str(), new_id.clone()));
            }
        }

        Ok(copied_root.unwrap_or_default())
    }

    /// Remove every descendant of `id` and clear its children; `id` stays
    ///
    /// # Errors
    /// Returns [`TreeError::NodeNotFound`] if `id` is not in the tree.
    pub fn remove_subtree(&mut self, id: &str) -> Result<(), TreeError> {
        if !self.nodes.contains_key(id) {
            return Err(TreeError::node_not_found(&self.name, id));
        }
        for node_id in self.descendants(id) {
            self.nodes.remove(&node_id);
            if self.root == node_id {
                self.root.clear();
            }
        }
        if let Some(node) = self.nodes.get_mut(id) {
            node.children.clear();
        }
        Ok(())
    }

    /// Replace the subtree below `below` with a copy of `source` from `start`
    ///
    /// # Errors
    /// Returns [`TreeError::NodeNotFound`] if either anchor is missing; the
    /// tree is left untouched in that case.
    pub fn update_subtree(
        &mut self,
        source: &Tree,
        below: &str,
        start: Option<&str>,
        id_size: usize,
    ) -> Result<String, TreeError> {
        let start_id = start.unwrap_or(&source.root);
        if !source.nodes.contains_key(start_id) {
            return Err(TreeError::node_not_found(&source.name, start_id));
        }
        self.remove_subtree(below)?;
        self.add_subtree(source, below, Some(start_id), id_size)
    }

    /// Set `properties.ROLE = role` on every descendant of `id`
    ///
    /// # Errors
    /// Returns [`TreeError::NodeNotFound`] if `id` is not in the tree.
    pub fn propagate_role(&mut self, id: &str, role: &str) -> Result<(), TreeError> {
        if !self.nodes.contains_key(id) {
            return Err(TreeError::node_not_found(&self.name, id));
        }
        for node_id in self.descendants(id) {
            if let Some(node) = self.nodes.get_mut(&node_id) {
                node.add_property(ROLE_PROPERTY, role);
            }
        }
        Ok(())
    }

    /// Remove `properties.ROLE` from every descendant of `id` that has it
    ///
    /// # Errors
    /// Returns [`TreeError::NodeNotFound`] if `id` is not in the tree.
    pub fn remove_propagation(&mut self, id: &str) -> Result<(), TreeError> {
        if !self.nodes.contains_key(id) {
            return Err(TreeError::node_not_found(&self.name, id));
        }
        for node_id in self.descendants(id) {
            let properties = self
                .nodes
                .get_mut(&node_id)
                .and_then(|node| node.attributes.get_mut(PROPERTIES_KEY))
                .and_then(Value::as_object_mut);
            if let Some(properties) = properties {
                properties.remove(ROLE_PROPERTY);
            }
        }
        Ok(())
    }

    fn fresh_id(&self, id_size: usize) -> String {
        let mut size = id_size.max(1);
        loop {
            for _ in 0..ID_ATTEMPTS_PER_SIZE {
                let id = Node::generate_id(size, ID_ALPHABET);
                if !self.nodes.contains_key(&id) {
                    return id;
                }
            }
            size += 1;
        }
    }
}

fn field<'a>(
    tree: &str,
    object: &'a Map<String, Value>,
    name: &str,
) -> Result<&'a Value, TreeFormatError> {
    object
        .get(name)
        .ok_or_else(|| TreeFormatError::missing(tree, name))
}

fn as_object<'a>(
    tree: &str,
    name: &str,
    value: &'a Value,
) -> Result<&'a Map<String, Value>, TreeFormatError> {
    value
        .as_object()
        .ok_or_else(|| TreeFormatError::wrong_type(tree, name, "object", json_type_name(value)))
}

fn as_string<'a>(tree: &str, name: &str, value: &'a Value) -> Result<&'a str, TreeFormatError> {
    value
        .as_str()
        .ok_or_else(|| TreeFormatError::wrong_type(tree, name, "string", json_type_name(value)))
}
