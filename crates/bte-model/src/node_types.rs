//! Node-type registry
//!
//! Maps a node-type category (`composites`, `decorators`, ...) to an ordered
//! list of records. A record is the type name followed by the property keys
//! an instance of that type requires. On disk every category is one CSV file
//! without a header row, one record per row.

use crate::error::NodeTypeError;
use crate::node::{Node, ID_ALPHABET};
use crate::settings::Settings;
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{error, info, warn};

/// Composite node types (one or more children)
pub const COMPOSITES: &str = "composites";
/// Decorator node types (exactly one child)
pub const DECORATORS: &str = "decorators";
/// Condition node types
pub const CONDITIONS: &str = "conditions";
/// Skill node types
pub const SKILLS: &str = "skills";
/// Anything else
pub const OTHER: &str = "other";

const TABULAR_EXTENSION: &str = "csv";

/// Node-type record: type name followed by required property keys
pub type NodeTypeRecord = Vec<String>;

/// Registry of node types per category
///
/// Type names are not unique: the same name may appear in several
/// categories, or twice in one.
#[derive(Debug, Clone, Default)]
pub struct NodeTypes {
    node_types: BTreeMap<String, Vec<NodeTypeRecord>>,
    path: Option<PathBuf>,
}

/// Equality ignores the source path
impl PartialEq for NodeTypes {
    fn eq(&self, other: &Self) -> bool {
        self.node_types == other.node_types
    }
}

impl NodeTypes {
    /// Create registry from in-memory records
    #[must_use]
    pub fn new(node_types: BTreeMap<String, Vec<NodeTypeRecord>>) -> Self {
        Self {
            node_types,
            path: None,
        }
    }

    /// Load every `*.csv` file directly inside `dir`
    ///
    /// The file stem becomes the category. Hidden files and other extensions
    /// are skipped. Invalid rows are skipped with a warning.
    ///
    /// # Errors
    /// Returns [`NodeTypeError`] if the directory or a file cannot be read.
    pub fn from_csv(dir: impl AsRef<Path>) -> Result<Self, NodeTypeError> {
        let dir = dir.as_ref();
        let entries = fs::read_dir(dir).map_err(|e| NodeTypeError::io_error(dir, e))?;

        let mut node_types = BTreeMap::new();
        for entry in entries {
            let entry = entry.map_err(|e| NodeTypeError::io_error(dir, e))?;
            let path = entry.path();
            let file_name = entry.file_name().to_string_lossy().into_owned();

            if file_name.starts_with('.') {
                info!(file = %path.display(), "skipping hidden file");
                continue;
            }
            if !path.is_file()
                || path.extension().and_then(|e| e.to_str()) != Some(TABULAR_EXTENSION)
            {
                info!(file = %path.display(), "skipping non-tabular file");
                continue;
            }
            let Some(category) = path.file_stem().and_then(|s| s.to_str()) else {
                continue;
            };

            let records = read_records(&path)?;
            node_types.insert(category.to_string(), records);
        }

        Ok(Self {
            node_types,
            path: Some(dir.to_path_buf()),
        })
    }

    /// Load from the folder configured in `settings`
    ///
    /// # Errors
    /// See [`NodeTypes::from_csv`].
    pub fn from_settings(settings: &Settings) -> Result<Self, NodeTypeError> {
        Self::from_csv(&settings.default_node_types_folder)
    }

    /// Folder the registry was loaded from
    #[inline]
    #[must_use]
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// Write one CSV file per category into `dir`
    ///
    /// `dir` defaults to the folder the registry was loaded from, then to
    /// `fallback`.
    ///
    /// # Errors
    /// Returns [`NodeTypeError`] on any IO or encoding failure.
    pub fn write(&self, dir: Option<&Path>, fallback: &Path) -> Result<(), NodeTypeError> {
        let dir = dir.or(self.path.as_deref()).unwrap_or(fallback);
        fs::create_dir_all(dir).map_err(|e| NodeTypeError::io_error(dir, e))?;

        for (category, records) in &self.node_types {
            let path = dir.join(format!("{category}.{TABULAR_EXTENSION}"));
            let mut writer = csv::WriterBuilder::new()
                .has_headers(false)
                .flexible(true)
                .from_path(&path)
                .map_err(|e| NodeTypeError::csv_error(&path, e))?;
            for record in records {
                writer
                    .write_record(record)
                    .map_err(|e| NodeTypeError::csv_error(&path, e))?;
            }
            writer
                .flush()
                .map_err(|e| NodeTypeError::io_error(&path, e))?;
        }
        Ok(())
    }

    /// Check that a record is usable
    ///
    /// Any non-empty record is valid, including one whose type name is empty.
    ///
    /// # Errors
    /// Returns [`NodeTypeError::Invalid`] if the record is empty.
    pub fn check_node_type_validity(record: &[String]) -> Result<(), NodeTypeError> {
        if record.is_empty() {
            error!(record = ?record, "node type is not valid and cannot be used");
            return Err(NodeTypeError::Invalid(Vec::new()));
        }
        Ok(())
    }

    /// Stamp out a node of this type
    ///
    /// The node gets a fresh id and a `properties` map with every required
    /// key mapped to `""`.
    ///
    /// # Errors
    /// Returns [`NodeTypeError::Invalid`] for an invalid record, or for one
    /// with an empty type name since nodes need a title.
    pub fn create_node_from_node_type(
        record: &[String],
        id_size: usize,
    ) -> Result<Node, NodeTypeError> {
        Self::check_node_type_validity(record)?;
        if record[0].is_empty() {
            error!(record = ?record, "node type has no name, cannot create a node from it");
            return Err(NodeTypeError::Invalid(record.to_vec()));
        }
        let properties: Map<String, Value> = record[1..]
            .iter()
            .map(|key| (key.clone(), Value::String(String::new())))
            .collect();
        Ok(Node::new(Node::generate_id(id_size, ID_ALPHABET), &record[0])
            .with_attribute(crate::node::PROPERTIES_KEY, properties))
    }

    /// Append a record to `category`, creating the category if needed
    pub fn add_node_type(&mut self, category: &str, name: &str, keys: &[String]) {
        let mut record = vec![name.to_string()];
        record.extend_from_slice(keys);
        self.node_types
            .entry(category.to_string())
            .or_default()
            .push(record);
    }

    /// Remove the first record equal to `record` from `category`
    ///
    /// A missing category or record is logged and ignored.
    pub fn remove_node_type(&mut self, category: &str, record: &[String]) {
        let removed = self.node_types.get_mut(category).is_some_and(|records| {
            records
                .iter()
                .position(|r| r == record)
                .map(|index| records.remove(index))
                .is_some()
        });
        if !removed {
            warn!(
                category,
                record = ?record,
                "node type could not be found and removed"
            );
        }
    }

    /// Replace the first record equal to `old` in `category` with `updated`
    ///
    /// # Errors
    /// Returns [`NodeTypeError::Invalid`] if `updated` is invalid; nothing is
    /// changed in that case. A missing `old` record is not an error.
    pub fn update_node_type(
        &mut self,
        category: &str,
        old: &[String],
        updated: NodeTypeRecord,
    ) -> Result<(), NodeTypeError> {
        Self::check_node_type_validity(&updated)?;
        if let Some(slot) = self
            .node_types
            .get_mut(category)
            .and_then(|records| records.iter_mut().find(|r| r.as_slice() == old))
        {
            *slot = updated;
        } else {
            warn!(category, record = ?old, "node type could not be found and updated");
        }
        Ok(())
    }

    /// Add an empty category; no-op if it exists
    pub fn add_category(&mut self, category: &str) {
        self.node_types.entry(category.to_string()).or_default();
    }

    /// Remove a category and its records; no-op if absent
    pub fn remove_category(&mut self, category: &str) {
        if self.node_types.remove(category).is_none() {
            warn!(category, "category does not exist and cannot be removed");
        }
    }

    /// Every `(category, record)` whose type name is `name`
    #[must_use]
    pub fn get_node_type_by_name(&self, name: &str) -> Vec<(&str, &NodeTypeRecord)> {
        self.node_types
            .iter()
            .flat_map(|(category, records)| {
                records
                    .iter()
                    .filter(move |r| r.first().is_some_and(|n| n == name))
                    .map(move |r| (category.as_str(), r))
            })
            .collect()
    }

    /// Every `(category, record)` matching the node's title
    #[inline]
    #[must_use]
    pub fn get_node_type_by_node(&self, node: &Node) -> Vec<(&str, &NodeTypeRecord)> {
        self.get_node_type_by_name(&node.title)
    }

    /// Check whether `name` is registered under `category`
    #[must_use]
    pub fn is_of_category(&self, name: &str, category: &str) -> bool {
        self.node_types
            .get(category)
            .is_some_and(|records| records.iter().any(|r| r.first().is_some_and(|n| n == name)))
    }

    /// Category names, sorted
    pub fn categories(&self) -> impl Iterator<Item = &str> {
        self.node_types.keys().map(String::as_str)
    }

    /// Records of one category
    #[inline]
    #[must_use]
    pub fn records(&self, category: &str) -> Option<&[NodeTypeRecord]> {
        self.node_types.get(category).map(Vec::as_slice)
    }

    /// Full category → records map
    #[inline]
    #[must_use]
    pub fn as_map(&self) -> &BTreeMap<String, Vec<NodeTypeRecord>> {
        &self.node_types
    }
}

fn read_records(path: &Path) -> Result<Vec<NodeTypeRecord>, NodeTypeError> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_path(path)
        .map_err(|e| NodeTypeError::csv_error(path, e))?;

    let mut records = Vec::new();
    for row in reader.records() {
        let row = row.map_err(|e| NodeTypeError::csv_error(path, e))?;
        let record: NodeTypeRecord = row.iter().map(str::to_string).collect();
        // Nameless rows cannot be looked up, so they are not loaded.
        if NodeTypes::check_node_type_validity(&record).is_err() || record[0].is_empty() {
            warn!(file = %path.display(), record = ?record, "skipping invalid node type row");
            continue;
        }
        records.push(record);
    }
    Ok(records)
}
