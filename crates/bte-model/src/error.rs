//! Error types for the behaviour tree data model
//!
//! Two families live here:
//! - Malformed input (tree files, nodes, node-type records) raised by the
//!   parsing constructors. A malformed file is not a tree at all.
//! - Not-found conditions raised by mutation APIs. These are recoverable and
//!   the caller decides whether to log and continue or propagate.

use std::path::PathBuf;

/// Errors raised by [`Node`](crate::Node) parsing and mutation
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum NodeError {
    /// Node JSON is missing a required field or has a field of the wrong type
    #[error("malformed node: {0}")]
    Malformed(String),

    /// Child id is not in the node's children list
    #[error("node {node} has no child {child}")]
    ChildNotFound { node: String, child: String },

    /// Attribute key is not present on the node
    #[error("node {node} has no attribute '{key}'")]
    AttributeNotFound { node: String, key: String },

    /// Property key is not present in the node's `properties` map
    #[error("node {node} has no property '{key}'")]
    PropertyNotFound { node: String, key: String },
}

impl NodeError {
    /// Create malformed node error
    pub fn malformed(reason: impl Into<String>) -> Self {
        Self::Malformed(reason.into())
    }

    /// Check if this is a not-found condition rather than malformed input
    #[inline]
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        !matches!(self, Self::Malformed(_))
    }
}

/// Errors raised while parsing a tree document
///
/// Parsing is fail-fast: the first failed check is reported and no partial
/// tree is built.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TreeFormatError {
    /// Document root is not a JSON object
    #[error("tree document is not a JSON object")]
    NotAnObject,

    /// Required field is absent
    #[error("the \"{field}\" attribute in tree {tree} is missing")]
    MissingField { tree: String, field: String },

    /// Field is present but has the wrong JSON type
    #[error("the \"{field}\" attribute in tree {tree} is of type {actual} instead of {expected}")]
    WrongType {
        tree: String,
        field: String,
        expected: &'static str,
        actual: &'static str,
    },

    /// `data.trees` must contain exactly one element
    #[error("the \"trees\" array in tree {tree} has length {len}, expected 1")]
    TreesLength { tree: String, len: usize },

    /// `nodes` must not be empty
    #[error("the \"nodes\" map in tree {tree} is empty")]
    EmptyNodes { tree: String },

    /// A node entry failed to parse
    #[error("node '{key}' in tree {tree}: {source}")]
    Node {
        tree: String,
        key: String,
        #[source]
        source: NodeError,
    },
}

impl TreeFormatError {
    /// Create missing field error
    pub fn missing(tree: impl Into<String>, field: impl Into<String>) -> Self {
        Self::MissingField {
            tree: tree.into(),
            field: field.into(),
        }
    }

    /// Create wrong type error
    pub fn wrong_type(
        tree: impl Into<String>,
        field: impl Into<String>,
        expected: &'static str,
        actual: &'static str,
    ) -> Self {
        Self::WrongType {
            tree: tree.into(),
            field: field.into(),
            expected,
            actual,
        }
    }
}

/// Errors raised by [`Tree`](crate::Tree) subtree operations
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TreeError {
    /// Node id does not exist in the tree
    #[error("node {node} does not exist in tree {tree}")]
    NodeNotFound { tree: String, node: String },
}

impl TreeError {
    /// Create node not found error
    pub fn node_not_found(tree: impl Into<String>, node: impl Into<String>) -> Self {
        Self::NodeNotFound {
            tree: tree.into(),
            node: node.into(),
        }
    }
}

/// Errors raised by the node-type registry
#[derive(Debug, thiserror::Error)]
pub enum NodeTypeError {
    /// Record is empty or has an empty type name
    #[error("invalid node type {0:?}")]
    Invalid(Vec<String>),

    /// IO error reading or writing a tabular file
    #[error("io error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Tabular file could not be parsed or written
    #[error("csv error on {path}: {source}")]
    Csv {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },
}

impl NodeTypeError {
    /// Create IO error for path
    pub fn io_error(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    /// Create CSV error for path
    pub fn csv_error(path: impl Into<PathBuf>, source: csv::Error) -> Self {
        Self::Csv {
            path: path.into(),
            source,
        }
    }
}

/// Errors raised by the settings provider
#[derive(Debug, thiserror::Error)]
pub enum SettingsError {
    /// No setting with this name
    #[error("invalid setting '{0}'")]
    NotFound(String),

    /// IO error reading or writing the settings file
    #[error("io error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Settings document or value has the wrong shape
    #[error("settings json error: {0}")]
    Json(#[from] serde_json::Error),
}

impl SettingsError {
    /// Create IO error for path
    pub fn io_error(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

/// Combined model error
#[derive(Debug, thiserror::Error)]
pub enum ModelError {
    #[error("node error: {0}")]
    Node(#[from] NodeError),

    #[error("tree format error: {0}")]
    TreeFormat(#[from] TreeFormatError),

    #[error("tree error: {0}")]
    Tree(#[from] TreeError),

    #[error("node type error: {0}")]
    NodeType(#[from] NodeTypeError),

    #[error("settings error: {0}")]
    Settings(#[from] SettingsError),
}

/// Result type alias for model operations
pub type ModelResult<T> = Result<T, ModelError>;

/// Name of a JSON value's type, for error messages
#[must_use]
pub(crate) fn json_type_name(value: &serde_json::Value) -> &'static str {
    match value {
        serde_json::Value::Null => "null",
        serde_json::Value::Bool(_) => "bool",
        serde_json::Value::Number(_) => "number",
        serde_json::Value::String(_) => "string",
        serde_json::Value::Array(_) => "array",
        serde_json::Value::Object(_) => "object",
    }
}
