//! Collection errors

use bte_model::TreeFormatError;
use std::path::PathBuf;

/// Errors raised by [`Collection`](crate::Collection)
#[derive(Debug, thiserror::Error)]
pub enum CollectionError {
    /// No tree with this filename or name in the category
    #[error("the requested tree {name} could not be found in category {category}")]
    TreeNotFound { category: String, name: String },

    /// IO error reading or writing the collection
    #[error("io error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// File is not valid JSON
    #[error("json error in {path}: {source}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// File is JSON but not a tree document
    #[error("the tree at {path} is not a valid tree: {source}")]
    Format {
        path: PathBuf,
        #[source]
        source: TreeFormatError,
    },
}

impl CollectionError {
    /// Create tree not found error
    pub fn tree_not_found(category: impl Into<String>, name: impl Into<String>) -> Self {
        Self::TreeNotFound {
            category: category.into(),
            name: name.into(),
        }
    }

    /// Create IO error for path
    pub fn io_error(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    /// Create JSON error for path
    pub fn json_error(path: impl Into<PathBuf>, source: serde_json::Error) -> Self {
        Self::Json {
            path: path.into(),
            source,
        }
    }

    /// Create format error for path
    pub fn format_error(path: impl Into<PathBuf>, source: TreeFormatError) -> Self {
        Self::Format {
            path: path.into(),
            source,
        }
    }
}

/// Result type alias for collection operations
pub type CollectionResult<T> = Result<T, CollectionError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display() {
        let err = CollectionError::tree_not_found("roles", "Striker.json");
        assert_eq!(
            err.to_string(),
            "the requested tree Striker.json could not be found in category roles"
        );

        let err = CollectionError::format_error(
            "json/roles/Bad.json",
            TreeFormatError::missing("Bad", "data"),
        );
        assert!(err.to_string().starts_with("the tree at json/roles/Bad.json is not a valid tree"));
    }
}
