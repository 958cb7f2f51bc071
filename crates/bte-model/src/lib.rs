//! BTE Model
//!
//! Data model for behaviour trees as they are stored on disk by the editor.
//!
//! # Core Types
//!
//! - **Node**: one behaviour tree node (id, title, free-form attributes, ordered child ids)
//! - **Tree**: a named arena of nodes with a designated root
//! - **NodeTypes**: registry of node types per category, backed by CSV files
//! - **Settings**: explicit editor configuration
//!
//! # Example
//!
//! ```rust,ignore
//! use bte_model::{Node, Tree};
//!
//! let tree = Tree::new("Attack", "root")
//!     .with_node(Node::new("root", "Sequence").with_child("kick"))
//!     .with_node(Node::new("kick", "Kick"));
//!
//! let round_trip = Tree::from_json(&tree.to_json())?;
//! assert_eq!(round_trip, tree);
//! ```

#![warn(missing_docs)]
#![warn(unreachable_pub)]

pub mod error;
pub mod node;
pub mod node_types;
pub mod settings;
pub mod tree;

pub use error::{
    ModelError, ModelResult, NodeError, NodeTypeError, SettingsError, TreeError, TreeFormatError,
};
pub use node::{Node, ID_ALPHABET, PROPERTIES_KEY, ROLE_PROPERTY};
pub use node_types::{NodeTypeRecord, NodeTypes};
pub use settings::Settings;
pub use tree::Tree;

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Prelude module for common imports
pub mod prelude {
    //! Common imports for working with the model
    pub use crate::error::{NodeError, TreeError, TreeFormatError};
    pub use crate::node::Node;
    pub use crate::node_types::NodeTypes;
    pub use crate::settings::Settings;
    pub use crate::tree::Tree;
}
