//! BTE Collection
//!
//! Loads a directory of behaviour tree files into memory, filed by category,
//! and writes them back. Writing always verifies first; a tree that fails
//! verification is never persisted.
//!
//! # Example
//!
//! ```rust,ignore
//! use bte_collection::Collection;
//!
//! let collection = Collection::from_path("json", true)?;
//! let errors = collection.write_collection(None);
//! assert!(errors.is_empty());
//! ```

#![warn(missing_docs)]
#![warn(unreachable_pub)]

pub mod collection;
pub mod error;
pub mod fs;

pub use collection::{Collection, TreeMap};
pub use error::{CollectionError, CollectionResult};
pub use fs::{read_json, write_json};

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
