//! BTE Verify
//!
//! Decides whether a behaviour tree is well formed.
//!
//! Graph-shape checks (root, cycles, unconnected nodes) need only the tree.
//! Domain checks (Strategy -> Tactic -> Role layering, composite/decorator
//! arity, ROLE inheritance) also read the node-type registry and look up other
//! trees through a [`TreeCatalog`].
//!
//! # Example
//!
//! ```rust,ignore
//! use bte_verify::{verify_tree, EmptyCatalog, VerifyOptions};
//!
//! let violations = verify_tree(&EmptyCatalog, &node_types, &tree, VerifyOptions::default());
//! for violation in &violations {
//!     eprintln!("{violation}");
//! }
//! ```

#![warn(missing_docs)]
#![warn(unreachable_pub)]

pub mod catalog;
pub mod engine;
pub mod violation;

pub use catalog::{EmptyCatalog, TreeCatalog};
pub use engine::{
    check_category_structure, check_composites_and_decorators, check_role_inheritance,
    check_root_validity, verify_mathematical_properties, verify_tree, VerifyOptions, ROLES,
    STRATEGIES, TACTICS,
};
pub use violation::{Layer, Violation};

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
