//! Verification findings
//!
//! Each variant is one kind of defect; `Display` gives the message shown to
//! the user.

/// A single defect found in a tree
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Violation {
    /// Tree has no root set
    #[error("The tree {tree} does not have a root and cannot be validated")]
    NoRoot { tree: String },

    /// Root names a node that is not in the tree
    #[error("The root node with id {root} in tree {tree} does not exist.")]
    MissingRoot { tree: String, root: String },

    /// Child id names a node that is not in the tree
    #[error("Child {child} from node {node} in tree {tree} does not exist.")]
    DanglingChild {
        tree: String,
        node: String,
        child: String,
    },

    /// A node is reachable from itself
    #[error("Cycle found in tree {tree} at node {node} while verifying.")]
    Cycle { tree: String, node: String },

    /// A node is reached through more than one parent
    #[error("The node {node} in tree {tree} is reachable through more than one parent")]
    MultipleParents { tree: String, node: String },

    /// A node is not reachable from the root
    #[error("The node {node} is unconnected in tree {tree}")]
    Unconnected { tree: String, node: String },

    /// Root is not registered under the expected category
    #[error("Error in structure of tree {tree}, root node was supposed to be a {expected} but was a {}", .found.as_deref().unwrap_or("node of no category"))]
    WrongRootCategory {
        tree: String,
        expected: String,
        found: Option<String>,
    },

    /// A path passes the same layer twice
    #[error("Error in structure of tree {tree}, the path to node {node} encountered a {layer} node twice")]
    DuplicateLayer {
        tree: String,
        node: String,
        layer: Layer,
    },

    /// A leaf is reached without passing every layer
    #[error("Error in structure of tree {tree}, the path to leaf node {node} does not follow the Strategy -> Tactic -> Role pattern")]
    IncompleteLayers { tree: String, node: String },

    /// A leaf references a tree already on the current path
    #[error("Error in structure of tree {tree}, node {node} references tree {target} which is already on the path")]
    CircularReference {
        tree: String,
        node: String,
        target: String,
    },

    /// Decorator without exactly one child
    #[error("Error in structure of tree {tree}, node {node} is a decorator which should have 1 child, but it has {children} children")]
    DecoratorArity {
        tree: String,
        node: String,
        children: usize,
    },

    /// Composite without children
    #[error("Error in structure of tree {tree}, node {node} is a compositor and should have at least 1 child, but it has 0")]
    CompositeArity { tree: String, node: String },

    /// Node below a ROLE declaration has no properties
    #[error("Error in structure of tree {tree}, node {node} has no properties, but should inherit the {expected} ROLE property from parent")]
    MissingRole {
        tree: String,
        node: String,
        expected: String,
    },

    /// Node declares a ROLE different from the inherited one
    #[error("Error in structure of tree {tree}, node {node} has ROLE property {found}, but should inherit {expected} from parent")]
    RoleMismatch {
        tree: String,
        node: String,
        expected: String,
        found: String,
    },
}

impl Violation {
    /// Name of the tree the violation was found in
    #[must_use]
    pub fn tree(&self) -> &str {
        match self {
            Self::NoRoot { tree }
            | Self::MissingRoot { tree, .. }
            | Self::DanglingChild { tree, .. }
            | Self::Cycle { tree, .. }
            | Self::MultipleParents { tree, .. }
            | Self::Unconnected { tree, .. }
            | Self::WrongRootCategory { tree, .. }
            | Self::DuplicateLayer { tree, .. }
            | Self::IncompleteLayers { tree, .. }
            | Self::CircularReference { tree, .. }
            | Self::DecoratorArity { tree, .. }
            | Self::CompositeArity { tree, .. }
            | Self::MissingRole { tree, .. }
            | Self::RoleMismatch { tree, .. } => tree,
        }
    }

    /// Check if this violation is about graph shape rather than domain rules
    #[must_use]
    pub fn is_mathematical(&self) -> bool {
        matches!(
            self,
            Self::NoRoot { .. }
                | Self::MissingRoot { .. }
                | Self::DanglingChild { .. }
                | Self::Cycle { .. }
                | Self::MultipleParents { .. }
                | Self::Unconnected { .. }
        )
    }
}

/// Tree layer in the Strategy -> Tactic -> Role structure
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Layer {
    /// Tree filed under `strategies`
    Strategy,
    /// Tree filed under `tactics`, or a `Tactic` node
    Tactic,
    /// Tree filed under `roles`, a `Role` node or a Keeper
    Role,
}

impl Layer {
    pub(crate) const fn index(self) -> usize {
        match self {
            Self::Strategy => 0,
            Self::Tactic => 1,
            Self::Role => 2,
        }
    }
}

impl std::fmt::Display for Layer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::Strategy => "strategy",
            Self::Tactic => "tactic",
            Self::Role => "role",
        };
        f.write_str(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_name_tree_and_node() {
        let v = Violation::Cycle {
            tree: "Attack".to_string(),
            node: "b".to_string(),
        };
        assert_eq!(v.to_string(), "Cycle found in tree Attack at node b while verifying.");
        assert_eq!(v.tree(), "Attack");
        assert!(v.is_mathematical());

        let v = Violation::DuplicateLayer {
            tree: "Attack".to_string(),
            node: "t2".to_string(),
            layer: Layer::Tactic,
        };
        assert!(v.to_string().contains("encountered a tactic node twice"));
        assert!(!v.is_mathematical());
    }

    #[test]
    fn wrong_root_without_category() {
        let v = Violation::WrongRootCategory {
            tree: "Loose".to_string(),
            expected: "tactics".to_string(),
            found: None,
        };
        assert!(v.to_string().ends_with("supposed to be a tactics but was a node of no category"));
    }
}
