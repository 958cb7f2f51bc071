//! Testing utilities for BTE workspace
//!
//! Shared test fixtures: small trees with known defects, a standard node-type
//! registry and a layered Strategy -> Tactic -> Role catalog.

#![allow(missing_docs)]
#![allow(clippy::missing_panics_doc)]

use bte_model::node_types::{COMPOSITES, CONDITIONS, DECORATORS, OTHER, SKILLS};
use bte_model::{Node, NodeTypes, Tree};
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

pub type Catalog = BTreeMap<String, BTreeMap<String, Tree>>;

pub const STRATEGIES: &str = "strategies";
pub const TACTICS: &str = "tactics";
pub const ROLES: &str = "roles";
pub const KEEPER: &str = "keeper";

/// Registry used by the verifier tests
pub fn standard_node_types() -> NodeTypes {
    let mut types = NodeTypes::default();
    for name in ["Sequence", "Selector", "ParallelSequence", "MemSequence"] {
        types.add_node_type(COMPOSITES, name, &[]);
    }
    for name in ["Inverter", "Repeater", "Succeeder"] {
        types.add_node_type(DECORATORS, name, &[]);
    }
    for name in ["HasBall", "IsInDefenseArea"] {
        types.add_node_type(CONDITIONS, name, &[]);
    }
    types.add_node_type(SKILLS, "Kick", &["power".to_string()]);
    types.add_node_type(SKILLS, "GoToPos", &[]);
    types.add_node_type(SKILLS, "Shoot", &[]);
    for name in ["Strategy", "Tactic", "Role"] {
        types.add_node_type(OTHER, name, &[]);
    }
    types
}

/// One-node tree; valid
pub fn single_node_tree(name: &str) -> Tree {
    Tree::new(name, "1").with_node(Node::new("1", "Kick"))
}

/// `Sequence(a) -> [GoToPos(b), Kick(c)]`; valid
pub fn small_tree(name: &str) -> Tree {
    Tree::new(name, "a")
        .with_node(Node::new("a", "Sequence").with_child("b").with_child("c"))
        .with_node(Node::new("b", "GoToPos"))
        .with_node(Node::new("c", "Kick"))
}

/// `a -> b -> c -> a`
pub fn cyclic_tree(name: &str) -> Tree {
    Tree::new(name, "a")
        .with_node(Node::new("a", "Sequence").with_child("b"))
        .with_node(Node::new("b", "Sequence").with_child("c"))
        .with_node(Node::new("c", "Sequence").with_child("a"))
}

/// `a -> b` plus an isolated `z`
pub fn tree_with_unconnected(name: &str) -> Tree {
    Tree::new(name, "a")
        .with_node(Node::new("a", "Inverter").with_child("b"))
        .with_node(Node::new("b", "Kick"))
        .with_node(Node::new("z", "Kick"))
}

/// Linear chain `n0 -> n1 -> ... -> n{len-1}`
pub fn chain_tree(name: &str, len: usize) -> Tree {
    let mut tree = Tree::new(name, "n0");
    for i in 0..len {
        let mut node = Node::new(format!("n{i}"), "Inverter");
        if i + 1 < len {
            node.add_child(format!("n{}", i + 1));
        } else {
            node.title = "Kick".to_string();
        }
        tree.add_node(node);
    }
    tree
}

/// Role tree `Striker`: `Sequence(rs) -> [Kick(rk)]`
pub fn striker_role() -> Tree {
    Tree::new("Striker", "rs")
        .with_node(Node::new("rs", "Sequence").with_child("rk"))
        .with_node(Node::new("rk", "Kick").with_property("power", "3"))
}

/// Tactic tree `Offend`: `Sequence(tr) -> [HasBall(tc), Striker ref(tl)]`
pub fn offend_tactic() -> Tree {
    Tree::new("Offend", "tr")
        .with_node(Node::new("tr", "Sequence").with_child("tc").with_child("tl"))
        .with_node(Node::new("tc", "HasBall"))
        .with_node(Node::new("tl", "Striker").with_attribute("name", "Striker"))
}

/// Strategy tree `Attack`: `Selector(sr) -> [Offend ref(sl)]`
pub fn attack_strategy() -> Tree {
    Tree::new("Attack", "sr")
        .with_node(Node::new("sr", "Selector").with_child("sl"))
        .with_node(Node::new("sl", "Offend").with_attribute("name", "Offend"))
}

/// Catalog with `Attack` -> `Offend` -> `Striker` filed under their
/// categories, plus an empty `keeper` category
pub fn layered_catalog() -> Catalog {
    let mut catalog = Catalog::new();
    catalog.entry(KEEPER.to_string()).or_default();
    insert(&mut catalog, STRATEGIES, attack_strategy());
    insert(&mut catalog, TACTICS, offend_tactic());
    insert(&mut catalog, ROLES, striker_role());
    catalog
}

/// File `tree` under `category` as `<name>.json`
pub fn insert(catalog: &mut Catalog, category: &str, tree: Tree) {
    catalog
        .entry(category.to_string())
        .or_default()
        .insert(format!("{}.json", tree.name), tree);
}

/// Write a catalog as `<root>/<category>/<filename>` JSON files
pub fn write_catalog(root: &Path, catalog: &Catalog) {
    for (category, trees) in catalog {
        let dir = root.join(category);
        fs::create_dir_all(&dir).unwrap();
        for (filename, tree) in trees {
            let content = serde_json::to_string_pretty(&tree.to_json()).unwrap();
            fs::write(dir.join(filename), content).unwrap();
        }
    }
}
