//! Tree verification
//!
//! Checks run in stages and a stage only runs when every earlier stage found
//! nothing:
//!
//! 1. root validity
//! 2. dangling child references and cycles reachable from the root, both
//!    reported together
//! 3. nodes with more than one parent
//! 4. unconnected nodes
//! 5. with a category and not mathematical-only: layer structure, arity,
//!    ROLE inheritance
//!
//! Nothing here mutates its inputs or performs IO.

use crate::catalog::TreeCatalog;
use crate::violation::{Layer, Violation};
use bte_model::node_types::{COMPOSITES, CONDITIONS, DECORATORS};
use bte_model::{Node, NodeTypes, Tree};
use petgraph::algo::toposort;
use petgraph::graphmap::DiGraphMap;
use petgraph::visit::Dfs;
use std::collections::{BTreeSet, HashMap};
use tracing::{debug, warn};

/// Tree category for strategies
pub const STRATEGIES: &str = "strategies";
/// Tree category for tactics
pub const TACTICS: &str = "tactics";
/// Tree category for roles
pub const ROLES: &str = "roles";

/// ROLE value that counts as passing the role layer
const KEEPER_ROLE: &str = "Keeper";
/// Leaf attribute naming the tree the leaf stands in for
const REFERENCE_ATTRIBUTE: &str = "name";
const TACTIC_TITLE: &str = "Tactic";
const ROLE_TITLE: &str = "Role";
const SEQUENCE_MARKER: &str = "Sequence";

/// What to check
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct VerifyOptions<'a> {
    /// Tree category; domain checks are skipped without one
    pub category: Option<&'a str>,
    /// Stop after the graph-shape checks
    pub math_only: bool,
}

impl<'a> VerifyOptions<'a> {
    /// Graph-shape checks only
    #[inline]
    #[must_use]
    pub fn mathematical() -> Self {
        Self {
            category: None,
            math_only: true,
        }
    }

    /// Every check, for a tree filed under `category`
    #[inline]
    #[must_use]
    pub fn with_category(category: &'a str) -> Self {
        Self {
            category: Some(category),
            math_only: false,
        }
    }
}

/// Verify a tree; an empty result means valid
pub fn verify_tree<C: TreeCatalog + ?Sized>(
    catalog: &C,
    node_types: &NodeTypes,
    tree: &Tree,
    options: VerifyOptions<'_>,
) -> Vec<Violation> {
    let mut violations = verify_mathematical_properties(tree);

    if violations.is_empty() && !options.math_only {
        if let Some(category) = options.category {
            violations.extend(check_category_structure(catalog, node_types, category, tree));
            violations.extend(check_composites_and_decorators(node_types, tree));
            violations.extend(check_role_inheritance(tree));
        }
    }

    for violation in &violations {
        debug!(tree = %tree.name, "{violation}");
    }
    violations
}

/// Graph-shape stages: root, dangling children, cycles, shared children,
/// unconnected nodes
#[must_use]
pub fn verify_mathematical_properties(tree: &Tree) -> Vec<Violation> {
    if let Some(violation) = check_root_validity(tree) {
        return vec![violation];
    }

    // Dangling edges are left out of the graph, so cycles are still found.
    let mut violations = dangling_children(tree);
    let graph = child_graph(tree);
    let reachable = reachable_from_root(&graph, &tree.root);

    if let Some(violation) = find_cycle(tree, &graph, &reachable) {
        violations.push(violation);
        return violations;
    }
    if !violations.is_empty() {
        return violations;
    }
    if let Some(violation) = find_shared_child(tree, &reachable) {
        return vec![violation];
    }

    tree.nodes
        .keys()
        .filter(|id| !reachable.contains(id.as_str()))
        .map(|id| Violation::Unconnected {
            tree: tree.name.clone(),
            node: id.clone(),
        })
        .collect()
}

/// Root must be set and name an existing node
#[must_use]
pub fn check_root_validity(tree: &Tree) -> Option<Violation> {
    if tree.root.is_empty() {
        Some(Violation::NoRoot {
            tree: tree.name.clone(),
        })
    } else if !tree.contains(&tree.root) {
        Some(Violation::MissingRoot {
            tree: tree.name.clone(),
            root: tree.root.clone(),
        })
    } else {
        None
    }
}

fn dangling_children(tree: &Tree) -> Vec<Violation> {
    tree.nodes
        .values()
        .flat_map(|node| {
            node.children
                .iter()
                .filter(move |child| !tree.contains(child))
                .map(move |child| Violation::DanglingChild {
                    tree: tree.name.clone(),
                    node: node.id.clone(),
                    child: child.clone(),
                })
        })
        .collect()
}

fn child_graph(tree: &Tree) -> DiGraphMap<&str, ()> {
    let mut graph = DiGraphMap::new();
    for (id, node) in &tree.nodes {
        graph.add_node(id.as_str());
        for child in node.children.iter().filter(|c| tree.contains(c)) {
            graph.add_edge(id.as_str(), child.as_str(), ());
        }
    }
    graph
}

fn reachable_from_root<'a>(graph: &DiGraphMap<&'a str, ()>, root: &'a str) -> BTreeSet<&'a str> {
    let mut seen = BTreeSet::new();
    if !graph.contains_node(root) {
        return seen;
    }
    let mut dfs = Dfs::new(graph, root);
    while let Some(node) = dfs.next(graph) {
        seen.insert(node);
    }
    seen
}

fn find_cycle(
    tree: &Tree,
    graph: &DiGraphMap<&str, ()>,
    reachable: &BTreeSet<&str>,
) -> Option<Violation> {
    // Edges out of reachable nodes only ever lead to reachable nodes.
    let mut component = DiGraphMap::<&str, ()>::new();
    for &node in reachable {
        component.add_node(node);
    }
    for (from, to, _) in graph.all_edges() {
        if reachable.contains(from) {
            component.add_edge(from, to, ());
        }
    }

    toposort(&component, None).err().map(|cycle| {
        warn!(tree = %tree.name, node = cycle.node_id(), "encountered a cycle");
        Violation::Cycle {
            tree: tree.name.clone(),
            node: cycle.node_id().to_string(),
        }
    })
}

fn find_shared_child(tree: &Tree, reachable: &BTreeSet<&str>) -> Option<Violation> {
    let mut parents: HashMap<&str, usize> = HashMap::new();
    for &id in reachable {
        let Some(node) = tree.get_node(id) else {
            continue;
        };
        for child in &node.children {
            *parents.entry(child.as_str()).or_default() += 1;
        }
    }

    reachable
        .iter()
        .find(|id| parents.get(**id).copied().unwrap_or(0) > 1)
        .map(|id| Violation::MultipleParents {
            tree: tree.name.clone(),
            node: (*id).to_string(),
        })
}

/// Tree that can be walked without further checks
fn walkable(tree: &Tree) -> bool {
    if check_root_validity(tree).is_some() || !dangling_children(tree).is_empty() {
        return false;
    }
    let graph = child_graph(tree);
    let reachable = reachable_from_root(&graph, &tree.root);
    find_cycle(tree, &graph, &reachable).is_none()
}

fn is_sequence(node_types: &NodeTypes, node: &Node) -> bool {
    node.title.contains(SEQUENCE_MARKER) && node_types.is_of_category(&node.title, COMPOSITES)
}

/// Children to descend into; condition children of a sequence are skipped
fn walked_children<'t>(
    node_types: &'t NodeTypes,
    tree: &'t Tree,
    node: &'t Node,
) -> impl DoubleEndedIterator<Item = &'t str> + 't {
    let sequence = is_sequence(node_types, node);
    node.children
        .iter()
        .map(String::as_str)
        .filter(move |child| {
            !(sequence
                && tree
                    .get_node(child)
                    .is_some_and(|c| node_types.is_of_category(&c.title, CONDITIONS)))
        })
}

fn initial_layers(category: &str) -> [bool; 3] {
    match category {
        TACTICS => [true, false, false],
        ROLES => [true, true, false],
        _ => [false, false, false],
    }
}

struct LayerStep<'a> {
    tree: &'a Tree,
    node: &'a str,
    passed: [bool; 3],
    first: bool,
    path: Vec<&'a str>,
}

/// Every root-to-leaf path passes a strategy, a tactic and a role node once
///
/// Leaves carrying a `name` attribute continue into the root of the tree of
/// that name.
pub fn check_category_structure<'a, C: TreeCatalog + ?Sized>(
    catalog: &'a C,
    node_types: &'a NodeTypes,
    category: &str,
    tree: &'a Tree,
) -> Vec<Violation> {
    let registered = catalog
        .root_nodes_by_category(category)
        .iter()
        .any(|(root, _)| *root == tree.root);
    if !registered {
        return vec![Violation::WrongRootCategory {
            tree: tree.name.clone(),
            expected: category.to_string(),
            found: catalog.category_of_root(&tree.root).map(str::to_string),
        }];
    }

    let mut violations = Vec::new();
    let mut stack = vec![LayerStep {
        tree,
        node: tree.root.as_str(),
        passed: initial_layers(category),
        first: true,
        path: vec![tree.name.as_str()],
    }];

    while let Some(mut step) = stack.pop() {
        let Some(mut node) = step.tree.get_node(step.node) else {
            continue;
        };

        if node.is_leaf() && !step.first {
            let Some(target) = node
                .attributes
                .get(REFERENCE_ATTRIBUTE)
                .and_then(|v| v.as_str())
            else {
                if step.passed != [true; 3] {
                    violations.push(Violation::IncompleteLayers {
                        tree: step.tree.name.clone(),
                        node: node.id.clone(),
                    });
                }
                continue;
            };

            if step.path.contains(&target) {
                violations.push(Violation::CircularReference {
                    tree: step.tree.name.clone(),
                    node: node.id.clone(),
                    target: target.to_string(),
                });
                continue;
            }
            let Some(referenced) = catalog.tree_by_name(target) else {
                debug!(tree = %step.tree.name, target, "referenced tree not in collection");
                continue;
            };
            if !walkable(referenced) {
                warn!(tree = %step.tree.name, target, "referenced tree is malformed, not following");
                continue;
            }
            let Some(root) = referenced.root_node() else {
                continue;
            };
            step.tree = referenced;
            step.node = referenced.root.as_str();
            step.path.push(target);
            node = root;
        }

        let layer = match catalog.category_of_root(step.node) {
            Some(STRATEGIES) => Some(Layer::Strategy),
            Some(TACTICS) => Some(Layer::Tactic),
            _ if node.title == TACTIC_TITLE => Some(Layer::Tactic),
            Some(ROLES) => Some(Layer::Role),
            _ if node.title == ROLE_TITLE => Some(Layer::Role),
            _ => None,
        };
        match layer {
            Some(layer) if step.passed[layer.index()] => {
                violations.push(Violation::DuplicateLayer {
                    tree: step.tree.name.clone(),
                    node: node.id.clone(),
                    layer,
                });
                continue;
            }
            Some(layer) => step.passed[layer.index()] = true,
            None if node.role() == Some(KEEPER_ROLE) => step.passed[Layer::Role.index()] = true,
            None => {}
        }

        for child in walked_children(node_types, step.tree, node).rev() {
            stack.push(LayerStep {
                tree: step.tree,
                node: child,
                passed: step.passed,
                first: false,
                path: step.path.clone(),
            });
        }
    }
    violations
}

/// Decorators have exactly one child, composites at least one
#[must_use]
pub fn check_composites_and_decorators(node_types: &NodeTypes, tree: &Tree) -> Vec<Violation> {
    let mut violations = Vec::new();
    let mut stack = vec![tree.root.as_str()];

    while let Some(id) = stack.pop() {
        let Some(node) = tree.get_node(id) else {
            continue;
        };
        if node_types.is_of_category(&node.title, DECORATORS) && node.children.len() != 1 {
            violations.push(Violation::DecoratorArity {
                tree: tree.name.clone(),
                node: node.id.clone(),
                children: node.children.len(),
            });
        }
        if node_types.is_of_category(&node.title, COMPOSITES) && node.children.is_empty() {
            violations.push(Violation::CompositeArity {
                tree: tree.name.clone(),
                node: node.id.clone(),
            });
        }
        stack.extend(walked_children(node_types, tree, node).rev());
    }
    violations
}

/// ROLE declared by an ancestor must be repeated, not changed, below it
///
/// The first declaration on a path is the one inherited. A node with no
/// properties below a declaration is a violation; a node with properties but
/// no ROLE is not.
#[must_use]
pub fn check_role_inheritance(tree: &Tree) -> Vec<Violation> {
    let mut violations = Vec::new();
    let mut stack: Vec<(&str, Option<&str>)> = vec![(tree.root.as_str(), None)];

    while let Some((id, inherited)) = stack.pop() {
        let Some(node) = tree.get_node(id) else {
            continue;
        };
        let mut role = inherited;
        match (node.properties(), inherited) {
            (None, Some(expected)) => violations.push(Violation::MissingRole {
                tree: tree.name.clone(),
                node: node.id.clone(),
                expected: expected.to_string(),
            }),
            (Some(_), None) => role = node.role(),
            (Some(_), Some(expected)) => {
                if let Some(found) = node.role().filter(|found| *found != expected) {
                    violations.push(Violation::RoleMismatch {
                        tree: tree.name.clone(),
                        node: node.id.clone(),
                        expected: expected.to_string(),
                        found: found.to_string(),
                    });
                }
            }
            (None, None) => {}
        }
        stack.extend(node.children.iter().rev().map(|child| (child.as_str(), role)));
    }
    violations
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::EmptyCatalog;
    use bte_test_utils::{
        attack_strategy, cyclic_tree, insert, layered_catalog, offend_tactic, single_node_tree,
        small_tree, standard_node_types, striker_role, tree_with_unconnected,
    };
    use pretty_assertions::assert_eq;

    fn check(tree: &Tree) -> Vec<Violation> {
        verify_tree(&EmptyCatalog, &standard_node_types(), tree, VerifyOptions::default())
    }

    #[test]
    fn single_node_is_valid() {
        assert!(check(&single_node_tree("SimpleTree")).is_empty());
        assert!(check(&small_tree("Small")).is_empty());
    }

    #[test]
    fn missing_and_empty_root() {
        let mut tree = small_tree("T");
        tree.root = "nope".to_string();
        assert_eq!(
            check(&tree),
            vec![Violation::MissingRoot {
                tree: "T".to_string(),
                root: "nope".to_string()
            }]
        );
        tree.root.clear();
        assert_eq!(check(&tree), vec![Violation::NoRoot { tree: "T".to_string() }]);
    }

    #[test]
    fn two_node_cycle_is_one_violation() {
        let tree = Tree::new("Loop", "a")
            .with_node(Node::new("a", "Sequence").with_child("b"))
            .with_node(Node::new("b", "Sequence").with_child("a"));
        let violations = check(&tree);
        assert_eq!(violations.len(), 1);
        assert!(matches!(violations[0], Violation::Cycle { .. }));
    }

    #[test]
    fn self_loop_is_cycle() {
        let tree = Tree::new("Self", "a").with_node(Node::new("a", "Inverter").with_child("a"));
        assert!(matches!(check(&tree)[..], [Violation::Cycle { .. }]));
    }

    #[test]
    fn longer_cycle() {
        assert!(matches!(check(&cyclic_tree("C"))[..], [Violation::Cycle { .. }]));
    }

    #[test]
    fn unconnected_node_reported() {
        assert_eq!(
            check(&tree_with_unconnected("U")),
            vec![Violation::Unconnected {
                tree: "U".to_string(),
                node: "z".to_string()
            }]
        );
    }

    #[test]
    fn dangling_children_each_reported() {
        let tree = Tree::new("D", "a")
            .with_node(Node::new("a", "Sequence").with_child("x").with_child("b"))
            .with_node(Node::new("b", "Sequence").with_child("y"));
        let violations = check(&tree);
        assert_eq!(violations.len(), 2);
        assert!(violations
            .iter()
            .all(|v| matches!(v, Violation::DanglingChild { .. })));
    }

    #[test]
    fn cycle_reported_next_to_dangling_child() {
        let tree = Tree::new("T", "a")
            .with_node(Node::new("a", "Sequence").with_child("b").with_child("ghost"))
            .with_node(Node::new("b", "Sequence").with_child("a"));
        let violations = check(&tree);
        assert_eq!(violations.len(), 2);
        assert!(matches!(
            violations[0],
            Violation::DanglingChild { ref child, .. } if child == "ghost"
        ));
        assert!(matches!(violations[1], Violation::Cycle { .. }));
    }

    #[test]
    fn shared_child_reported() {
        let tree = Tree::new("Dag", "a")
            .with_node(Node::new("a", "Sequence").with_child("b").with_child("c"))
            .with_node(Node::new("b", "Inverter").with_child("d"))
            .with_node(Node::new("c", "Inverter").with_child("d"))
            .with_node(Node::new("d", "Kick"));
        assert_eq!(
            check(&tree),
            vec![Violation::MultipleParents {
                tree: "Dag".to_string(),
                node: "d".to_string()
            }]
        );

        let twice = Tree::new("Twice", "a")
            .with_node(Node::new("a", "Sequence").with_child("b").with_child("b"))
            .with_node(Node::new("b", "Kick"));
        assert!(matches!(check(&twice)[..], [Violation::MultipleParents { .. }]));
    }

    #[test]
    fn no_category_skips_domain_checks() {
        // Inverter without a child would fail arity.
        let tree = Tree::new("T", "a").with_node(Node::new("a", "Inverter"));
        assert!(check(&tree).is_empty());
    }

    #[test]
    fn layered_catalog_is_valid() {
        let catalog = layered_catalog();
        let types = standard_node_types();
        for (category, tree) in [
            (STRATEGIES, attack_strategy()),
            (TACTICS, offend_tactic()),
            (ROLES, striker_role()),
        ] {
            let violations =
                verify_tree(&catalog, &types, &tree, VerifyOptions::with_category(category));
            assert_eq!(violations, vec![], "{category}");
        }
    }

    #[test]
    fn wrong_root_category() {
        let catalog = layered_catalog();
        let violations = verify_tree(
            &catalog,
            &standard_node_types(),
            &offend_tactic(),
            VerifyOptions::with_category(STRATEGIES),
        );
        assert_eq!(
            violations,
            vec![Violation::WrongRootCategory {
                tree: "Offend".to_string(),
                expected: STRATEGIES.to_string(),
                found: Some(TACTICS.to_string()),
            }]
        );
    }

    #[test]
    fn leaf_without_all_layers() {
        let mut catalog = layered_catalog();
        let shortcut = Tree::new("Shortcut", "s2")
            .with_node(Node::new("s2", "Selector").with_child("k"))
            .with_node(Node::new("k", "Kick"));
        insert(&mut catalog, STRATEGIES, shortcut.clone());

        let violations = verify_tree(
            &catalog,
            &standard_node_types(),
            &shortcut,
            VerifyOptions::with_category(STRATEGIES),
        );
        assert_eq!(
            violations,
            vec![Violation::IncompleteLayers {
                tree: "Shortcut".to_string(),
                node: "k".to_string()
            }]
        );
    }

    #[test]
    fn keeper_role_counts_as_role_layer() {
        let mut catalog = layered_catalog();
        let tactic = Tree::new("Guard", "g")
            .with_node(Node::new("g", "Sequence").with_child("k"))
            .with_node(
                Node::new("k", "Inverter")
                    .with_property("ROLE", "Keeper")
                    .with_child("kk"),
            )
            .with_node(Node::new("kk", "Kick").with_property("ROLE", "Keeper"));
        insert(&mut catalog, TACTICS, tactic.clone());

        let violations = verify_tree(
            &catalog,
            &standard_node_types(),
            &tactic,
            VerifyOptions::with_category(TACTICS),
        );
        assert_eq!(violations, vec![]);
    }

    #[test]
    fn tactic_twice_on_path() {
        let mut catalog = layered_catalog();
        let tactic = Tree::new("Double", "d")
            .with_node(Node::new("d", "Selector").with_child("t"))
            .with_node(Node::new("t", "Tactic").with_child("k"))
            .with_node(Node::new("k", "Kick"));
        insert(&mut catalog, TACTICS, tactic.clone());

        let violations = verify_tree(
            &catalog,
            &standard_node_types(),
            &tactic,
            VerifyOptions::with_category(TACTICS),
        );
        assert_eq!(
            violations,
            vec![Violation::DuplicateLayer {
                tree: "Double".to_string(),
                node: "t".to_string(),
                layer: Layer::Tactic,
            }]
        );
    }

    #[test]
    fn self_reference_is_circular() {
        let mut catalog = layered_catalog();
        let tree = Tree::new("Echo", "e")
            .with_node(Node::new("e", "Selector").with_child("r"))
            .with_node(Node::new("r", "Echo").with_attribute("name", "Echo"));
        insert(&mut catalog, STRATEGIES, tree.clone());

        let violations = verify_tree(
            &catalog,
            &standard_node_types(),
            &tree,
            VerifyOptions::with_category(STRATEGIES),
        );
        assert!(matches!(violations[..], [Violation::CircularReference { .. }]));
    }

    #[test]
    fn unknown_reference_is_ignored() {
        let mut catalog = layered_catalog();
        let tree = Tree::new("Ghost", "g")
            .with_node(Node::new("g", "Selector").with_child("r"))
            .with_node(Node::new("r", "Nobody").with_attribute("name", "Nobody"));
        insert(&mut catalog, STRATEGIES, tree.clone());

        let violations = verify_tree(
            &catalog,
            &standard_node_types(),
            &tree,
            VerifyOptions::with_category(STRATEGIES),
        );
        assert_eq!(violations, vec![]);
    }

    #[test]
    fn malformed_reference_is_not_followed() {
        let mut catalog = layered_catalog();
        insert(&mut catalog, TACTICS, cyclic_tree("Loop"));
        let tree = Tree::new("Plan", "p")
            .with_node(Node::new("p", "Selector").with_child("r"))
            .with_node(Node::new("r", "Loop").with_attribute("name", "Loop"));
        insert(&mut catalog, STRATEGIES, tree.clone());

        let violations = verify_tree(
            &catalog,
            &standard_node_types(),
            &tree,
            VerifyOptions::with_category(STRATEGIES),
        );
        assert_eq!(violations, vec![]);
    }

    #[test]
    fn circular_reference_across_two_trees() {
        let mut catalog = layered_catalog();
        let first = Tree::new("Ping", "pa")
            .with_node(Node::new("pa", "Selector").with_child("pr"))
            .with_node(Node::new("pr", "Pong").with_attribute("name", "Pong"));
        let second = Tree::new("Pong", "pb")
            .with_node(Node::new("pb", "Sequence").with_child("pq"))
            .with_node(Node::new("pq", "Ping").with_attribute("name", "Ping"));
        insert(&mut catalog, STRATEGIES, first.clone());
        insert(&mut catalog, TACTICS, second);

        let violations = verify_tree(
            &catalog,
            &standard_node_types(),
            &first,
            VerifyOptions::with_category(STRATEGIES),
        );
        assert_eq!(
            violations,
            vec![Violation::CircularReference {
                tree: "Pong".to_string(),
                node: "pq".to_string(),
                target: "Ping".to_string(),
            }]
        );
    }

    #[test]
    fn conditions_under_sequence_are_skipped() {
        let types = standard_node_types();
        // HasBall as a leaf would otherwise fail the layer check.
        let tree = offend_tactic();
        let node = tree.get_node("tr").unwrap();
        let walked: Vec<_> = walked_children(&types, &tree, node).collect();
        assert_eq!(walked, vec!["tl"]);

        let selector = Node::new("x", "Selector").with_child("tc");
        let walked: Vec<_> = walked_children(&types, &tree, &selector).collect();
        assert_eq!(walked, vec!["tc"]);
    }

    #[test]
    fn decorator_and_composite_arity() {
        let types = standard_node_types();
        let tree = Tree::new("Arity", "s")
            .with_node(Node::new("s", "Selector").with_child("i").with_child("e"))
            .with_node(Node::new("i", "Inverter").with_child("k1").with_child("k2"))
            .with_node(Node::new("e", "Selector"))
            .with_node(Node::new("k1", "Kick"))
            .with_node(Node::new("k2", "Kick"));
        assert_eq!(
            check_composites_and_decorators(&types, &tree),
            vec![
                Violation::DecoratorArity {
                    tree: "Arity".to_string(),
                    node: "i".to_string(),
                    children: 2,
                },
                Violation::CompositeArity {
                    tree: "Arity".to_string(),
                    node: "e".to_string(),
                },
            ]
        );
    }

    #[test]
    fn role_inheritance() {
        let tree = Tree::new("Roles", "a")
            .with_node(
                Node::new("a", "Sequence")
                    .with_property("ROLE", "Striker")
                    .with_child("b")
                    .with_child("c")
                    .with_child("d"),
            )
            .with_node(Node::new("b", "Kick").with_property("ROLE", "Striker"))
            .with_node(Node::new("c", "Kick").with_property("ROLE", "Defender"))
            .with_node(Node::new("d", "Kick"));
        assert_eq!(
            check_role_inheritance(&tree),
            vec![
                Violation::RoleMismatch {
                    tree: "Roles".to_string(),
                    node: "c".to_string(),
                    expected: "Striker".to_string(),
                    found: "Defender".to_string(),
                },
                Violation::MissingRole {
                    tree: "Roles".to_string(),
                    node: "d".to_string(),
                    expected: "Striker".to_string(),
                },
            ]
        );
    }

    #[test]
    fn properties_without_role_pass() {
        let tree = Tree::new("Roles", "a")
            .with_node(Node::new("a", "Inverter").with_property("ROLE", "Striker").with_child("b"))
            .with_node(Node::new("b", "Kick").with_property("power", "3"));
        assert!(check_role_inheritance(&tree).is_empty());
    }

    #[test]
    fn verification_is_idempotent() {
        let catalog = layered_catalog();
        let types = standard_node_types();
        let tree = attack_strategy();
        let options = VerifyOptions::with_category(STRATEGIES);
        assert_eq!(
            verify_tree(&catalog, &types, &tree, options),
            verify_tree(&catalog, &types, &tree, options)
        );
    }
}
