use bte_model::{Node, Tree, TreeFormatError};
use pretty_assertions::assert_eq;
use proptest::prelude::*;
use serde_json::{json, Value};
use std::collections::BTreeMap;

fn attribute_value() -> impl Strategy<Value = Value> {
    prop_oneof![
        "[a-zA-Z ]{0,8}".prop_map(Value::from),
        any::<i32>().prop_map(Value::from),
        any::<bool>().prop_map(Value::from),
        prop::collection::btree_map("[A-Z]{1,5}", "[a-z]{0,5}", 0..3)
            .prop_map(|m| json!(m)),
    ]
}

fn arb_tree() -> impl Strategy<Value = Tree> {
    prop::collection::btree_set("[a-z0-9]{1,6}", 1..12)
        .prop_flat_map(|ids| {
            let ids: Vec<String> = ids.into_iter().collect();
            let count = ids.len();
            let nodes = prop::collection::vec(
                (
                    "[A-Z][a-z]{0,8}",
                    prop::collection::btree_map("[a-z]{1,6}", attribute_value(), 0..3),
                    prop::collection::vec(0..count, 0..4),
                ),
                count,
            );
            (Just(ids), nodes, 0..count, "[A-Za-z]{1,10}")
        })
        .prop_map(|(ids, nodes, root, name)| {
            let mut tree = Tree::new(name, ids[root].clone());
            for (id, (title, attributes, children)) in ids.iter().zip(nodes) {
                let mut node = Node::new(id.clone(), title);
                for (key, value) in attributes {
                    // Reserved keys belong to the node itself.
                    if key != "id" && key != "title" && key != "children" {
                        node.add_attribute(key, value);
                    }
                }
                for child in children {
                    node.add_child(ids[child].clone());
                }
                tree.add_node(node);
            }
            tree
        })
}

proptest! {
    #[test]
    fn prop_tree_json_round_trip(tree in arb_tree()) {
        let json = tree.to_json();
        let parsed = Tree::from_json(&json).unwrap();
        prop_assert_eq!(&parsed, &tree);
        prop_assert_eq!(parsed.to_json(), json);
    }

    #[test]
    fn prop_descendants_terminate_on_any_shape(tree in arb_tree()) {
        let root = tree.root.clone();
        let below = tree.descendants(&root);
        prop_assert!(below.len() < tree.len());
        prop_assert!(!below.contains(&root));
    }

    #[test]
    fn prop_remove_with_children_never_hangs(tree in arb_tree()) {
        let mut tree = tree;
        let root = tree.root.clone();
        prop_assert!(tree.remove_node_and_children_by_id(&root));
        prop_assert!(!tree.contains(&root));
        prop_assert_eq!(tree.root.as_str(), "");
    }
}

#[test]
fn test_round_trip_with_properties() {
    let doc = json!({
        "name": "Attack",
        "data": {"trees": [{
            "title": "Attack",
            "root": "r",
            "nodes": {
                "r": {"id": "r", "title": "Sequence", "children": ["k", "g"]},
                "k": {"id": "k", "title": "Kick", "properties": {"ROLE": "Striker", "power": "3"}},
                "g": {"id": "g", "title": "GoToPos", "description": "move"}
            }
        }]}
    });
    let tree = Tree::from_json(&doc).unwrap();
    assert_eq!(tree.get_node("k").unwrap().role(), Some("Striker"));
    assert_eq!(
        tree.get_node("g").unwrap().attributes.get("description"),
        Some(&json!("move"))
    );
    assert_eq!(tree.to_json(), doc);
}

#[test]
fn test_empty_children_omitted() {
    let tree = Tree::new("T", "a").with_node(Node::new("a", "Kick"));
    let json = tree.to_json();
    let node = &json["data"]["trees"][0]["nodes"]["a"];
    assert!(node.get("children").is_none());
}

#[test]
fn test_missing_name_fails_first() {
    let err = Tree::from_json(&json!({"data": "not even an object"})).unwrap_err();
    assert!(matches!(err, TreeFormatError::MissingField { ref field, .. } if field == "name"));
}

#[test]
fn test_children_not_array() {
    let doc = json!({
        "name": "T",
        "data": {"trees": [{
            "title": "T",
            "root": "a",
            "nodes": {"a": {"id": "a", "title": "Kick", "children": "b"}}
        }]}
    });
    assert!(matches!(
        Tree::from_json(&doc),
        Err(TreeFormatError::Node { .. })
    ));
}

#[test]
fn test_node_equality_respects_child_order() {
    let a = Node::new("n", "Sequence").with_child("x").with_child("y");
    let b = Node::new("n", "Sequence").with_child("y").with_child("x");
    assert_ne!(a, b);

    let mut nodes = BTreeMap::new();
    nodes.insert("n".to_string(), a.clone());
    let tree = Tree {
        name: "T".to_string(),
        root: "n".to_string(),
        nodes,
    };
    assert_eq!(tree.get_node("n"), Some(&a));
}
