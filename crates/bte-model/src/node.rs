//! Behaviour tree nodes
//!
//! A [`Node`] never owns another node. Its `children` are id strings that
//! are resolved through the owning [`Tree`](crate::Tree).

use crate::error::NodeError;
use rand::Rng;
use serde_json::{Map, Value};
use tracing::warn;

/// Reserved attribute key holding the nested domain properties map
pub const PROPERTIES_KEY: &str = "properties";

/// Property key carrying the robot role a subtree is written for
pub const ROLE_PROPERTY: &str = "ROLE";

/// Default alphabet for generated ids: lowercase ASCII letters and digits
pub const ID_ALPHABET: &str = "abcdefghijklmnopqrstuvwxyz0123456789";

/// Atomic element of a behaviour tree
///
/// Equality compares every field, including the order of `children`.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Node {
    /// Identifier, unique within the owning tree
    pub id: String,
    /// Node-type name (e.g. `Sequence`, `Kick`)
    pub title: String,
    /// Free-form attributes; `properties` is the reserved nested map
    pub attributes: Map<String, Value>,
    /// Ordered child ids
    pub children: Vec<String>,
}

impl Node {
    /// Create node with no attributes and no children
    #[inline]
    #[must_use]
    pub fn new(id: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            attributes: Map::new(),
            children: Vec::new(),
        }
    }

    /// Create node with a freshly generated id of `id_size` characters
    #[must_use]
    pub fn with_generated_id(title: impl Into<String>, id_size: usize) -> Self {
        Self::new(Self::generate_id(id_size, ID_ALPHABET), title)
    }

    /// Append a child, builder style
    #[inline]
    #[must_use]
    pub fn with_child(mut self, id: impl Into<String>) -> Self {
        self.children.push(id.into());
        self
    }

    /// Set an attribute, builder style
    #[inline]
    #[must_use]
    pub fn with_attribute(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.attributes.insert(key.into(), value.into());
        self
    }

    /// Set a property, builder style
    #[inline]
    #[must_use]
    pub fn with_property(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.add_property(key, value);
        self
    }

    /// Parse a node from its JSON object form
    ///
    /// `id` and `title` must be non-empty strings, `children` (if present)
    /// an array of strings. Every other key becomes an attribute verbatim.
    ///
    /// # Errors
    /// Returns [`NodeError::Malformed`] on any shape violation.
    pub fn from_json(value: &Value) -> Result<Self, NodeError> {
        let Value::Object(object) = value else {
            return Err(NodeError::malformed("node is not a JSON object"));
        };

        let id = required_string(object, "id")?;
        let title = required_string(object, "title")?;

        let children = match object.get("children") {
            None => Vec::new(),
            Some(Value::Array(items)) => items
                .iter()
                .map(|item| {
                    item.as_str().map(str::to_string).ok_or_else(|| {
                        NodeError::malformed(format!("node {id} has a non-string child id"))
                    })
                })
                .collect::<Result<Vec<_>, _>>()?,
            Some(_) => {
                return Err(NodeError::malformed(format!(
                    "\"children\" of node {id} is not an array"
                )))
            }
        };

        let attributes = object
            .iter()
            .filter(|(key, _)| !matches!(key.as_str(), "id" | "title" | "children"))
            .map(|(key, value)| (key.clone(), value.clone()))
            .collect();

        Ok(Self {
            id,
            title,
            attributes,
            children,
        })
    }

    /// Canonical JSON form
    ///
    /// Attributes merged with `id` and `title`; `children` only when
    /// non-empty.
    #[must_use]
    pub fn to_json(&self) -> Value {
        let mut object = self.attributes.clone();
        object.insert("id".to_string(), Value::String(self.id.clone()));
        object.insert("title".to_string(), Value::String(self.title.clone()));
        if !self.children.is_empty() {
            object.insert(
                "children".to_string(),
                Value::Array(self.children.iter().cloned().map(Value::String).collect()),
            );
        }
        Value::Object(object)
    }

    /// Generate a random id of `size` characters drawn uniformly from `alphabet`
    ///
    /// Uniqueness within a tree is left to the caller.
    #[must_use]
    pub fn generate_id(size: usize, alphabet: &str) -> String {
        let chars: Vec<char> = alphabet.chars().collect();
        if chars.is_empty() {
            return String::new();
        }
        let mut rng = rand::rng();
        (0..size)
            .map(|_| chars[rng.random_range(0..chars.len())])
            .collect()
    }

    /// Append a child id
    #[inline]
    pub fn add_child(&mut self, id: impl Into<String>) {
        self.children.push(id.into());
    }

    /// Remove the first occurrence of a child id
    ///
    /// # Errors
    /// Returns [`NodeError::ChildNotFound`] if the id is not a child.
    pub fn remove_child(&mut self, id: &str) -> Result<(), NodeError> {
        match self.children.iter().position(|child| child == id) {
            Some(index) => {
                self.children.remove(index);
                Ok(())
            }
            None => {
                warn!(node = %self.id, child = id, "attempted to remove non-existent child");
                Err(NodeError::ChildNotFound {
                    node: self.id.clone(),
                    child: id.to_string(),
                })
            }
        }
    }

    /// Insert or overwrite an attribute
    #[inline]
    pub fn add_attribute(&mut self, key: impl Into<String>, value: impl Into<Value>) {
        self.attributes.insert(key.into(), value.into());
    }

    /// Remove an attribute
    ///
    /// # Errors
    /// Returns [`NodeError::AttributeNotFound`] if the key is absent.
    pub fn remove_attribute(&mut self, key: &str) -> Result<Value, NodeError> {
        self.attributes.remove(key).ok_or_else(|| {
            warn!(node = %self.id, key, "attempted to remove non-existent attribute");
            NodeError::AttributeNotFound {
                node: self.id.clone(),
                key: key.to_string(),
            }
        })
    }

    /// Nested `properties` map, if the node has one
    #[inline]
    #[must_use]
    pub fn properties(&self) -> Option<&Map<String, Value>> {
        self.attributes.get(PROPERTIES_KEY).and_then(Value::as_object)
    }

    /// Mutable `properties` map, created empty if absent or not a map
    pub fn properties_mut(&mut self) -> &mut Map<String, Value> {
        let slot = self
            .attributes
            .entry(PROPERTIES_KEY.to_string())
            .or_insert_with(|| Value::Object(Map::new()));
        if !slot.is_object() {
            *slot = Value::Object(Map::new());
        }
        match slot {
            Value::Object(map) => map,
            _ => unreachable!("properties slot was just made an object"),
        }
    }

    /// Insert or overwrite a property
    #[inline]
    pub fn add_property(&mut self, key: impl Into<String>, value: impl Into<Value>) {
        self.properties_mut().insert(key.into(), value.into());
    }

    /// Remove a property
    ///
    /// # Errors
    /// Returns [`NodeError::PropertyNotFound`] if there is no such property.
    pub fn remove_property(&mut self, key: &str) -> Result<Value, NodeError> {
        let removed = self
            .attributes
            .get_mut(PROPERTIES_KEY)
            .and_then(Value::as_object_mut)
            .and_then(|properties| properties.remove(key));
        removed.ok_or_else(|| {
            warn!(node = %self.id, key, "attempted to remove non-existent property");
            NodeError::PropertyNotFound {
                node: self.id.clone(),
                key: key.to_string(),
            }
        })
    }

    /// Replace the whole `properties` map
    ///
    /// An empty map removes the `properties` key.
    pub fn update_properties(&mut self, properties: Map<String, Value>) {
        if properties.is_empty() {
            self.attributes.remove(PROPERTIES_KEY);
        } else {
            self.attributes
                .insert(PROPERTIES_KEY.to_string(), Value::Object(properties));
        }
    }

    /// `properties.ROLE` as a string, if set
    #[inline]
    #[must_use]
    pub fn role(&self) -> Option<&str> {
        self.properties()
            .and_then(|properties| properties.get(ROLE_PROPERTY))
            .and_then(Value::as_str)
    }

    /// Check if the node has no children
    #[inline]
    #[must_use]
    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }
}

fn required_string(object: &Map<String, Value>, field: &str) -> Result<String, NodeError> {
    match object.get(field) {
        Some(Value::String(s)) if !s.is_empty() => Ok(s.clone()),
        Some(Value::String(_)) => Err(NodeError::malformed(format!("\"{field}\" is empty"))),
        Some(_) => Err(NodeError::malformed(format!("\"{field}\" is not a string"))),
        None => Err(NodeError::malformed(format!("\"{field}\" is missing"))),
    }
}
