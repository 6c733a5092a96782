//! Tree node model.
//!
//! Containers are held behind [`Arc`] and mutated through [`Arc::make_mut`],
//! so cloning a node is cheap and a write through one clone never shows up
//! in another.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use indexmap::IndexMap;

use crate::scalar::Scalar;

/// A tree node: a scalar leaf, an object or an array.
#[derive(Debug, Clone, PartialEq)]
pub enum Node {
    Scalar(Scalar),
    Object(Arc<Object>),
    Array(Arc<Array>),
}

impl Default for Node {
    fn default() -> Self {
        Node::Scalar(Scalar::Null)
    }
}

impl Node {
    pub fn null() -> Self {
        Node::Scalar(Scalar::Null)
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Node::Scalar(Scalar::Null))
    }

    pub fn is_object(&self) -> bool {
        matches!(self, Node::Object(_))
    }

    pub fn is_array(&self) -> bool {
        matches!(self, Node::Array(_))
    }

    pub fn kind(&self) -> &'static str {
        match self {
            Node::Scalar(scalar) => scalar.kind(),
            Node::Object(_) => "object",
            Node::Array(_) => "array",
        }
    }

    pub fn as_scalar(&self) -> Option<&Scalar> {
        match self {
            Node::Scalar(scalar) => Some(scalar),
            _ => None,
        }
    }

    pub fn as_object(&self) -> Option<&Object> {
        match self {
            Node::Object(object) => Some(object),
            _ => None,
        }
    }

    pub fn as_array(&self) -> Option<&Array> {
        match self {
            Node::Array(array) => Some(array),
            _ => None,
        }
    }

    /// Mutable access to an object node, unsharing it first if needed.
    pub fn as_object_mut(&mut self) -> Option<&mut Object> {
        match self {
            Node::Object(object) => Some(Arc::make_mut(object)),
            _ => None,
        }
    }

    /// Mutable access to an array node, unsharing it first if needed.
    pub fn as_array_mut(&mut self) -> Option<&mut Array> {
        match self {
            Node::Array(array) => Some(Arc::make_mut(array)),
            _ => None,
        }
    }

    /// Fully independent copy: no container is shared with `self`.
    pub fn clone_deep(&self) -> Node {
        match self {
            Node::Scalar(scalar) => Node::Scalar(scalar.clone()),
            Node::Object(object) => Node::Object(Arc::new(object.clone_deep())),
            Node::Array(array) => Node::Array(Arc::new(array.clone_deep())),
        }
    }

    /// Copy of the top container only; children are shared.
    pub fn clone_shallow(&self) -> Node {
        match self {
            Node::Scalar(scalar) => Node::Scalar(scalar.clone()),
            Node::Object(object) => Node::Object(Arc::new(object.clone_shallow())),
            Node::Array(array) => Node::Array(Arc::new(array.clone_shallow())),
        }
    }

    /// Check if both nodes point to the same container allocation.
    ///
    /// Always `false` for scalars.
    pub fn shares_with(&self, other: &Node) -> bool {
        match (self, other) {
            (Node::Object(a), Node::Object(b)) => Arc::ptr_eq(a, b),
            (Node::Array(a), Node::Array(b)) => Arc::ptr_eq(a, b),
            _ => false,
        }
    }
}

/// Ordered string-keyed map of nodes. Insertion order is preserved.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Object {
    pub(crate) entries: IndexMap<String, Node>,
}

impl Object {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Direct member lookup, no path parsing.
    pub fn get(&self, key: &str) -> Option<&Node> {
        self.entries.get(key)
    }

    pub fn get_mut(&mut self, key: &str) -> Option<&mut Node> {
        self.entries.get_mut(key)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    /// Insert a member, replacing any previous value in place.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<Node>) -> Option<Node> {
        self.entries.insert(key.into(), value.into())
    }

    /// Remove a member, keeping the order of the others.
    pub fn remove(&mut self, key: &str) -> Option<Node> {
        self.entries.shift_remove(key)
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Node)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Copy every top-level member of `other` into `self`, replacing members
    /// with the same key.
    pub fn merge_from(&mut self, other: &Object) {
        for (key, value) in &other.entries {
            self.entries.insert(key.clone(), value.clone());
        }
    }

    pub fn clone_deep(&self) -> Object {
        Object {
            entries: self
                .entries
                .iter()
                .map(|(k, v)| (k.clone(), v.clone_deep()))
                .collect(),
        }
    }

    pub fn clone_shallow(&self) -> Object {
        self.clone()
    }

    /// Object member `key`, inserted when absent. A member of another shape
    /// is replaced by an empty object.
    pub fn object_entry(&mut self, key: &str) -> &mut Object {
        let slot = self.slot(key);
        if !slot.is_object() {
            *slot = Node::from(Object::new());
        }
        match slot {
            Node::Object(object) => Arc::make_mut(object),
            _ => unreachable!(),
        }
    }

    /// Array counterpart of [`Object::object_entry`].
    pub fn array_entry(&mut self, key: &str) -> &mut Array {
        let slot = self.slot(key);
        if !slot.is_array() {
            *slot = Node::from(Array::new());
        }
        match slot {
            Node::Array(array) => Arc::make_mut(array),
            _ => unreachable!(),
        }
    }

    /// Slot for `key`, inserting a null marker when absent.
    pub(crate) fn slot(&mut self, key: &str) -> &mut Node {
        self.entries.entry(key.to_string()).or_default()
    }
}

impl<K: Into<String>, V: Into<Node>> FromIterator<(K, V)> for Object {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Object {
            entries: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}

/// Index-addressable sequence of nodes. Holes are null markers.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Array {
    pub(crate) items: Vec<Node>,
}

impl Array {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Node> {
        self.items.get(index)
    }

    pub fn get_mut(&mut self, index: usize) -> Option<&mut Node> {
        self.items.get_mut(index)
    }

    pub fn push(&mut self, value: impl Into<Node>) {
        self.items.push(value.into());
    }

    /// Remove the element at `index`, shifting the following ones.
    pub fn remove(&mut self, index: usize) -> Option<Node> {
        (index < self.items.len()).then(|| self.items.remove(index))
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Node> {
        self.items.iter()
    }

    /// Pad with null markers up to `len` elements. Returns the number of
    /// slots added.
    pub fn pad_to(&mut self, len: usize) -> usize {
        let missing = len.saturating_sub(self.items.len());
        if missing > 0 {
            self.items.resize_with(len, Node::null);
        }
        missing
    }

    pub fn clone_deep(&self) -> Array {
        Array {
            items: self.items.iter().map(Node::clone_deep).collect(),
        }
    }

    pub fn clone_shallow(&self) -> Array {
        self.clone()
    }
}

impl<V: Into<Node>> FromIterator<V> for Array {
    fn from_iter<I: IntoIterator<Item = V>>(iter: I) -> Self {
        Array {
            items: iter.into_iter().map(Into::into).collect(),
        }
    }
}

impl<'a> IntoIterator for &'a Array {
    type Item = &'a Node;
    type IntoIter = std::slice::Iter<'a, Node>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}

impl From<Scalar> for Node {
    fn from(value: Scalar) -> Self {
        Node::Scalar(value)
    }
}

impl From<Object> for Node {
    fn from(value: Object) -> Self {
        Node::Object(Arc::new(value))
    }
}

impl From<Arc<Object>> for Node {
    fn from(value: Arc<Object>) -> Self {
        Node::Object(value)
    }
}

impl From<Array> for Node {
    fn from(value: Array) -> Self {
        Node::Array(Arc::new(value))
    }
}

impl From<Arc<Array>> for Node {
    fn from(value: Arc<Array>) -> Self {
        Node::Array(value)
    }
}

impl From<Vec<Node>> for Node {
    fn from(items: Vec<Node>) -> Self {
        Node::Array(Arc::new(Array { items }))
    }
}

macro_rules! node_from_scalar {
    ($($ty:ty),*) => {
        $(
            impl From<$ty> for Node {
                fn from(value: $ty) -> Self {
                    Node::Scalar(Scalar::from(value))
                }
            }
        )*
    };
}

node_from_scalar!(bool, i64, i32, u32, f64, &str, String, DateTime<Utc>, Vec<u8>);

impl<T: Into<Node>> From<Option<T>> for Node {
    fn from(value: Option<T>) -> Self {
        value.map_or_else(Node::null, Into::into)
    }
}
