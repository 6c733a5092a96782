//! Typed and "safe" read accessors.
//!
//! Three families:
//! - `get_*_or(path, default)` return the default when nothing (or a null
//!   marker) is found, and fail only when a value is there but can't be
//!   converted;
//! - `get_*(path)` fail with [`TreeError::MissingValue`] instead;
//! - `get_object_or_empty` / `get_array_or_empty` never fail: any miss
//!   gives a fresh, detached, empty container, so they can be chained
//!   freely.
//!
//! Paths are anything implementing [`ToPath`]. Strings are parsed; pass
//! [`Path::literal`] to address a member whose name contains path syntax.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use formtree_path::{Path, ToPath};

use crate::error::{Result, TreeError};
use crate::navigate::read_path;
use crate::node::{Array, Node, Object};

/// Conversion from a non-null node to a typed value.
pub trait FromNode: Sized {
    /// Name of the target type, for error messages.
    const EXPECTED: &'static str;

    fn from_node(node: &Node) -> Option<Self>;
}

impl FromNode for String {
    const EXPECTED: &'static str = "string";

    fn from_node(node: &Node) -> Option<Self> {
        node.as_scalar()?.to_text()
    }
}

impl FromNode for i64 {
    const EXPECTED: &'static str = "integer";

    fn from_node(node: &Node) -> Option<Self> {
        node.as_scalar()?.as_i64()
    }
}

impl FromNode for f64 {
    const EXPECTED: &'static str = "float";

    fn from_node(node: &Node) -> Option<Self> {
        node.as_scalar()?.as_f64()
    }
}

impl FromNode for bool {
    const EXPECTED: &'static str = "boolean";

    fn from_node(node: &Node) -> Option<Self> {
        node.as_scalar()?.as_bool()
    }
}

impl FromNode for DateTime<Utc> {
    const EXPECTED: &'static str = "date/time";

    fn from_node(node: &Node) -> Option<Self> {
        node.as_scalar()?.as_datetime()
    }
}

impl FromNode for Vec<u8> {
    const EXPECTED: &'static str = "binary";

    fn from_node(node: &Node) -> Option<Self> {
        node.as_scalar()?.as_bytes()
    }
}

impl FromNode for Arc<Object> {
    const EXPECTED: &'static str = "object";

    fn from_node(node: &Node) -> Option<Self> {
        match node {
            Node::Object(object) => Some(Arc::clone(object)),
            _ => None,
        }
    }
}

impl FromNode for Arc<Array> {
    const EXPECTED: &'static str = "array";

    fn from_node(node: &Node) -> Option<Self> {
        match node {
            Node::Array(array) => Some(Arc::clone(array)),
            _ => None,
        }
    }
}

fn convertible<T: FromNode>(node: Option<&Node>) -> bool {
    node.is_some_and(|node| node.is_null() || T::from_node(node).is_some())
}

fn stored_as<T: FromNode>(node: Option<&Node>) -> bool {
    node.map_or(true, |node| node.is_null() || node.kind() == T::EXPECTED)
}

fn convert<T: FromNode>(node: Option<&Node>, at: &dyn Fn() -> String) -> Result<Option<T>> {
    match node {
        None => Ok(None),
        Some(node) if node.is_null() => Ok(None),
        Some(node) => T::from_node(node)
            .map(Some)
            .ok_or_else(|| TreeError::TypeMismatch {
                path: at(),
                expected: T::EXPECTED,
                found: node.kind(),
            }),
    }
}

fn require<T>(value: Option<T>, at: &dyn Fn() -> String) -> Result<T> {
    value.ok_or_else(|| TreeError::MissingValue { path: at() })
}

impl Object {
    /// Node at `path`, null markers included.
    pub fn get_node(&self, path: impl ToPath) -> Result<Option<&Node>> {
        let path = path.to_path()?;
        Ok(read_path(self, &path))
    }

    /// Check if anything, a null marker included, exists at `path`.
    pub fn contains(&self, path: impl ToPath) -> Result<bool> {
        Ok(self.get_node(path)?.is_some())
    }

    /// Typed value at `path`; `None` when absent or null.
    pub fn get_as<T: FromNode>(&self, path: impl ToPath) -> Result<Option<T>> {
        let path = path.to_path()?;
        convert(read_path(self, &path), &|| path.to_string())
    }

    pub fn get_or<T: FromNode>(&self, path: impl ToPath, default: T) -> Result<T> {
        Ok(self.get_as(path)?.unwrap_or(default))
    }

    pub fn get_required<T: FromNode>(&self, path: impl ToPath) -> Result<T> {
        let path = path.to_path()?;
        let value = convert(read_path(self, &path), &|| path.to_string())?;
        require(value, &|| path.to_string())
    }

    pub fn get_string_or(&self, path: impl ToPath, default: &str) -> Result<String> {
        Ok(self
            .get_as::<String>(path)?
            .unwrap_or_else(|| default.to_string()))
    }

    /// [`Object::get_string_or`] for a member name taken literally.
    pub fn get_string_literal_or(&self, key: &str, default: &str) -> Result<String> {
        self.get_string_or(Path::literal(key), default)
    }

    pub fn get_i64_or(&self, path: impl ToPath, default: i64) -> Result<i64> {
        self.get_or(path, default)
    }

    pub fn get_f64_or(&self, path: impl ToPath, default: f64) -> Result<f64> {
        self.get_or(path, default)
    }

    pub fn get_bool_or(&self, path: impl ToPath, default: bool) -> Result<bool> {
        self.get_or(path, default)
    }

    pub fn get_datetime_or(&self, path: impl ToPath, default: DateTime<Utc>) -> Result<DateTime<Utc>> {
        self.get_or(path, default)
    }

    pub fn get_bytes_or(&self, path: impl ToPath, default: &[u8]) -> Result<Vec<u8>> {
        Ok(self
            .get_as::<Vec<u8>>(path)?
            .unwrap_or_else(|| default.to_vec()))
    }

    pub fn get_string(&self, path: impl ToPath) -> Result<String> {
        self.get_required(path)
    }

    pub fn get_i64(&self, path: impl ToPath) -> Result<i64> {
        self.get_required(path)
    }

    pub fn get_f64(&self, path: impl ToPath) -> Result<f64> {
        self.get_required(path)
    }

    pub fn get_bool(&self, path: impl ToPath) -> Result<bool> {
        self.get_required(path)
    }

    pub fn get_datetime(&self, path: impl ToPath) -> Result<DateTime<Utc>> {
        self.get_required(path)
    }

    pub fn get_bytes(&self, path: impl ToPath) -> Result<Vec<u8>> {
        self.get_required(path)
    }

    pub fn get_object(&self, path: impl ToPath) -> Result<&Object> {
        let path = path.to_path()?;
        match read_path(self, &path) {
            Some(Node::Object(object)) => Ok(&**object),
            Some(node) if !node.is_null() => Err(TreeError::TypeMismatch {
                path: path.to_string(),
                expected: "object",
                found: node.kind(),
            }),
            _ => Err(TreeError::MissingValue {
                path: path.to_string(),
            }),
        }
    }

    pub fn get_array(&self, path: impl ToPath) -> Result<&Array> {
        let path = path.to_path()?;
        match read_path(self, &path) {
            Some(Node::Array(array)) => Ok(&**array),
            Some(node) if !node.is_null() => Err(TreeError::TypeMismatch {
                path: path.to_string(),
                expected: "array",
                found: node.kind(),
            }),
            _ => Err(TreeError::MissingValue {
                path: path.to_string(),
            }),
        }
    }

    /// Object at `path`, or a fresh empty one for a malformed path, a miss
    /// or a node of another shape.
    ///
    /// ```
    /// use formtree::Object;
    ///
    /// let root = Object::new();
    /// let deep = root
    ///     .get_object_or_empty("a")
    ///     .get_object_or_empty("b.c")
    ///     .get_array_or_empty("d");
    /// assert!(deep.is_empty());
    /// ```
    pub fn get_object_or_empty(&self, path: impl ToPath) -> Arc<Object> {
        let found = path
            .to_path()
            .ok()
            .and_then(|path| match read_path(self, &path) {
                Some(Node::Object(object)) => Some(Arc::clone(object)),
                _ => None,
            });
        found.unwrap_or_default()
    }

    /// Array counterpart of [`Object::get_object_or_empty`].
    pub fn get_array_or_empty(&self, path: impl ToPath) -> Arc<Array> {
        let found = path
            .to_path()
            .ok()
            .and_then(|path| match read_path(self, &path) {
                Some(Node::Array(array)) => Some(Arc::clone(array)),
                _ => None,
            });
        found.unwrap_or_default()
    }

    /// First string of a slot that may hold one value or, after a
    /// multi-value merge, an array of them.
    pub fn get_array_first_string(&self, path: impl ToPath, default: &str) -> Result<String> {
        self.get_array_string_at(path, 0, default)
    }

    /// String at `index` of a slot that may hold one value or an array. A
    /// single value counts as a one-element array. Out of range gives
    /// `default`.
    pub fn get_array_string_at(&self, path: impl ToPath, index: usize, default: &str) -> Result<String> {
        let path = path.to_path()?;
        let element = match read_path(self, &path) {
            Some(Node::Array(array)) => array.get(index),
            Some(node) if index == 0 => Some(node),
            _ => None,
        };
        let value = convert::<String>(element, &|| {
            let mut at = path.clone().into_owned();
            at.push_index(index);
            at.to_string()
        })?;
        Ok(value.unwrap_or_else(|| default.to_string()))
    }

    /// Check if the node at `path` is null or converts to `T`. A miss gives
    /// `false`.
    pub fn can_convert<T: FromNode>(&self, path: impl ToPath) -> Result<bool> {
        let path = path.to_path()?;
        Ok(convertible::<T>(read_path(self, &path)))
    }

    /// Check if the node at `path` is stored as a `T`, without conversion.
    /// Absent and null nodes pass for any type.
    ///
    /// ```
    /// use formtree::Tree;
    ///
    /// let mut tree = Tree::new();
    /// tree.put("age", "42").unwrap();
    /// assert!(tree.can_convert::<i64>("age").unwrap());
    /// assert!(!tree.is_of_type::<i64>("age").unwrap());
    /// assert!(tree.is_of_type::<String>("age").unwrap());
    /// ```
    pub fn is_of_type<T: FromNode>(&self, path: impl ToPath) -> Result<bool> {
        let path = path.to_path()?;
        Ok(stored_as::<T>(read_path(self, &path)))
    }
}

impl Array {
    pub fn can_convert<T: FromNode>(&self, index: usize) -> bool {
        convertible::<T>(self.get(index))
    }

    pub fn is_of_type<T: FromNode>(&self, index: usize) -> bool {
        stored_as::<T>(self.get(index))
    }

    pub fn get_as<T: FromNode>(&self, index: usize) -> Result<Option<T>> {
        convert(self.get(index), &|| format!("[{index}]"))
    }

    pub fn get_or<T: FromNode>(&self, index: usize, default: T) -> Result<T> {
        Ok(self.get_as(index)?.unwrap_or(default))
    }

    pub fn get_required<T: FromNode>(&self, index: usize) -> Result<T> {
        let value = self.get_as(index)?;
        require(value, &|| format!("[{index}]"))
    }

    pub fn get_string_or(&self, index: usize, default: &str) -> Result<String> {
        Ok(self
            .get_as::<String>(index)?
            .unwrap_or_else(|| default.to_string()))
    }

    pub fn get_string(&self, index: usize) -> Result<String> {
        self.get_required(index)
    }

    pub fn get_object_or_empty(&self, index: usize) -> Arc<Object> {
        match self.get(index) {
            Some(Node::Object(object)) => Arc::clone(object),
            _ => Arc::default(),
        }
    }

    pub fn get_array_or_empty(&self, index: usize) -> Arc<Array> {
        match self.get(index) {
            Some(Node::Array(array)) => Arc::clone(array),
            _ => Arc::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::navigate::{write, KeyMode, WriteOptions};

    fn doc() -> Object {
        let mut root = Object::new();
        let options = WriteOptions::merge();
        for (key, value) in [
            ("name", Node::from("Stromgol")),
            ("age", Node::from(42)),
            ("ratio", Node::from(0.5)),
            ("flag", Node::from("true")),
            ("tags[0]", Node::from("a")),
            ("tags[1]", Node::from("b")),
            ("user.email", Node::from("x@example.com")),
            ("nothing", Node::null()),
        ] {
            write(&mut root, key, value, KeyMode::Parsed, &options).unwrap();
        }
        root
    }

    #[test]
    fn test_defaults() {
        let root = doc();
        assert_eq!(root.get_string_or("name", "d").unwrap(), "Stromgol");
        assert_eq!(root.get_string_or("missing", "d").unwrap(), "d");
        assert_eq!(root.get_string_or("nothing", "d").unwrap(), "d");
        assert_eq!(root.get_string_or("user.missing.deeper", "d").unwrap(), "d");
        assert_eq!(root.get_i64_or("age", 0).unwrap(), 42);
        assert_eq!(root.get_f64_or("age", 0.0).unwrap(), 42.0);
        assert_eq!(root.get_bool_or("flag", false).unwrap(), true);
        assert_eq!(root.get_i64_or("missing", 7).unwrap(), 7);
    }

    #[test]
    fn test_scalar_to_string() {
        let root = doc();
        assert_eq!(root.get_string("age").unwrap(), "42");
    }

    #[test]
    fn test_type_mismatch() {
        let root = doc();
        assert_eq!(
            root.get_i64_or("name", 0).unwrap_err(),
            TreeError::TypeMismatch {
                path: "name".into(),
                expected: "integer",
                found: "string"
            }
        );
        assert!(matches!(
            root.get_string("user"),
            Err(TreeError::TypeMismatch { found: "object", .. })
        ));
        assert!(matches!(
            root.get_object("name"),
            Err(TreeError::TypeMismatch { expected: "object", .. })
        ));
    }

    #[test]
    fn test_missing_value() {
        let root = doc();
        assert_eq!(
            root.get_string("user.phone").unwrap_err(),
            TreeError::MissingValue {
                path: "user.phone".into()
            }
        );
        assert!(matches!(root.get_i64("nothing"), Err(TreeError::MissingValue { .. })));
        assert!(matches!(root.get_array("nope"), Err(TreeError::MissingValue { .. })));
    }

    #[test]
    fn test_malformed_path_propagates() {
        let root = doc();
        assert!(matches!(
            root.get_string_or("a[", "d"),
            Err(TreeError::MalformedPath(_))
        ));
    }

    #[test]
    fn test_or_empty_is_total() {
        let root = doc();
        assert!(root.get_object_or_empty("a[").is_empty());
        assert!(root.get_object_or_empty("name").is_empty());
        assert!(root.get_array_or_empty("user").is_empty());
        assert_eq!(root.get_array_or_empty("tags").len(), 2);
        assert_eq!(
            root.get_object_or_empty("user")
                .get_string_or("email", "")
                .unwrap(),
            "x@example.com"
        );
    }

    #[test]
    fn test_conversion_checks() {
        let root = doc();
        assert!(root.can_convert::<bool>("flag").unwrap());
        assert!(!root.is_of_type::<bool>("flag").unwrap());
        assert!(root.is_of_type::<String>("flag").unwrap());
        assert!(root.can_convert::<String>("age").unwrap());
        assert!(!root.can_convert::<i64>("name").unwrap());
        assert!(root.can_convert::<Arc<Object>>("user").unwrap());
        assert!(root.is_of_type::<Arc<Array>>("tags").unwrap());
        assert!(!root.is_of_type::<Arc<Object>>("tags").unwrap());

        // Null converts to anything; a miss to nothing.
        assert!(root.can_convert::<f64>("nothing").unwrap());
        assert!(!root.can_convert::<f64>("missing").unwrap());
        assert!(root.is_of_type::<f64>("missing").unwrap());

        assert!(root.can_convert::<String>("a[").is_err());

        let tags = root.get_array("tags").unwrap();
        assert!(tags.is_of_type::<String>(0));
        assert!(!tags.can_convert::<i64>(1));
        assert!(!tags.can_convert::<String>(2));
    }

    #[test]
    fn test_array_strings() {
        let root = doc();
        assert_eq!(root.get_array_first_string("tags", "d").unwrap(), "a");
        assert_eq!(root.get_array_string_at("tags", 1, "d").unwrap(), "b");
        assert_eq!(root.get_array_string_at("tags", 9, "d").unwrap(), "d");
        assert_eq!(root.get_array_first_string("name", "d").unwrap(), "Stromgol");
        assert_eq!(root.get_array_string_at("name", 1, "d").unwrap(), "d");
        assert_eq!(root.get_array_first_string("missing", "d").unwrap(), "d");
    }

    #[test]
    fn test_literal_key() {
        let mut root = Object::new();
        root.insert("a.b", "literal");
        assert_eq!(root.get_string_literal_or("a.b", "d").unwrap(), "literal");
        assert_eq!(root.get_string_or("a.b", "d").unwrap(), "d");
        assert!(root.contains(Path::literal("a.b")).unwrap());
    }

    #[test]
    fn test_array_accessors() {
        let arr = Array::from_iter([Node::from("1"), Node::null(), Node::from(Object::new())]);
        assert_eq!(arr.get_or::<i64>(0, 0).unwrap(), 1);
        assert_eq!(arr.get_string_or(1, "d").unwrap(), "d");
        assert_eq!(arr.get_string_or(5, "d").unwrap(), "d");
        assert!(matches!(arr.get_string(1), Err(TreeError::MissingValue { .. })));
        assert!(arr.get_object_or_empty(2).is_empty());
        assert!(arr.get_array_or_empty(0).is_empty());
        assert!(matches!(
            arr.get_string(2),
            Err(TreeError::TypeMismatch { path, .. }) if path == "[2]"
        ));
    }
}
