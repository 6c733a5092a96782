//! In-place node transforms: a function applied to one node or to every
//! member, and trimming of string values built on it.

use std::sync::Arc;

use formtree_path::{Path, PathError, PathLimits, ToPath};

use crate::error::Result;
use crate::navigate::{read_path_mut, write_path, WriteOptions};
use crate::node::{Array, Node, Object};
use crate::scalar::Scalar;

/// Trimmed copy of a string value. Anything else is returned as is.
pub fn trim_node(node: Node) -> Node {
    match node {
        Node::Scalar(Scalar::String(s)) if s.trim().len() != s.len() => Node::from(s.trim()),
        other => other,
    }
}

/// Replace the node at `path` with `f(node)`.
///
/// A missing node is passed to `f` as null. The result is written back with
/// `options`, creating the path, unless it is null.
pub(crate) fn transform_path(
    root: &mut Object,
    path: &Path,
    f: impl FnOnce(Node) -> Node,
    options: &WriteOptions,
) -> Result<()> {
    match read_path_mut(root, path) {
        Some(slot) => {
            let value = std::mem::take(slot);
            *slot = f(value);
            Ok(())
        }
        None => {
            let value = f(Node::null());
            if value.is_null() {
                return Ok(());
            }
            write_path(root, path, value, options)
        }
    }
}

fn transform_node<F: FnMut(Node) -> Node>(node: &mut Node, f: &mut F, recursive: bool) {
    let value = std::mem::take(node);
    *node = f(value);
    if !recursive {
        return;
    }
    match node {
        Node::Object(object) => transform_members(Arc::make_mut(object), f, true),
        Node::Array(array) => transform_items(Arc::make_mut(array), f, true),
        Node::Scalar(_) => {}
    }
}

fn transform_members<F: FnMut(Node) -> Node>(object: &mut Object, f: &mut F, recursive: bool) {
    for node in object.entries.values_mut() {
        transform_node(node, f, recursive);
    }
}

fn transform_items<F: FnMut(Node) -> Node>(array: &mut Array, f: &mut F, recursive: bool) {
    for node in array.items.iter_mut() {
        transform_node(node, f, recursive);
    }
}

impl Object {
    /// Replace the node at `path` with `f(node)`, see [`Tree::transform`].
    ///
    /// [`Tree::transform`]: crate::Tree::transform
    pub fn transform(&mut self, path: impl ToPath, f: impl FnOnce(Node) -> Node) -> Result<()> {
        let path = path.to_path()?;
        transform_path(self, &path, f, &WriteOptions::replace())
    }

    /// Apply `f` to every member. With `recursive`, containers returned by
    /// `f` are walked too.
    pub fn transform_all(&mut self, mut f: impl FnMut(Node) -> Node, recursive: bool) {
        transform_members(self, &mut f, recursive);
    }

    pub fn trim(&mut self, path: impl ToPath) -> Result<()> {
        self.transform(path, trim_node)
    }

    pub fn trim_all(&mut self, recursive: bool) {
        self.transform_all(trim_node, recursive);
    }
}

impl Array {
    /// Replace the element at `index` with `f(element)`. Past the end the
    /// array grows with null markers, unless `f` returns null.
    pub fn transform(&mut self, index: usize, f: impl FnOnce(Node) -> Node) -> Result<()> {
        if let Some(slot) = self.get_mut(index) {
            let value = std::mem::take(slot);
            *slot = f(value);
            return Ok(());
        }
        let max = PathLimits::default().max_array_index;
        if index > max {
            return Err(PathError::IndexTooLarge {
                index: index.to_string(),
                max,
            }
            .into());
        }
        let value = f(Node::null());
        if !value.is_null() {
            self.pad_to(index + 1);
            self.items[index] = value;
        }
        Ok(())
    }

    pub fn transform_all(&mut self, mut f: impl FnMut(Node) -> Node, recursive: bool) {
        transform_items(self, &mut f, recursive);
    }

    pub fn trim(&mut self, index: usize) -> Result<()> {
        self.transform(index, trim_node)
    }

    pub fn trim_all(&mut self, recursive: bool) {
        self.transform_all(trim_node, recursive);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::TreeError;

    fn sample() -> Object {
        let mut inner = Object::new();
        inner.insert("name", "  Stromgol ");
        inner.insert("tags", Array::from_iter([" a", "b "]));
        let mut root = Object::new();
        root.insert("title", " Dune ");
        root.insert("count", 3);
        root.insert("user", inner);
        root
    }

    #[test]
    fn test_trim_one_path() {
        let mut root = sample();
        root.trim("user.name").unwrap();
        assert_eq!(root.get_string("user.name").unwrap(), "Stromgol");
        assert_eq!(root.get_string("title").unwrap(), " Dune ");
    }

    #[test]
    fn test_trim_all_shallow_and_recursive() {
        let mut shallow = sample();
        shallow.trim_all(false);
        assert_eq!(shallow.get_string("title").unwrap(), "Dune");
        assert_eq!(shallow.get_string("user.name").unwrap(), "  Stromgol ");

        let mut deep = sample();
        deep.trim_all(true);
        assert_eq!(deep.get_string("user.name").unwrap(), "Stromgol");
        assert_eq!(deep.get_string("user.tags[0]").unwrap(), "a");
        assert_eq!(deep.get_string("user.tags[1]").unwrap(), "b");
        assert_eq!(deep.get_i64("count").unwrap(), 3);
    }

    #[test]
    fn test_transform_does_not_leak_into_shared_clones() {
        let mut root = sample();
        let before = root.clone();
        root.trim_all(true);
        assert_eq!(before.get_string("user.name").unwrap(), "  Stromgol ");
    }

    #[test]
    fn test_transform_missing_path() {
        let mut root = Object::new();
        root.transform("a.b", |node| node).unwrap();
        assert!(root.is_empty());

        root.transform("a.b[1]", |node| {
            assert!(node.is_null());
            Node::from("x")
        })
        .unwrap();
        assert_eq!(root.get_string("a.b[1]").unwrap(), "x");
    }

    #[test]
    fn test_transform_recurses_into_returned_containers() {
        let mut root = Object::new();
        root.insert("a", " x ");
        let mut calls = 0;
        root.transform_all(
            |node| {
                calls += 1;
                match node {
                    Node::Scalar(Scalar::String(_)) if calls == 1 => {
                        Node::from(Array::from_iter([" y "]))
                    }
                    other => trim_node(other),
                }
            },
            true,
        );
        assert_eq!(calls, 2);
        assert_eq!(root.get_string("a[0]").unwrap(), "y");
    }

    #[test]
    fn test_array_transform() {
        let mut array = Array::from_iter([" a "]);
        array.trim(0).unwrap();
        assert_eq!(array.get_string(0).unwrap(), "a");

        array.transform(2, |_| Node::from(1)).unwrap();
        assert_eq!(array.len(), 3);
        assert!(array.get(1).unwrap().is_null());

        array.transform(5, |node| node).unwrap();
        assert_eq!(array.len(), 3);

        assert!(matches!(
            array.transform(usize::MAX, |_| Node::from(1)),
            Err(TreeError::MalformedPath(PathError::IndexTooLarge { .. }))
        ));
    }
}
