//! Path resolution against an object root.
//!
//! Writes create whatever containers the path needs on the way down
//! (auto-vivification) and grow arrays with null markers. Reads never
//! create nor mutate anything.

use std::sync::Arc;

use formtree_path::{Accessor, Path, PathError, PathLimits, PathParser};
use serde::Deserialize;
use tracing::debug;

use crate::error::{Result, TreeError};
use crate::merge;
use crate::node::{Array, Node, Object};

/// How a raw key string is turned into a path.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum KeyMode {
    /// Parse the key as a path expression.
    #[default]
    Parsed,
    /// Use the whole key as a single member name of the root.
    Literal,
}

/// What happens to the value already at the target slot.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum WriteMode {
    /// Multi-value merge, see [`merge::assign`].
    #[default]
    Merge,
    /// Overwrite.
    Replace,
}

/// What to do when an intermediate node has the wrong shape for the next
/// accessor (a scalar where an object is needed, an array where a key
/// follows, ...).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ShapeConflictPolicy {
    /// Discard the node and put an empty container of the right shape in
    /// its place.
    #[default]
    Replace,
    /// Fail with [`TreeError::ShapeConflict`].
    Error,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct WriteOptions {
    pub mode: WriteMode,
    pub shape_conflict: ShapeConflictPolicy,
    pub limits: PathLimits,
}

impl WriteOptions {
    pub fn merge() -> Self {
        Self::default()
    }

    pub fn replace() -> Self {
        Self {
            mode: WriteMode::Replace,
            ..Self::default()
        }
    }

    pub fn with_mode(mut self, mode: WriteMode) -> Self {
        self.mode = mode;
        self
    }

    pub fn with_shape_conflict(mut self, policy: ShapeConflictPolicy) -> Self {
        self.shape_conflict = policy;
        self
    }

    pub fn with_limits(mut self, limits: PathLimits) -> Self {
        self.limits = limits;
        self
    }
}

/// Turn a raw key into a path according to `mode`.
pub fn resolve(key: &str, mode: KeyMode, limits: PathLimits) -> Result<Path> {
    match mode {
        KeyMode::Parsed => Ok(PathParser::parse_with_limits(key, limits)?),
        KeyMode::Literal => Ok(Path::literal(key)),
    }
}

/// Write `value` at `key`.
///
/// # Example
///
/// ```
/// use formtree::navigate::{read, write, KeyMode, WriteOptions};
/// use formtree::{Node, Object};
///
/// let mut root = Object::new();
/// let options = WriteOptions::merge();
/// write(&mut root, "a.b[1]", "x", KeyMode::Parsed, &options).unwrap();
///
/// let found = read(&root, "a.b[1]", KeyMode::Parsed, options.limits).unwrap();
/// assert_eq!(found, Some(&Node::from("x")));
/// let hole = read(&root, "a.b[0]", KeyMode::Parsed, options.limits).unwrap();
/// assert_eq!(hole, Some(&Node::null()));
/// ```
pub fn write(
    root: &mut Object,
    key: &str,
    value: impl Into<Node>,
    mode: KeyMode,
    options: &WriteOptions,
) -> Result<()> {
    let path = resolve(key, mode, options.limits)?;
    write_path(root, &path, value.into(), options)
}

/// Write `value` at an already resolved path.
///
/// Index accessors above `options.limits.max_array_index` are rejected before
/// anything is written.
pub fn write_path(root: &mut Object, path: &Path, value: Node, options: &WriteOptions) -> Result<()> {
    let (first, rest) = split_root(path)?;
    check_indexes(rest, options.limits)?;

    let mut slot = root.slot(first);
    for (i, accessor) in rest.iter().enumerate() {
        slot = descend(slot, accessor, path, i + 1, options)?;
    }

    match options.mode {
        WriteMode::Merge => merge::assign(slot, value),
        WriteMode::Replace => *slot = value,
    }
    Ok(())
}

/// Find the node at `key`.
pub fn read<'a>(
    root: &'a Object,
    key: &str,
    mode: KeyMode,
    limits: PathLimits,
) -> Result<Option<&'a Node>> {
    let path = resolve(key, mode, limits)?;
    Ok(read_path(root, &path))
}

pub fn read_path<'a>(root: &'a Object, path: &Path) -> Option<&'a Node> {
    let mut accessors = path.iter();
    let mut current = match accessors.next()? {
        Accessor::Key(key) => root.get(key)?,
        Accessor::Index(_) => return None,
    };

    for accessor in accessors {
        current = match (current, accessor) {
            (Node::Object(object), Accessor::Key(key)) => object.get(key)?,
            (Node::Array(array), Accessor::Index(index)) => array.get(*index)?,
            _ => return None,
        };
    }
    Some(current)
}

/// Check if a node, null included, exists at `key`.
pub fn exists(root: &Object, key: &str, mode: KeyMode, limits: PathLimits) -> Result<bool> {
    Ok(read(root, key, mode, limits)?.is_some())
}

/// Remove and return the node at `key`. Array elements after a removed one
/// shift down.
pub fn remove(root: &mut Object, key: &str, mode: KeyMode, limits: PathLimits) -> Result<Option<Node>> {
    let path = resolve(key, mode, limits)?;
    Ok(remove_path(root, &path))
}

pub fn remove_path(root: &mut Object, path: &Path) -> Option<Node> {
    // Nothing gets unshared for a miss.
    read_path(root, path)?;

    let (last, parents) = path.accessors.split_last()?;
    let Some((first, rest)) = parents.split_first() else {
        return match last {
            Accessor::Key(key) => root.remove(key),
            Accessor::Index(_) => None,
        };
    };

    let mut current = match first {
        Accessor::Key(key) => root.get_mut(key)?,
        Accessor::Index(_) => return None,
    };
    for accessor in rest {
        current = match (current, accessor) {
            (Node::Object(object), Accessor::Key(key)) => Arc::make_mut(object).get_mut(key)?,
            (Node::Array(array), Accessor::Index(index)) => Arc::make_mut(array).get_mut(*index)?,
            _ => return None,
        };
    }

    match (current, last) {
        (Node::Object(object), Accessor::Key(key)) => Arc::make_mut(object).remove(key),
        (Node::Array(array), Accessor::Index(index)) => Arc::make_mut(array).remove(*index),
        _ => None,
    }
}

/// Mutable access to the node at `path`. Containers on the way are unshared;
/// nothing is created.
pub fn read_path_mut<'a>(root: &'a mut Object, path: &Path) -> Option<&'a mut Node> {
    read_path(root, path)?;

    let (first, rest) = path.accessors.split_first()?;
    let mut current = match first {
        Accessor::Key(key) => root.get_mut(key)?,
        Accessor::Index(_) => return None,
    };
    for accessor in rest {
        current = match (current, accessor) {
            (Node::Object(object), Accessor::Key(key)) => Arc::make_mut(object).get_mut(key)?,
            (Node::Array(array), Accessor::Index(index)) => Arc::make_mut(array).get_mut(*index)?,
            _ => return None,
        };
    }
    Some(current)
}

fn check_indexes(accessors: &[Accessor], limits: PathLimits) -> Result<()> {
    for accessor in accessors {
        if let Accessor::Index(index) = accessor {
            if *index > limits.max_array_index {
                return Err(PathError::IndexTooLarge {
                    index: index.to_string(),
                    max: limits.max_array_index,
                }
                .into());
            }
        }
    }
    Ok(())
}

fn split_root(path: &Path) -> Result<(&str, &[Accessor])> {
    match path.accessors.split_first() {
        Some((Accessor::Key(key), rest)) => Ok((key.as_str(), rest)),
        Some((Accessor::Index(_), _)) => Err(PathError::LeadingIndex { position: 0 }.into()),
        None => Err(PathError::Empty.into()),
    }
}

/// Step from `slot` into the child addressed by `next`, shaping `slot` as
/// needed. `depth` is the number of accessors leading to `slot`.
fn descend<'n>(
    slot: &'n mut Node,
    next: &Accessor,
    path: &Path,
    depth: usize,
    options: &WriteOptions,
) -> Result<&'n mut Node> {
    match next {
        Accessor::Key(key) => {
            let object = ensure_object(slot, path, depth, options)?;
            Ok(object.slot(key))
        }
        Accessor::Index(index) => {
            let array = ensure_array(slot, path, depth, options)?;
            let added = array.pad_to(index + 1);
            if added > 1 {
                debug!(path = %prefix(path, depth), index, added, "array padded with null markers");
            }
            Ok(&mut array.items[*index])
        }
    }
}

fn ensure_object<'n>(
    slot: &'n mut Node,
    path: &Path,
    depth: usize,
    options: &WriteOptions,
) -> Result<&'n mut Object> {
    if !slot.is_object() {
        if !slot.is_null() {
            on_conflict(slot, "object", path, depth, options)?;
        }
        *slot = Node::from(Object::new());
    }
    slot.as_object_mut().ok_or_else(|| TreeError::ShapeConflict {
        path: prefix(path, depth),
        expected: "object",
    })
}

fn ensure_array<'n>(
    slot: &'n mut Node,
    path: &Path,
    depth: usize,
    options: &WriteOptions,
) -> Result<&'n mut Array> {
    if !slot.is_array() {
        if !slot.is_null() {
            on_conflict(slot, "array", path, depth, options)?;
        }
        *slot = Node::from(Array::new());
    }
    slot.as_array_mut().ok_or_else(|| TreeError::ShapeConflict {
        path: prefix(path, depth),
        expected: "array",
    })
}

fn on_conflict(
    found: &Node,
    expected: &'static str,
    path: &Path,
    depth: usize,
    options: &WriteOptions,
) -> Result<()> {
    let at = prefix(path, depth);
    match options.shape_conflict {
        ShapeConflictPolicy::Replace => {
            debug!(path = %at, found = found.kind(), expected, "replacing node with an empty container");
            Ok(())
        }
        ShapeConflictPolicy::Error => Err(TreeError::ShapeConflict { path: at, expected }),
    }
}

fn prefix(path: &Path, depth: usize) -> String {
    Path::new(path.accessors[..depth].to_vec()).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use formtree_path::parse_path;

    fn put(root: &mut Object, key: &str, value: impl Into<Node>) {
        write(root, key, value, KeyMode::Parsed, &WriteOptions::merge()).unwrap();
    }

    fn get<'a>(root: &'a Object, key: &str) -> Option<&'a Node> {
        read(root, key, KeyMode::Parsed, PathLimits::default()).unwrap()
    }

    #[test]
    fn test_auto_vivification() {
        let mut root = Object::new();
        put(&mut root, "a.b[2].c", 1);
        assert!(get(&root, "a").unwrap().is_object());
        assert!(get(&root, "a.b").unwrap().is_array());
        assert_eq!(get(&root, "a.b").unwrap().as_array().unwrap().len(), 3);
        assert!(get(&root, "a.b[2]").unwrap().is_object());
        assert_eq!(get(&root, "a.b[2].c"), Some(&Node::from(1)));
    }

    #[test]
    fn test_array_growth() {
        let mut root = Object::new();
        put(&mut root, "arr[5]", "x");
        let arr = get(&root, "arr").unwrap().as_array().unwrap();
        assert_eq!(arr.len(), 6);
        assert!(arr.iter().take(5).all(Node::is_null));
        assert_eq!(arr.get(5), Some(&Node::from("x")));
    }

    #[test]
    fn test_existing_array_slot_written_in_place() {
        let mut root = Object::new();
        put(&mut root, "arr[2]", "c");
        put(&mut root, "arr[0]", "a");
        let arr = get(&root, "arr").unwrap().as_array().unwrap();
        assert_eq!(arr.len(), 3);
        assert_eq!(arr.get(0), Some(&Node::from("a")));
        assert_eq!(arr.get(1), Some(&Node::null()));
    }

    #[test]
    fn test_merge_mode() {
        let mut root = Object::new();
        put(&mut root, "k", "v1");
        put(&mut root, "k", "v2");
        assert_eq!(
            get(&root, "k"),
            Some(&Node::from(Array::from_iter(["v1", "v2"])))
        );
    }

    #[test]
    fn test_replace_mode() {
        let mut root = Object::new();
        let options = WriteOptions::replace();
        write(&mut root, "k", "v1", KeyMode::Parsed, &options).unwrap();
        write(&mut root, "k", "v2", KeyMode::Parsed, &options).unwrap();
        assert_eq!(get(&root, "k"), Some(&Node::from("v2")));
    }

    #[test]
    fn test_literal_mode() {
        let mut root = Object::new();
        let options = WriteOptions::merge();
        write(&mut root, "a.b[0]", 1, KeyMode::Literal, &options).unwrap();
        assert_eq!(root.get("a.b[0]"), Some(&Node::from(1)));
        assert!(get(&root, "a").is_none());
    }

    #[test]
    fn test_shape_conflict_replaced() {
        let mut root = Object::new();
        put(&mut root, "a", "scalar");
        put(&mut root, "a.b", 1);
        assert_eq!(get(&root, "a.b"), Some(&Node::from(1)));

        put(&mut root, "a[0]", 2);
        assert!(get(&root, "a").unwrap().is_array());
    }

    #[test]
    fn test_shape_conflict_error() {
        let mut root = Object::new();
        put(&mut root, "a.b", "scalar");
        let options = WriteOptions::merge().with_shape_conflict(ShapeConflictPolicy::Error);
        let err = write(&mut root, "a.b.c", 1, KeyMode::Parsed, &options).unwrap_err();
        assert_eq!(
            err,
            TreeError::ShapeConflict {
                path: "a.b".into(),
                expected: "object"
            }
        );
        assert_eq!(get(&root, "a.b"), Some(&Node::from("scalar")));
    }

    #[test]
    fn test_read_does_not_create() {
        let root = Object::new();
        assert!(get(&root, "a.b[3]").is_none());
        assert!(root.is_empty());
    }

    #[test]
    fn test_read_wrong_shape_is_none() {
        let mut root = Object::new();
        put(&mut root, "a.b", 1);
        assert!(get(&root, "a[0]").is_none());
        assert!(get(&root, "a.b.c").is_none());
    }

    #[test]
    fn test_malformed_path() {
        let mut root = Object::new();
        let err = write(&mut root, "a[", 1, KeyMode::Parsed, &WriteOptions::merge()).unwrap_err();
        assert!(matches!(err, TreeError::MalformedPath(_)));
        assert!(root.is_empty());
    }

    #[test]
    fn test_remove() {
        let mut root = Object::new();
        put(&mut root, "a.list[0]", "x");
        put(&mut root, "a.list[1]", "y");
        put(&mut root, "a.name", "n");
        let limits = PathLimits::default();

        assert_eq!(
            remove(&mut root, "a.list[0]", KeyMode::Parsed, limits).unwrap(),
            Some(Node::from("x"))
        );
        assert_eq!(get(&root, "a.list[0]"), Some(&Node::from("y")));
        assert_eq!(
            remove(&mut root, "a.name", KeyMode::Parsed, limits).unwrap(),
            Some(Node::from("n"))
        );
        assert_eq!(remove(&mut root, "a.missing", KeyMode::Parsed, limits).unwrap(), None);
        assert!(!exists(&root, "a.name", KeyMode::Parsed, limits).unwrap());
    }

    #[test]
    fn test_exists_with_null() {
        let mut root = Object::new();
        put(&mut root, "arr[1]", 1);
        let limits = PathLimits::default();
        assert!(exists(&root, "arr[0]", KeyMode::Parsed, limits).unwrap());
        assert!(!exists(&root, "arr[2]", KeyMode::Parsed, limits).unwrap());
    }

    #[test]
    fn test_leading_index_path_rejected() {
        let mut root = Object::new();
        let path = Path::new(vec![Accessor::Index(0)]);
        let err = write_path(&mut root, &path, Node::null(), &WriteOptions::merge()).unwrap_err();
        assert!(matches!(err, TreeError::MalformedPath(PathError::LeadingIndex { .. })));
    }

    #[test]
    fn test_programmatic_index_over_limit_rejected() {
        let mut root = Object::new();
        for index in [usize::MAX, 1 << 40, 10_001] {
            let path = Path::new(vec![Accessor::from("a"), Accessor::Index(index)]);
            let err = write_path(&mut root, &path, Node::from(1), &WriteOptions::merge()).unwrap_err();
            assert_eq!(
                err,
                TreeError::MalformedPath(PathError::IndexTooLarge {
                    index: index.to_string(),
                    max: 10_000,
                })
            );
        }
        assert!(root.is_empty());

        let path = Path::new(vec![Accessor::from("a"), Accessor::Index(10_000)]);
        write_path(&mut root, &path, Node::from(1), &WriteOptions::merge()).unwrap();
        assert_eq!(get(&root, "a[10000]"), Some(&Node::from(1)));
    }

    #[test]
    fn test_read_path_mut() {
        let mut root = Object::new();
        put(&mut root, "a.list[1].x", 1);
        let shared = root.clone();

        let path = parse_path("a.list[1].x").unwrap();
        *read_path_mut(&mut root, &path).unwrap() = Node::from(2);
        assert_eq!(get(&root, "a.list[1].x"), Some(&Node::from(2)));
        assert_eq!(get(&shared, "a.list[1].x"), Some(&Node::from(1)));

        let missing = parse_path("a.list[5]").unwrap();
        assert!(read_path_mut(&mut root, &missing).is_none());
        assert_eq!(get(&root, "a.list").unwrap().as_array().unwrap().len(), 2);
    }
}
