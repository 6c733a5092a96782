//! Owning document with an immutability switch.

use std::borrow::Cow;
use std::ops::Deref;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use formtree_path::{Path, ToPath};

use crate::access::FromNode;
use crate::config::TreeConfig;
use crate::error::{Result, TreeError};
use crate::navigate::{self, KeyMode, WriteMode};
use crate::node::{Array, Node, Object};
use crate::transform::{transform_path, trim_node};

/// Read accessors that parse their path with the tree's limits before
/// handing it to the [`Object`] accessor of the same name.
macro_rules! read_with_limits {
    ($($name:ident($($arg:ident: $ty:ty),*) -> $ret:ty;)*) => {
        $(
            pub fn $name(&self, path: impl ToPath, $($arg: $ty),*) -> Result<$ret> {
                let path = self.resolve(&path)?;
                self.root.$name(&*path, $($arg),*)
            }
        )*
    };
}

/// A document: an object root, a mutability flag and the configuration
/// used for its writes.
///
/// Path reads parse with the tree's limits; the rest of the read API comes
/// through [`Deref`] to the root [`Object`]. Mutators fail with
/// [`TreeError::ImmutableViolation`] once the tree is frozen.
///
/// ```
/// use formtree::{Tree, TreeError};
///
/// let mut tree = Tree::new();
/// tree.put("user.name", "Stromgol").unwrap();
///
/// let snapshot = tree.freeze();
/// assert_eq!(snapshot.get_string("user.name").unwrap(), "Stromgol");
///
/// let mut copy = snapshot.clone();
/// assert_eq!(copy.put("user.name", "x"), Err(TreeError::ImmutableViolation));
///
/// let mut editable = snapshot.to_mutable();
/// editable.put("user.name", "x").unwrap();
/// assert_eq!(snapshot.get_string("user.name").unwrap(), "Stromgol");
/// ```
#[derive(Debug, Clone)]
pub struct Tree {
    root: Arc<Object>,
    mutable: bool,
    config: Arc<TreeConfig>,
}

impl Default for Tree {
    fn default() -> Self {
        Self::new()
    }
}

impl Tree {
    pub fn new() -> Self {
        Self::with_config(TreeConfig::default())
    }

    pub fn with_config(config: TreeConfig) -> Self {
        Self {
            root: Arc::default(),
            mutable: true,
            config: Arc::new(config),
        }
    }

    /// Wrap an existing object as a mutable tree.
    pub fn from_object(root: Object, config: TreeConfig) -> Self {
        Self {
            root: Arc::new(root),
            mutable: true,
            config: Arc::new(config),
        }
    }

    pub fn root(&self) -> &Object {
        &self.root
    }

    pub fn config(&self) -> &TreeConfig {
        &self.config
    }

    pub fn is_mutable(&self) -> bool {
        self.mutable
    }

    /// Parse `expr` with this tree's limits.
    pub fn path(&self, expr: &str) -> Result<Path> {
        navigate::resolve(expr, KeyMode::Parsed, self.config.limits())
    }

    fn resolve<'p>(&self, path: &'p impl ToPath) -> Result<Cow<'p, Path>> {
        Ok(path.to_path_with(self.config.limits())?)
    }

    fn root_mut(&mut self) -> Result<&mut Object> {
        if !self.mutable {
            return Err(TreeError::ImmutableViolation);
        }
        Ok(Arc::make_mut(&mut self.root))
    }

    fn write(&mut self, key: &str, value: Node, key_mode: KeyMode, mode: WriteMode) -> Result<()> {
        let options = self.config.write_options(mode);
        let root = self.root_mut()?;
        navigate::write(root, key, value, key_mode, &options)
    }

    /// Set the value at `path`, replacing what was there.
    pub fn put(&mut self, path: &str, value: impl Into<Node>) -> Result<()> {
        self.write(path, value.into(), KeyMode::Parsed, WriteMode::Replace)
    }

    /// Set the member named `key` on the root, without path parsing.
    pub fn put_literal(&mut self, key: &str, value: impl Into<Node>) -> Result<()> {
        self.write(key, value.into(), KeyMode::Literal, WriteMode::Replace)
    }

    /// Add a value at `path` with multi-value merge: a second value at the
    /// same path turns the slot into an array.
    pub fn add(&mut self, path: &str, value: impl Into<Node>) -> Result<()> {
        self.write(path, value.into(), KeyMode::Parsed, WriteMode::Merge)
    }

    pub fn add_literal(&mut self, key: &str, value: impl Into<Node>) -> Result<()> {
        self.write(key, value.into(), KeyMode::Literal, WriteMode::Merge)
    }

    pub fn remove(&mut self, path: &str) -> Result<Option<Node>> {
        let limits = self.config.limits();
        navigate::remove(self.root_mut()?, path, KeyMode::Parsed, limits)
    }

    pub fn remove_literal(&mut self, key: &str) -> Result<Option<Node>> {
        Ok(self.root_mut()?.remove(key))
    }

    pub fn clear(&mut self) -> Result<()> {
        self.root_mut()?.clear();
        Ok(())
    }

    /// Node at `path`, parsed with this tree's limits.
    pub fn find(&self, path: &str) -> Result<Option<&Node>> {
        navigate::read(&self.root, path, KeyMode::Parsed, self.config.limits())
    }

    /// Check if anything, a null marker included, is at `path`.
    pub fn exists(&self, path: &str) -> Result<bool> {
        navigate::exists(&self.root, path, KeyMode::Parsed, self.config.limits())
    }

    /// Replace the node at `path` with `f(node)`.
    ///
    /// A missing node is passed to `f` as null, and a non-null result is
    /// written back with auto-vivification.
    ///
    /// ```
    /// use formtree::{Node, Tree};
    ///
    /// let mut tree = Tree::new();
    /// tree.put("user.name", " Stromgol ").unwrap();
    /// tree.trim("user.name").unwrap();
    /// tree.transform("user.visits", |n| Node::from(n.as_scalar().and_then(|s| s.as_i64()).unwrap_or(0) + 1))
    ///     .unwrap();
    /// assert_eq!(tree.get_string("user.name").unwrap(), "Stromgol");
    /// assert_eq!(tree.get_i64("user.visits").unwrap(), 1);
    /// ```
    pub fn transform(&mut self, path: impl ToPath, f: impl FnOnce(Node) -> Node) -> Result<()> {
        let options = self.config.write_options(WriteMode::Replace);
        let path = path.to_path_with(options.limits)?;
        transform_path(self.root_mut()?, &path, f, &options)
    }

    /// Apply `f` to every member of the root, and with `recursive` to
    /// everything below.
    pub fn transform_all(&mut self, f: impl FnMut(Node) -> Node, recursive: bool) -> Result<()> {
        self.root_mut()?.transform_all(f, recursive);
        Ok(())
    }

    /// Trim the string at `path`. Other values are left alone.
    pub fn trim(&mut self, path: impl ToPath) -> Result<()> {
        self.transform(path, trim_node)
    }

    pub fn trim_all(&mut self, recursive: bool) -> Result<()> {
        self.transform_all(trim_node, recursive)
    }

    read_with_limits! {
        get_node() -> Option<&Node>;
        contains() -> bool;
        get_string_or(default: &str) -> String;
        get_i64_or(default: i64) -> i64;
        get_f64_or(default: f64) -> f64;
        get_bool_or(default: bool) -> bool;
        get_datetime_or(default: DateTime<Utc>) -> DateTime<Utc>;
        get_bytes_or(default: &[u8]) -> Vec<u8>;
        get_string() -> String;
        get_i64() -> i64;
        get_f64() -> f64;
        get_bool() -> bool;
        get_datetime() -> DateTime<Utc>;
        get_bytes() -> Vec<u8>;
        get_object() -> &Object;
        get_array() -> &Array;
        get_array_first_string(default: &str) -> String;
        get_array_string_at(index: usize, default: &str) -> String;
    }

    pub fn get_as<T: FromNode>(&self, path: impl ToPath) -> Result<Option<T>> {
        let path = self.resolve(&path)?;
        self.root.get_as(&*path)
    }

    pub fn get_or<T: FromNode>(&self, path: impl ToPath, default: T) -> Result<T> {
        let path = self.resolve(&path)?;
        self.root.get_or(&*path, default)
    }

    pub fn get_required<T: FromNode>(&self, path: impl ToPath) -> Result<T> {
        let path = self.resolve(&path)?;
        self.root.get_required(&*path)
    }

    pub fn can_convert<T: FromNode>(&self, path: impl ToPath) -> Result<bool> {
        let path = self.resolve(&path)?;
        self.root.can_convert::<T>(&*path)
    }

    pub fn is_of_type<T: FromNode>(&self, path: impl ToPath) -> Result<bool> {
        let path = self.resolve(&path)?;
        self.root.is_of_type::<T>(&*path)
    }

    /// See [`Object::get_object_or_empty`]. The returned object is detached
    /// and reads through it use the default limits.
    pub fn get_object_or_empty(&self, path: impl ToPath) -> Arc<Object> {
        match self.resolve(&path) {
            Ok(path) => self.root.get_object_or_empty(&*path),
            Err(_) => Arc::default(),
        }
    }

    pub fn get_array_or_empty(&self, path: impl ToPath) -> Arc<Array> {
        match self.resolve(&path) {
            Ok(path) => self.root.get_array_or_empty(&*path),
            Err(_) => Arc::default(),
        }
    }

    /// Immutable snapshot sharing this tree's structure. Later writes to
    /// `self` are not visible through the snapshot.
    pub fn freeze(&self) -> Tree {
        Tree {
            root: Arc::clone(&self.root),
            mutable: false,
            config: Arc::clone(&self.config),
        }
    }

    pub fn into_frozen(mut self) -> Tree {
        self.mutable = false;
        self
    }

    /// Mutable, fully independent copy.
    pub fn to_mutable(&self) -> Tree {
        Tree {
            root: Arc::new(self.root.clone_deep()),
            mutable: true,
            config: Arc::clone(&self.config),
        }
    }

    /// Deep copy of the root.
    pub fn to_object(&self) -> Object {
        self.root.clone_deep()
    }

    pub fn into_node(self) -> Node {
        Node::Object(self.root)
    }
}

impl Deref for Tree {
    type Target = Object;

    fn deref(&self) -> &Object {
        &self.root
    }
}

impl PartialEq for Tree {
    fn eq(&self, other: &Self) -> bool {
        self.root == other.root
    }
}
