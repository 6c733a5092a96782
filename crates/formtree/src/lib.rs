//! Structured data tree with path addressing.
//!
//! A [`Tree`] holds an [`Object`] root whose members are [`Node`]s: scalars,
//! nested objects or arrays. Nodes are written and read with path
//! expressions such as `user.books[2]["full name"]`. Writes create missing
//! containers on the way down and grow arrays with null markers; a second
//! value added at the same path turns the slot into an array.
//!
//! # Example
//!
//! ```
//! use formtree::Tree;
//!
//! let mut tree = Tree::new();
//! tree.add("user.books[1].title", "Dune").unwrap();
//! tree.add("user.tags", "a").unwrap();
//! tree.add("user.tags", "b").unwrap();
//!
//! assert_eq!(tree.get_string("user.books[1].title").unwrap(), "Dune");
//! assert!(tree.get_node("user.books[0]").unwrap().unwrap().is_null());
//! assert_eq!(tree.get_array_first_string("user.tags", "").unwrap(), "a");
//!
//! // Missing structure never fails with the "or empty" accessors.
//! let nothing = tree.get_object_or_empty("user.address").get_array_or_empty("lines");
//! assert!(nothing.is_empty());
//! ```

mod error;
pub use error::{Result, TreeError};

mod scalar;
pub use scalar::Scalar;

mod node;
pub use node::{Array, Node, Object};

pub mod merge;

pub mod navigate;
pub use navigate::{KeyMode, ShapeConflictPolicy, WriteMode, WriteOptions};

mod access;
pub use access::FromNode;

mod compare;

mod transform;
pub use transform::trim_node;

mod tree;
pub use tree::Tree;

mod config;
pub use config::TreeConfig;

mod json;

pub mod binding;
pub use binding::{bind_multi, bind_pairs};

pub use formtree_path::{parse_path, Accessor, Path, PathError, PathLimits, ToPath};
