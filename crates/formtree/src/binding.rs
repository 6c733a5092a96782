//! Building a tree from submitted key/value pairs (form fields, query
//! strings).
//!
//! Keys are trimmed and parsed as paths; values are added in arrival order
//! with multi-value merge, so a repeated field becomes an array.

use tracing::{debug, trace};

use crate::config::TreeConfig;
use crate::error::Result;
use crate::node::Node;
use crate::tree::Tree;

/// Bind `(key, value)` pairs into a new mutable tree. Blank keys are
/// skipped.
///
/// ```
/// use formtree::binding::bind_pairs;
/// use formtree::TreeConfig;
///
/// let tree = bind_pairs(
///     [("user.tags[0]", "a"), ("user.tags[1]", "b"), ("color", "red"), ("color", "blue")],
///     &TreeConfig::default(),
/// )
/// .unwrap();
/// assert_eq!(tree.get_string("user.tags[1]").unwrap(), "b");
/// assert_eq!(tree.get_array_string_at("color", 1, "").unwrap(), "blue");
/// ```
pub fn bind_pairs<I, K, V>(pairs: I, config: &TreeConfig) -> Result<Tree>
where
    I: IntoIterator<Item = (K, V)>,
    K: AsRef<str>,
    V: Into<Node>,
{
    let mut tree = Tree::with_config(config.clone());
    for (key, value) in pairs {
        bind_one(&mut tree, key.as_ref(), value.into())?;
    }
    Ok(tree)
}

/// Bind `(key, values)` pairs, as produced by parsers that group repeated
/// fields. Each value is added in order.
pub fn bind_multi<I, K, V>(pairs: I, config: &TreeConfig) -> Result<Tree>
where
    I: IntoIterator<Item = (K, Vec<V>)>,
    K: AsRef<str>,
    V: Into<Node>,
{
    let mut tree = Tree::with_config(config.clone());
    for (key, values) in pairs {
        for value in values {
            bind_one(&mut tree, key.as_ref(), value.into())?;
        }
    }
    Ok(tree)
}

fn bind_one(tree: &mut Tree, key: &str, value: Node) -> Result<()> {
    let key = key.trim();
    if key.is_empty() {
        debug!("skipping value submitted with a blank key");
        return Ok(());
    }
    trace!(key, kind = value.kind(), "binding value");
    tree.add(key, value)
}
