//! Multi-value merge.
//!
//! Used when several submitted values share one path: the first write sets
//! the slot, the second turns it into an array holding both, and later ones
//! append.

use std::sync::Arc;

use crate::node::Node;

/// Assign `value` to `slot`, promoting the slot to an array when it already
/// holds a value.
///
/// - absent or null: the slot becomes `value`
/// - scalar or object `v0`: the slot becomes `[v0, value]`
/// - array: `value` is appended
pub fn assign(slot: &mut Node, value: Node) {
    if slot.is_null() {
        *slot = value;
    } else if let Node::Array(array) = slot {
        Arc::make_mut(array).items.push(value);
    } else {
        let first = std::mem::take(slot);
        *slot = Node::from(vec![first, value]);
    }
}
