//! Loose comparison between scalars and equivalence between trees.
//!
//! Equality on [`Node`] is strict: `Int(1)` and `String("1")` differ.
//! Equivalence converts the other side to the kind of the value it is
//! compared against first, so a tree bound from text form data can be checked
//! against a typed one.

use std::cmp::Ordering;

use crate::node::{Array, Node, Object};
use crate::scalar::Scalar;

impl Scalar {
    /// Order `self` against `reference`, converting `self` to the kind of
    /// `reference` first. Numbers that don't convert exactly (`1.5` against
    /// an integer) are compared as floats.
    ///
    /// `None` when the two can't be compared.
    ///
    /// ```
    /// use std::cmp::Ordering;
    /// use formtree::Scalar;
    ///
    /// let reference = Scalar::from(10);
    /// assert_eq!(Scalar::from("9").compare_to(&reference), Some(Ordering::Less));
    /// assert_eq!(Scalar::from(10.5).compare_to(&reference), Some(Ordering::Greater));
    /// assert_eq!(Scalar::from("ten").compare_to(&reference), None);
    /// ```
    pub fn compare_to(&self, reference: &Scalar) -> Option<Ordering> {
        let converted = match reference {
            Scalar::Null => return self.is_null().then_some(Ordering::Equal),
            Scalar::Bool(r) => self.as_bool().map(|v| v.cmp(r)),
            Scalar::Int(r) => self.as_i64().map(|v| v.cmp(r)),
            Scalar::Float(r) => self.as_f64().and_then(|v| v.partial_cmp(r)),
            Scalar::String(r) => self.to_text().map(|v| v.as_str().cmp(r.as_str())),
            Scalar::DateTime(r) => self.as_datetime().map(|v| v.cmp(r)),
            Scalar::Binary(r) => self.as_bytes().map(|v| v.as_slice().cmp(r.as_slice())),
        };
        converted.or_else(|| match reference {
            Scalar::Int(_) | Scalar::Float(_) => self.as_f64()?.partial_cmp(&reference.as_f64()?),
            _ => None,
        })
    }
}

impl Node {
    /// Check if `other`, converted to the kinds found in `self`, holds the
    /// same values. Containers must have the same shape and size.
    pub fn is_equivalent_to(&self, other: &Node) -> bool {
        match (self, other) {
            (Node::Object(a), Node::Object(b)) => a.is_equivalent_to(b),
            (Node::Array(a), Node::Array(b)) => a.is_equivalent_to(b),
            (Node::Scalar(a), Node::Scalar(b)) => b.compare_to(a) == Some(Ordering::Equal),
            _ => false,
        }
    }
}

impl Object {
    /// Same member count and every member equivalent. A member missing in
    /// `other` is taken as null.
    ///
    /// ```
    /// use formtree::Tree;
    ///
    /// let mut typed = Tree::new();
    /// typed.put("user.age", 42).unwrap();
    /// let mut bound = Tree::new();
    /// bound.put("user.age", "42").unwrap();
    ///
    /// assert_ne!(typed, bound);
    /// assert!(typed.is_equivalent_to(&bound));
    /// ```
    pub fn is_equivalent_to(&self, other: &Object) -> bool {
        if std::ptr::eq(self, other) {
            return true;
        }
        if self.len() != other.len() {
            return false;
        }
        let null = Node::null();
        self.iter()
            .all(|(key, value)| value.is_equivalent_to(other.get(key).unwrap_or(&null)))
    }
}

impl Array {
    pub fn is_equivalent_to(&self, other: &Array) -> bool {
        self.len() == other.len()
            && self
                .iter()
                .zip(other.iter())
                .all(|(a, b)| a.is_equivalent_to(b))
    }
}
