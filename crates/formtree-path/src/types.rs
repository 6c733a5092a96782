//! Path types.

use std::fmt;

use crate::util::{is_bare_key, quote_key};

/// One resolved step of a path.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Accessor {
    /// Object member: `.name`, `["name"]`, `['name']`
    Key(String),
    /// Array element: `[3]`
    Index(usize),
}

impl Accessor {
    /// Check if this accessor addresses an object member.
    pub fn is_key(&self) -> bool {
        matches!(self, Accessor::Key(_))
    }

    /// Check if this accessor addresses an array element.
    pub fn is_index(&self) -> bool {
        matches!(self, Accessor::Index(_))
    }
}

impl From<&str> for Accessor {
    fn from(key: &str) -> Self {
        Accessor::Key(key.to_string())
    }
}

impl From<String> for Accessor {
    fn from(key: String) -> Self {
        Accessor::Key(key)
    }
}

impl From<usize> for Accessor {
    fn from(index: usize) -> Self {
        Accessor::Index(index)
    }
}

/// A parsed path expression.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct Path {
    /// Accessors, outermost first.
    pub accessors: Vec<Accessor>,
}

impl Path {
    pub fn new(accessors: Vec<Accessor>) -> Self {
        Self { accessors }
    }

    /// A path made of one literal key, no parsing involved.
    pub fn literal(key: impl Into<String>) -> Self {
        Self {
            accessors: vec![Accessor::Key(key.into())],
        }
    }

    pub fn len(&self) -> usize {
        self.accessors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.accessors.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Accessor> {
        self.accessors.iter()
    }

    pub fn last(&self) -> Option<&Accessor> {
        self.accessors.last()
    }

    pub fn push_key(&mut self, key: impl Into<String>) -> &mut Self {
        self.accessors.push(Accessor::Key(key.into()));
        self
    }

    pub fn push_index(&mut self, index: usize) -> &mut Self {
        self.accessors.push(Accessor::Index(index));
        self
    }

    /// The path without its last accessor, or `None` for an empty path.
    pub fn parent(&self) -> Option<Path> {
        if self.accessors.is_empty() {
            return None;
        }
        Some(Path::new(
            self.accessors[..self.accessors.len() - 1].to_vec(),
        ))
    }

    /// Check if `self` is strictly below `parent`.
    pub fn is_child_of(&self, parent: &Path) -> bool {
        parent.len() < self.len() && self.accessors[..parent.len()] == parent.accessors[..]
    }
}

impl From<Vec<Accessor>> for Path {
    fn from(accessors: Vec<Accessor>) -> Self {
        Self { accessors }
    }
}

impl<'a> IntoIterator for &'a Path {
    type Item = &'a Accessor;
    type IntoIter = std::slice::Iter<'a, Accessor>;

    fn into_iter(self) -> Self::IntoIter {
        self.accessors.iter()
    }
}

/// Canonical textual form. Bare identifiers are used where the key allows
/// it, double-quoted brackets otherwise.
///
/// Empty keys have no textual form that parses; they are written as `[""]`.
impl fmt::Display for Path {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, accessor) in self.accessors.iter().enumerate() {
            match accessor {
                Accessor::Key(key) if is_bare_key(key) => {
                    if i > 0 {
                        f.write_str(".")?;
                    }
                    f.write_str(key)?;
                }
                Accessor::Key(key) => {
                    write!(f, "[{}]", quote_key(key))?;
                }
                Accessor::Index(index) => {
                    write!(f, "[{}]", index)?;
                }
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parent() {
        let path = Path::new(vec!["a".into(), 1usize.into()]);
        assert_eq!(path.parent(), Some(Path::new(vec!["a".into()])));
        assert_eq!(Path::default().parent(), None);
    }

    #[test]
    fn test_is_child_of() {
        let parent = Path::new(vec!["a".into()]);
        let child = Path::new(vec!["a".into(), "b".into()]);
        let sibling = Path::new(vec!["b".into()]);
        assert!(child.is_child_of(&parent));
        assert!(!parent.is_child_of(&child));
        assert!(!sibling.is_child_of(&parent));
        assert!(!parent.is_child_of(&parent));
    }

    #[test]
    fn test_display() {
        let mut path = Path::literal("user");
        path.push_key("first name").push_index(2).push_key("x");
        assert_eq!(path.to_string(), "user[\"first name\"][2].x");
    }

    #[test]
    fn test_display_escapes_quotes() {
        let path = Path::literal("say \"hi\"");
        assert_eq!(path.to_string(), "say \"hi\"");
        let path = Path::literal("a.\"b\"");
        assert_eq!(path.to_string(), "[\"a.\\\"b\\\"\"]");
    }
}
