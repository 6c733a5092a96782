//! Validation-key joining.
//!
//! Validation keys use the same dotted syntax as tree paths. A prefix is
//! joined to a key with a `.` unless the prefix already ends with one, and an
//! empty key addresses the prefix itself.

use crate::strings::is_blank;

/// Normalize a prefix so that a key can be appended directly.
///
/// A blank prefix becomes the empty string; otherwise a trailing `.` is
/// ensured.
///
/// # Examples
///
/// ```
/// use formtree_util::join_prefix;
///
/// assert_eq!(join_prefix("user"), "user.");
/// assert_eq!(join_prefix("user."), "user.");
/// assert_eq!(join_prefix("  "), "");
/// ```
pub fn join_prefix(prefix: &str) -> String {
    if is_blank(prefix) {
        return String::new();
    }
    if prefix.ends_with('.') {
        return prefix.to_string();
    }
    let mut out = String::with_capacity(prefix.len() + 1);
    out.push_str(prefix);
    out.push('.');
    out
}

/// Join a prefix and a key.
///
/// An empty key resolves to the prefix scope itself (without the trailing
/// `.`).
///
/// # Examples
///
/// ```
/// use formtree_util::join_key;
///
/// assert_eq!(join_key("user", "email"), "user.email");
/// assert_eq!(join_key("user.", "email"), "user.email");
/// assert_eq!(join_key("user", ""), "user");
/// assert_eq!(join_key("user.", ""), "user");
/// assert_eq!(join_key("", "email"), "email");
/// ```
pub fn join_key(prefix: &str, key: &str) -> String {
    let prefix = join_prefix(prefix);
    if key.is_empty() {
        return prefix.strip_suffix('.').unwrap_or(prefix.as_str()).to_string();
    }
    prefix + key
}
