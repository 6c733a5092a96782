/// Check if a string is empty or contains only whitespace.
///
/// # Examples
///
/// ```
/// use formtree_util::strings::is_blank;
///
/// assert!(is_blank(""));
/// assert!(is_blank("  \t"));
/// assert!(!is_blank(" a "));
/// ```
pub fn is_blank(s: &str) -> bool {
    s.chars().all(char::is_whitespace)
}

/// Trim surrounding whitespace, reusing the input allocation when nothing
/// needs to be removed.
pub fn trim_to_owned(s: String) -> String {
    let trimmed = s.trim();
    if trimmed.len() == s.len() {
        return s;
    }
    trimmed.to_string()
}
