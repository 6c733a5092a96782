//! Path string helpers.

/// Characters with a meaning outside of quotes.
const SPECIAL_CHARS: [char; 3] = ['.', '[', ']'];

/// Check if a raw key must go through the parser.
///
/// Keys without `.`, `[` and `]` always resolve to a single key accessor.
pub fn needs_parsing(key: &str) -> bool {
    key.contains(&SPECIAL_CHARS[..])
}

/// Check if a key can be written without brackets and quotes.
pub fn is_bare_key(key: &str) -> bool {
    !key.is_empty() && !needs_parsing(key)
}

/// Quote a key for use inside brackets, escaping `"` and `\`.
///
/// # Example
///
/// ```
/// use formtree_path::quote_key;
///
/// assert_eq!(quote_key("a b"), "\"a b\"");
/// assert_eq!(quote_key("say \"hi\""), "\"say \\\"hi\\\"\"");
/// ```
pub fn quote_key(key: &str) -> String {
    let mut out = String::with_capacity(key.len() + 2);
    out.push('"');
    for ch in key.chars() {
        if ch == '"' || ch == '\\' {
            out.push('\\');
        }
        out.push(ch);
    }
    out.push('"');
    out
}
