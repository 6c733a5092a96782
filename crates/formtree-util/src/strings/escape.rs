/// Escape special characters in a string for inclusion in HTML text or
/// attribute values.
///
/// This function escapes:
/// - Ampersand (`&`)
/// - Angle brackets (`<`, `>`)
/// - Double quote (`"`)
/// - Single quote (`'`)
///
/// # Examples
///
/// ```
/// use formtree_util::strings::escape_html;
///
/// assert_eq!(escape_html("hello"), "hello");
/// assert_eq!(escape_html("<b>hi</b>"), "&lt;b&gt;hi&lt;/b&gt;");
/// assert_eq!(escape_html("a & b"), "a &amp; b");
/// ```
pub fn escape_html(s: &str) -> String {
    let mut result = String::with_capacity(s.len());
    let mut last = 0;

    for (i, ch) in s.char_indices() {
        let escaped = match ch {
            '&' => Some("&amp;"),
            '<' => Some("&lt;"),
            '>' => Some("&gt;"),
            '"' => Some("&quot;"),
            '\'' => Some("&#x27;"),
            _ => None,
        };

        if let Some(esc) = escaped {
            result.push_str(&s[last..i]);
            result.push_str(esc);
            last = i + ch.len_utf8();
        }
    }

    result.push_str(&s[last..]);
    result
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_escape_simple() {
        assert_eq!(escape_html("hello"), "hello");
    }

    #[test]
    fn test_escape_empty() {
        assert_eq!(escape_html(""), "");
    }

    #[test]
    fn test_escape_quotes() {
        assert_eq!(escape_html("say \"hi\""), "say &quot;hi&quot;");
        assert_eq!(escape_html("it's"), "it&#x27;s");
    }

    #[test]
    fn test_escape_tags() {
        assert_eq!(
            escape_html("<script>alert(1)</script>"),
            "&lt;script&gt;alert(1)&lt;/script&gt;"
        );
    }

    #[test]
    fn test_escape_already_escaped_entity() {
        assert_eq!(escape_html("&amp;"), "&amp;amp;");
    }

    #[test]
    fn test_escape_unicode() {
        assert_eq!(escape_html("café <ok>"), "café &lt;ok&gt;");
    }
}
