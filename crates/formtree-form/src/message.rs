//! Validation messages.

use std::borrow::Cow;
use std::fmt;

use formtree::Object;
use formtree_util::escape_html;
use serde::{Deserialize, Serialize};

/// Message severity, ordered from `Success` to `Error`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ValidationLevel {
    Success,
    Warning,
    Error,
}

impl ValidationLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            ValidationLevel::Success => "success",
            ValidationLevel::Warning => "warning",
            ValidationLevel::Error => "error",
        }
    }
}

impl fmt::Display for ValidationLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One validation outcome attached to a validation key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationMessage {
    pub level: ValidationLevel,
    /// Machine readable code, may be empty.
    pub code: String,
    pub text: String,
    /// Whether `text` must be escaped when rendered as HTML.
    pub html_escape: bool,
}

impl ValidationMessage {
    pub fn new(
        level: ValidationLevel,
        code: impl Into<String>,
        text: impl Into<String>,
        html_escape: bool,
    ) -> Self {
        Self {
            level,
            code: code.into(),
            text: text.into(),
            html_escape,
        }
    }

    pub fn error(code: impl Into<String>, text: impl Into<String>) -> Self {
        Self::new(ValidationLevel::Error, code, text, true)
    }

    pub fn warning(code: impl Into<String>, text: impl Into<String>) -> Self {
        Self::new(ValidationLevel::Warning, code, text, true)
    }

    pub fn success(code: impl Into<String>, text: impl Into<String>) -> Self {
        Self::new(ValidationLevel::Success, code, text, true)
    }

    pub fn is_error(&self) -> bool {
        self.level == ValidationLevel::Error
    }

    pub fn is_warning(&self) -> bool {
        self.level == ValidationLevel::Warning
    }

    pub fn is_success(&self) -> bool {
        self.level == ValidationLevel::Success
    }

    /// Text ready to be inserted in HTML.
    pub fn html_text(&self) -> Cow<'_, str> {
        if self.html_escape {
            Cow::Owned(escape_html(&self.text))
        } else {
            Cow::Borrowed(&self.text)
        }
    }

    /// Tree form: `{level, code, text, htmlEscape}`.
    pub fn to_object(&self) -> Object {
        let mut object = Object::new();
        object.insert("level", self.level.as_str());
        object.insert("code", self.code.as_str());
        object.insert("text", self.text.as_str());
        object.insert("htmlEscape", self.html_escape);
        object
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_html_text() {
        let escaped = ValidationMessage::error("", "<b>bad</b>");
        assert_eq!(escaped.html_text(), "&lt;b&gt;bad&lt;/b&gt;");

        let raw = ValidationMessage::new(ValidationLevel::Error, "", "<b>bad</b>", false);
        assert_eq!(raw.html_text(), "<b>bad</b>");
    }

    #[test]
    fn test_to_object() {
        let msg = ValidationMessage::warning("TOO_LONG", "Too long");
        let obj = msg.to_object();
        assert_eq!(obj.get_string("level").unwrap(), "warning");
        assert_eq!(obj.get_string("code").unwrap(), "TOO_LONG");
        assert_eq!(obj.get_string("text").unwrap(), "Too long");
        assert!(obj.get_bool("htmlEscape").unwrap());
    }

    #[test]
    fn test_level_display() {
        assert_eq!(ValidationLevel::Success.to_string(), "success");
    }

    #[test]
    fn test_level_order() {
        assert!(ValidationLevel::Success < ValidationLevel::Warning);
        assert!(ValidationLevel::Warning < ValidationLevel::Error);
    }
}
