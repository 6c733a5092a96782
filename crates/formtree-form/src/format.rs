//! Rendering of recorded messages.

use formtree::navigate::{write, KeyMode, WriteOptions};
use formtree::{Array, Object};
use formtree_util::is_blank;
use indexmap::IndexMap;
use tracing::debug;

use crate::message::{ValidationLevel, ValidationMessage};

const CSS_KEY: &str = "validationKey";
const CSS_ERROR: &str = "validationError";
const CSS_WARNING: &str = "validationWarning";
const CSS_SUCCESS: &str = "validationSuccess";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum MessageFormat {
    #[default]
    PlainText,
    Html,
    /// Tree holding each message list at the path its validation key
    /// names, for a JSON encoder.
    Json,
    /// Same tree as [`MessageFormat::Json`], for an XML encoder.
    Xml,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Formatted {
    Text(String),
    Tree(Object),
}

impl Formatted {
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Formatted::Text(text) => Some(text),
            Formatted::Tree(_) => None,
        }
    }

    pub fn as_tree(&self) -> Option<&Object> {
        match self {
            Formatted::Tree(tree) => Some(tree),
            Formatted::Text(_) => None,
        }
    }
}

/// Render `messages`, or only those of `key`. `None` when nothing at all is
/// recorded. Blank keys are left out.
pub(crate) fn format_messages(
    messages: &IndexMap<String, Vec<ValidationMessage>>,
    key: Option<&str>,
    format: MessageFormat,
) -> Option<Formatted> {
    if messages.is_empty() {
        return None;
    }

    let selected: Vec<(&str, &[ValidationMessage])> = match key {
        None => messages
            .iter()
            .map(|(k, v)| (k.as_str(), v.as_slice()))
            .collect(),
        Some(key) => messages
            .get_key_value(key)
            .map(|(k, v)| vec![(k.as_str(), v.as_slice())])
            .unwrap_or_default(),
    };
    let entries = selected
        .into_iter()
        .filter(|(key, messages)| !is_blank(key) && !messages.is_empty());

    let formatted = match format {
        MessageFormat::PlainText => {
            let mut out = String::new();
            for (key, messages) in entries {
                write_plain(&mut out, key, messages);
            }
            Formatted::Text(out)
        }
        MessageFormat::Html => {
            let mut out = String::new();
            for (key, messages) in entries {
                write_html(&mut out, key, messages);
            }
            Formatted::Text(out)
        }
        MessageFormat::Json | MessageFormat::Xml => {
            let mut tree = Object::new();
            for (key, messages) in entries {
                let list: Array = messages.iter().map(ValidationMessage::to_object).collect();
                insert_at_path(&mut tree, key, list);
            }
            Formatted::Tree(tree)
        }
    };
    Some(formatted)
}

/// `user.email` lands under `user`. A key that doesn't parse as a path is
/// used as a plain member name.
fn insert_at_path(tree: &mut Object, key: &str, list: Array) {
    let options = WriteOptions::replace();
    if let Err(err) = write(tree, key, list.clone(), KeyMode::Parsed, &options) {
        debug!(key, error = %err, "validation key is not a path, inserting it as is");
        tree.insert(key, list);
    }
}

fn write_plain(out: &mut String, key: &str, messages: &[ValidationMessage]) {
    out.push_str("key \"");
    out.push_str(key);
    out.push_str("\"\n");
    for message in messages {
        out.push_str("    - ");
        out.push_str(&message.text);
        out.push('\n');
    }
    out.push('\n');
}

fn write_html(out: &mut String, key: &str, messages: &[ValidationMessage]) {
    out.push_str("<li class=\"");
    out.push_str(CSS_KEY);
    out.push_str("\">");
    out.push_str(key);
    out.push('\n');
    out.push_str("    <ul>\n");
    for message in messages {
        let class = match message.level {
            ValidationLevel::Success => CSS_SUCCESS,
            ValidationLevel::Warning => CSS_WARNING,
            ValidationLevel::Error => CSS_ERROR,
        };
        out.push_str("        <li class=\"");
        out.push_str(class);
        out.push_str("\">");
        out.push_str(&message.html_text());
        out.push_str("</li>\n");
    }
    out.push_str("    </ul>\n");
    out.push_str("</li>\n");
}
