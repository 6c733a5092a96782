//! Validators run by [`ValidationBuilder`](crate::ValidationBuilder).

use std::cmp::Ordering;
use std::sync::OnceLock;

use formtree::{Node, Scalar};
use formtree_util::is_blank;
use regex::Regex;

use crate::dictionary::Dictionary;
use crate::error::FormError;

pub const CODE_NOT_BLANK: &str = "VALIDATION_TYPE_NOT_BLANK";
pub const CODE_BLANK: &str = "VALIDATION_TYPE_BLANK";
pub const CODE_EMAIL: &str = "VALIDATION_TYPE_EMAIL";
pub const CODE_NULL: &str = "VALIDATION_TYPE_NULL";
pub const CODE_NOT_NULL: &str = "VALIDATION_TYPE_NOT_NULL";
pub const CODE_PATTERN: &str = "VALIDATION_TYPE_PATTERN";
pub const CODE_NOT_PATTERN: &str = "VALIDATION_TYPE_NOT_PATTERN";
pub const CODE_SIZE: &str = "VALIDATION_TYPE_SIZE";
pub const CODE_MIN_SIZE: &str = "VALIDATION_TYPE_MIN_SIZE";
pub const CODE_MAX_SIZE: &str = "VALIDATION_TYPE_MAX_SIZE";
pub const CODE_LENGTH: &str = "VALIDATION_TYPE_LENGTH";
pub const CODE_MIN_LENGTH: &str = "VALIDATION_TYPE_MIN_LENGTH";
pub const CODE_MAX_LENGTH: &str = "VALIDATION_TYPE_MAX_LENGTH";
pub const CODE_EQUIVALENT: &str = "VALIDATION_TYPE_EQUALS";
pub const CODE_NOT_EQUIVALENT: &str = "VALIDATION_TYPE_NOT_EQUALS";
pub const CODE_LESS: &str = "VALIDATION_TYPE_LESS";
pub const CODE_GREATER: &str = "VALIDATION_TYPE_GREATER";
pub const CODE_EQUIVALENT_OR_LESS: &str = "VALIDATION_TYPE_EQUALS_OR_LESS";
pub const CODE_EQUIVALENT_OR_GREATER: &str = "VALIDATION_TYPE_EQUALS_OR_GREATER";

/// A check on one element, with the code and texts of the message it
/// produces.
///
/// `element` is `None` for a missing value or a null marker.
pub trait Validator: Send + Sync {
    fn code(&self) -> &str;

    fn validate(&self, element: Option<&Node>) -> bool;

    fn success_text(&self, dictionary: &dyn Dictionary, _element: Option<&Node>) -> String {
        dictionary.success_text()
    }

    fn fail_text(&self, dictionary: &dyn Dictionary, element: Option<&Node>) -> String;
}

/// Built-in validators.
#[derive(Debug, Clone)]
pub enum Rule {
    /// Present, and not a blank string.
    NotBlank,
    /// Missing, or a blank string.
    Blank,
    Email,
    Null,
    NotNull,
    /// Present, with a text form matching the whole pattern.
    Pattern { pattern: String, regex: Regex },
    /// Missing, or with a text form not matching the whole pattern.
    NotPattern { pattern: String, regex: Regex },
    /// Member count of an object, element count of an array or byte count
    /// of a binary value. With `ignore_nulls`, null markers don't count.
    Size { size: usize, ignore_nulls: bool },
    MinSize { min: usize, ignore_nulls: bool },
    /// Missing passes.
    MaxSize { max: usize, ignore_nulls: bool },
    /// Character count of the text form.
    Length(usize),
    MinLength(usize),
    /// Missing passes.
    MaxLength(usize),
    Equivalent(Node),
    NotEquivalent(Node),
    Less(Node),
    Greater(Node),
    EquivalentOrLess(Node),
    EquivalentOrGreater(Node),
}

impl Rule {
    pub fn pattern(pattern: &str) -> Result<Self, FormError> {
        Ok(Rule::Pattern {
            pattern: pattern.to_string(),
            regex: whole_match(pattern)?,
        })
    }

    pub fn not_pattern(pattern: &str) -> Result<Self, FormError> {
        Ok(Rule::NotPattern {
            pattern: pattern.to_string(),
            regex: whole_match(pattern)?,
        })
    }
}

fn whole_match(pattern: &str) -> Result<Regex, FormError> {
    Regex::new(&format!("^(?:{pattern})$")).map_err(|err| FormError::InvalidPattern {
        pattern: pattern.to_string(),
        reason: err.to_string(),
    })
}

fn email_regex() -> Option<&'static Regex> {
    static RE: OnceLock<Option<Regex>> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(
            r"^[A-Za-z0-9.!#$%&'*+/=?^_`{|}~-]+@[A-Za-z0-9](?:[A-Za-z0-9-]{0,61}[A-Za-z0-9])?(?:\.[A-Za-z0-9](?:[A-Za-z0-9-]{0,61}[A-Za-z0-9])?)+$",
        )
        .ok()
    })
    .as_ref()
}

/// Text form of an element: the scalar text, or compact JSON for
/// containers.
pub(crate) fn element_text(element: Option<&Node>) -> String {
    match element {
        None => String::new(),
        Some(Node::Scalar(scalar)) => scalar.to_text().unwrap_or_default(),
        Some(node) => node.to_json_value().to_string(),
    }
}

fn count<'a>(nodes: impl Iterator<Item = &'a Node>, ignore_nulls: bool) -> usize {
    if ignore_nulls {
        nodes.filter(|node| !node.is_null()).count()
    } else {
        nodes.count()
    }
}

fn size_of(element: Option<&Node>, ignore_nulls: bool) -> Option<usize> {
    match element? {
        Node::Object(object) => Some(count(object.iter().map(|(_, node)| node), ignore_nulls)),
        Node::Array(array) => Some(count(array.iter(), ignore_nulls)),
        Node::Scalar(Scalar::Binary(bytes)) => Some(bytes.len()),
        Node::Scalar(_) => None,
    }
}

fn length_of(element: Option<&Node>) -> usize {
    element_text(element).chars().count()
}

fn compare(element: Option<&Node>, reference: &Node) -> Option<Ordering> {
    element?.as_scalar()?.compare_to(reference.as_scalar()?)
}

fn is_equivalent(element: Option<&Node>, reference: &Node) -> bool {
    match element {
        None => reference.is_null(),
        Some(element) => reference.is_equivalent_to(element),
    }
}

impl Validator for Rule {
    fn code(&self) -> &str {
        match self {
            Rule::NotBlank => CODE_NOT_BLANK,
            Rule::Blank => CODE_BLANK,
            Rule::Email => CODE_EMAIL,
            Rule::Null => CODE_NULL,
            Rule::NotNull => CODE_NOT_NULL,
            Rule::Pattern { .. } => CODE_PATTERN,
            Rule::NotPattern { .. } => CODE_NOT_PATTERN,
            Rule::Size { .. } => CODE_SIZE,
            Rule::MinSize { .. } => CODE_MIN_SIZE,
            Rule::MaxSize { .. } => CODE_MAX_SIZE,
            Rule::Length(_) => CODE_LENGTH,
            Rule::MinLength(_) => CODE_MIN_LENGTH,
            Rule::MaxLength(_) => CODE_MAX_LENGTH,
            Rule::Equivalent(_) => CODE_EQUIVALENT,
            Rule::NotEquivalent(_) => CODE_NOT_EQUIVALENT,
            Rule::Less(_) => CODE_LESS,
            Rule::Greater(_) => CODE_GREATER,
            Rule::EquivalentOrLess(_) => CODE_EQUIVALENT_OR_LESS,
            Rule::EquivalentOrGreater(_) => CODE_EQUIVALENT_OR_GREATER,
        }
    }

    fn validate(&self, element: Option<&Node>) -> bool {
        let text = || match element {
            Some(Node::Scalar(Scalar::String(s))) => Some(s.as_str()),
            _ => None,
        };
        match self {
            Rule::NotBlank => element.is_some() && !text().is_some_and(is_blank),
            Rule::Blank => element.is_none() || text().is_some_and(is_blank),
            Rule::Email => text().is_some_and(|s| email_regex().is_some_and(|re| re.is_match(s))),
            Rule::Null => element.is_none(),
            Rule::NotNull => element.is_some(),
            Rule::Pattern { regex, .. } => element.is_some() && regex.is_match(&element_text(element)),
            Rule::NotPattern { regex, .. } => element.is_none() || !regex.is_match(&element_text(element)),
            Rule::Size { size, ignore_nulls } => size_of(element, *ignore_nulls) == Some(*size),
            Rule::MinSize { min, ignore_nulls } => {
                size_of(element, *ignore_nulls).is_some_and(|size| size >= *min)
            }
            Rule::MaxSize { max, ignore_nulls } => {
                element.is_none() || size_of(element, *ignore_nulls).is_some_and(|size| size <= *max)
            }
            Rule::Length(length) => element.is_some() && length_of(element) == *length,
            Rule::MinLength(min) => element.is_some() && length_of(element) >= *min,
            Rule::MaxLength(max) => element.is_none() || length_of(element) <= *max,
            Rule::Equivalent(reference) => is_equivalent(element, reference),
            Rule::NotEquivalent(reference) => !is_equivalent(element, reference),
            Rule::Less(reference) => compare(element, reference) == Some(Ordering::Less),
            Rule::Greater(reference) => compare(element, reference) == Some(Ordering::Greater),
            Rule::EquivalentOrLess(reference) => {
                matches!(compare(element, reference), Some(Ordering::Less | Ordering::Equal))
            }
            Rule::EquivalentOrGreater(reference) => {
                matches!(compare(element, reference), Some(Ordering::Greater | Ordering::Equal))
            }
        }
    }

    fn fail_text(&self, dictionary: &dyn Dictionary, element: Option<&Node>) -> String {
        let size = |ignore_nulls: bool| size_of(element, ignore_nulls).unwrap_or(0);
        let texts = |reference: &Node| (element_text(element), element_text(Some(reference)));
        match self {
            Rule::NotBlank => dictionary.not_blank_text(),
            Rule::Blank => dictionary.blank_text(),
            Rule::Email => dictionary.email_text(),
            Rule::Null => dictionary.null_text(),
            Rule::NotNull => dictionary.not_null_text(),
            Rule::Pattern { pattern, .. } => dictionary.pattern_text(pattern),
            Rule::NotPattern { pattern, .. } => dictionary.not_pattern_text(pattern),
            Rule::Size { size: n, ignore_nulls } => dictionary.size_text(*n, size(*ignore_nulls)),
            Rule::MinSize { min, ignore_nulls } => dictionary.min_size_text(*min, size(*ignore_nulls)),
            Rule::MaxSize { max, ignore_nulls } => dictionary.max_size_text(*max, size(*ignore_nulls)),
            Rule::Length(length) => dictionary.length_text(*length, length_of(element)),
            Rule::MinLength(min) => dictionary.min_length_text(*min, length_of(element)),
            Rule::MaxLength(max) => dictionary.max_length_text(*max, length_of(element)),
            Rule::Equivalent(reference) => {
                let (element, reference) = texts(reference);
                dictionary.equivalent_text(&element, &reference)
            }
            Rule::NotEquivalent(reference) => {
                let (element, reference) = texts(reference);
                dictionary.not_equivalent_text(&element, &reference)
            }
            Rule::Less(reference) => {
                let (element, reference) = texts(reference);
                dictionary.less_text(&element, &reference)
            }
            Rule::Greater(reference) => {
                let (element, reference) = texts(reference);
                dictionary.greater_text(&element, &reference)
            }
            Rule::EquivalentOrLess(reference) => {
                let (element, reference) = texts(reference);
                dictionary.equivalent_or_less_text(&element, &reference)
            }
            Rule::EquivalentOrGreater(reference) => {
                let (element, reference) = texts(reference);
                dictionary.equivalent_or_greater_text(&element, &reference)
            }
        }
    }
}
