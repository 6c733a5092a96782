//! Fluent validation: pick a validator, point it at an element, record the
//! outcome.
//!
//! ```
//! use std::sync::Arc;
//!
//! use formtree_form::{DefaultDictionary, Form, ValidationLevel};
//!
//! let mut form = Form::new("signup", None, Arc::new(DefaultDictionary));
//! form.put("user.email", "bob@").unwrap();
//! form.put("user.age", "17").unwrap();
//!
//! form.validation_email().path("user.email").validate().unwrap();
//! form.validation_equivalent_or_greater(18)
//!     .path("user.age")
//!     .treat_error_as_warning()
//!     .validate()
//!     .unwrap();
//!
//! assert!(form.is_error_at("user.email"));
//! assert!(form.is_warning_at("user.age"));
//! assert_eq!(form.messages_for("user.email")[0].text, "Invalid email address.");
//!
//! // Already in error: not checked again.
//! let skipped = form
//!     .validation_not_blank()
//!     .path("user.email")
//!     .validate_unless(ValidationLevel::Error)
//!     .unwrap();
//! assert!(skipped.is_empty());
//! ```

use std::sync::Arc;

use formtree::{Node, Tree};
use formtree_util::is_blank;
use tracing::trace;

use crate::dictionary::Dictionary;
use crate::error::FormError;
use crate::form::Form;
use crate::message::{ValidationLevel, ValidationMessage};
use crate::validation_set::ValidationSet;
use crate::validators::{Rule, Validator};

/// Where validation outcomes are recorded.
pub trait ValidationTarget {
    fn dictionary(&self) -> &Arc<dyn Dictionary>;

    fn messages_at(&self, key: &str) -> &[ValidationMessage];

    fn record(&mut self, key: &str, message: ValidationMessage);

    /// Data that [`ValidationBuilder::path`] reads from, if any.
    fn data(&self) -> Option<&Tree> {
        None
    }
}

impl ValidationTarget for ValidationSet {
    fn dictionary(&self) -> &Arc<dyn Dictionary> {
        ValidationSet::dictionary(self)
    }

    fn messages_at(&self, key: &str) -> &[ValidationMessage] {
        self.messages_for(key)
    }

    fn record(&mut self, key: &str, message: ValidationMessage) {
        self.add(key, message);
    }
}

impl ValidationTarget for Form {
    fn dictionary(&self) -> &Arc<dyn Dictionary> {
        self.validation_set().dictionary()
    }

    fn messages_at(&self, key: &str) -> &[ValidationMessage] {
        self.messages_for(key)
    }

    fn record(&mut self, key: &str, message: ValidationMessage) {
        self.add(key, message);
    }

    fn data(&self) -> Option<&Tree> {
        Some(Form::data(self))
    }
}

#[derive(Debug, Clone)]
enum Source {
    Unset,
    Value(Node),
    Path(String),
}

/// One pending validation. Nothing is checked until
/// [`ValidationBuilder::validate`] or [`ValidationBuilder::validate_unless`].
#[must_use = "a validation does nothing until validated"]
pub struct ValidationBuilder<'a, T: ValidationTarget + ?Sized, V: Validator = Rule> {
    target: &'a mut T,
    validator: V,
    key: Option<String>,
    source: Source,
    code: Option<String>,
    success: Option<Option<String>>,
    as_warning: bool,
    fail_text: Option<String>,
}

impl<'a, T: ValidationTarget + ?Sized, V: Validator> ValidationBuilder<'a, T, V> {
    pub fn new(target: &'a mut T, validator: V) -> Self {
        Self {
            target,
            validator,
            key: None,
            source: Source::Unset,
            code: None,
            success: None,
            as_warning: false,
            fail_text: None,
        }
    }

    /// Validation key the message is recorded under.
    pub fn key(mut self, key: impl Into<String>) -> Self {
        self.key = Some(key.into());
        self
    }

    /// Validate this value. A null counts as missing.
    pub fn element(mut self, element: impl Into<Node>) -> Self {
        self.source = Source::Value(element.into());
        self
    }

    /// Validate the node at `path` in the target's data. Unless
    /// [`ValidationBuilder::key`] says otherwise, `path` is also the key.
    pub fn path(mut self, path: impl Into<String>) -> Self {
        self.source = Source::Path(path.into());
        self
    }

    /// Code of the message instead of the validator's.
    pub fn code(mut self, code: impl Into<String>) -> Self {
        self.code = Some(code.into());
        self
    }

    /// Record a success message too when the element is valid.
    pub fn add_message_on_success(mut self) -> Self {
        self.success = Some(None);
        self
    }

    pub fn add_message_on_success_with(mut self, text: impl Into<String>) -> Self {
        self.success = Some(Some(text.into()));
        self
    }

    /// Record a failure as a warning.
    pub fn treat_error_as_warning(mut self) -> Self {
        self.as_warning = true;
        self
    }

    pub fn fail_message_text(mut self, text: impl Into<String>) -> Self {
        self.fail_text = Some(text.into());
        self
    }

    /// Run the validator and record the outcome in the target.
    ///
    /// Returns a set holding the message just recorded, or an empty set when
    /// the element is valid and no success message was asked for.
    pub fn validate(self) -> Result<ValidationSet, FormError> {
        self.run(None)
    }

    /// [`ValidationBuilder::validate`], skipped when the key already holds a
    /// message at `level` or above.
    pub fn validate_unless(self, level: ValidationLevel) -> Result<ValidationSet, FormError> {
        self.run(Some(level))
    }

    fn run(self, skip_from: Option<ValidationLevel>) -> Result<ValidationSet, FormError> {
        let key = match (&self.key, &self.source) {
            (Some(key), _) => key.clone(),
            (None, Source::Path(path)) => path.clone(),
            (None, _) => String::new(),
        };
        if is_blank(&key) {
            return Err(FormError::BlankKey);
        }

        let dictionary = Arc::clone(self.target.dictionary());
        let mut outcome = ValidationSet::new(Arc::clone(&dictionary));
        if let Some(threshold) = skip_from {
            if self.target.messages_at(&key).iter().any(|m| m.level >= threshold) {
                trace!(key = key.as_str(), %threshold, "validation skipped");
                return Ok(outcome);
            }
        }

        let element = match &self.source {
            Source::Unset => None,
            Source::Value(node) => Some(node.clone()),
            Source::Path(path) => {
                let data = self.target.data().ok_or(FormError::NoData)?;
                data.get_node(path.as_str())?.cloned()
            }
        };
        let element = element.filter(|node| !node.is_null());

        let valid = self.validator.validate(element.as_ref());
        let (level, text) = match (valid, self.success) {
            (true, None) => return Ok(outcome),
            (true, Some(text)) => (
                ValidationLevel::Success,
                text.unwrap_or_else(|| self.validator.success_text(&*dictionary, element.as_ref())),
            ),
            (false, _) => (
                if self.as_warning {
                    ValidationLevel::Warning
                } else {
                    ValidationLevel::Error
                },
                self.fail_text
                    .unwrap_or_else(|| self.validator.fail_text(&*dictionary, element.as_ref())),
            ),
        };
        let code = self
            .code
            .unwrap_or_else(|| self.validator.code().to_string());

        let message = ValidationMessage::new(level, code, text, true);
        self.target.record(&key, message.clone());
        outcome.add(&key, message);
        Ok(outcome)
    }
}

macro_rules! validation_entry_points {
    ($($target:ty),*) => {
        $(
            impl $target {
                /// Validate with a validator of your own.
                pub fn validation<V: Validator>(&mut self, validator: V) -> ValidationBuilder<'_, Self, V> {
                    ValidationBuilder::new(self, validator)
                }

                pub fn validation_not_blank(&mut self) -> ValidationBuilder<'_, Self> {
                    self.validation(Rule::NotBlank)
                }

                pub fn validation_blank(&mut self) -> ValidationBuilder<'_, Self> {
                    self.validation(Rule::Blank)
                }

                pub fn validation_email(&mut self) -> ValidationBuilder<'_, Self> {
                    self.validation(Rule::Email)
                }

                pub fn validation_null(&mut self) -> ValidationBuilder<'_, Self> {
                    self.validation(Rule::Null)
                }

                pub fn validation_not_null(&mut self) -> ValidationBuilder<'_, Self> {
                    self.validation(Rule::NotNull)
                }

                /// Fails with [`FormError::InvalidPattern`] when `pattern`
                /// doesn't compile.
                pub fn validation_pattern(&mut self, pattern: &str) -> Result<ValidationBuilder<'_, Self>, FormError> {
                    Ok(self.validation(Rule::pattern(pattern)?))
                }

                pub fn validation_not_pattern(&mut self, pattern: &str) -> Result<ValidationBuilder<'_, Self>, FormError> {
                    Ok(self.validation(Rule::not_pattern(pattern)?))
                }

                pub fn validation_size(&mut self, size: usize, ignore_nulls: bool) -> ValidationBuilder<'_, Self> {
                    self.validation(Rule::Size { size, ignore_nulls })
                }

                pub fn validation_min_size(&mut self, min: usize, ignore_nulls: bool) -> ValidationBuilder<'_, Self> {
                    self.validation(Rule::MinSize { min, ignore_nulls })
                }

                pub fn validation_max_size(&mut self, max: usize, ignore_nulls: bool) -> ValidationBuilder<'_, Self> {
                    self.validation(Rule::MaxSize { max, ignore_nulls })
                }

                pub fn validation_length(&mut self, length: usize) -> ValidationBuilder<'_, Self> {
                    self.validation(Rule::Length(length))
                }

                pub fn validation_min_length(&mut self, min: usize) -> ValidationBuilder<'_, Self> {
                    self.validation(Rule::MinLength(min))
                }

                pub fn validation_max_length(&mut self, max: usize) -> ValidationBuilder<'_, Self> {
                    self.validation(Rule::MaxLength(max))
                }

                pub fn validation_equivalent(&mut self, reference: impl Into<Node>) -> ValidationBuilder<'_, Self> {
                    self.validation(Rule::Equivalent(reference.into()))
                }

                pub fn validation_not_equivalent(&mut self, reference: impl Into<Node>) -> ValidationBuilder<'_, Self> {
                    self.validation(Rule::NotEquivalent(reference.into()))
                }

                pub fn validation_less(&mut self, reference: impl Into<Node>) -> ValidationBuilder<'_, Self> {
                    self.validation(Rule::Less(reference.into()))
                }

                pub fn validation_greater(&mut self, reference: impl Into<Node>) -> ValidationBuilder<'_, Self> {
                    self.validation(Rule::Greater(reference.into()))
                }

                pub fn validation_equivalent_or_less(&mut self, reference: impl Into<Node>) -> ValidationBuilder<'_, Self> {
                    self.validation(Rule::EquivalentOrLess(reference.into()))
                }

                pub fn validation_equivalent_or_greater(&mut self, reference: impl Into<Node>) -> ValidationBuilder<'_, Self> {
                    self.validation(Rule::EquivalentOrGreater(reference.into()))
                }
            }
        )*
    };
}

validation_entry_points!(ValidationSet, Form);

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dictionary::DefaultDictionary;
    use crate::validators::CODE_NOT_BLANK;

    struct Even;

    impl Validator for Even {
        fn code(&self) -> &str {
            "EVEN"
        }

        fn validate(&self, element: Option<&Node>) -> bool {
            element
                .and_then(Node::as_scalar)
                .and_then(|s| s.as_i64())
                .is_some_and(|n| n % 2 == 0)
        }

        fn fail_text(&self, _dictionary: &dyn Dictionary, _element: Option<&Node>) -> String {
            "Must be even.".to_string()
        }
    }

    #[test]
    fn test_failure_recorded_with_defaults() {
        let mut set = ValidationSet::default();
        let outcome = set.validation_not_blank().key("name").element("  ").validate().unwrap();
        assert_eq!(outcome.messages_for("name").len(), 1);
        let message = &set.messages_for("name")[0];
        assert_eq!(message.level, ValidationLevel::Error);
        assert_eq!(message.code, CODE_NOT_BLANK);
        assert_eq!(message.text, "Can't be empty.");
    }

    #[test]
    fn test_success_is_silent_unless_asked() {
        let mut set = ValidationSet::default();
        let outcome = set.validation_not_blank().key("name").element("x").validate().unwrap();
        assert!(outcome.is_empty());
        assert!(set.is_empty());

        set.validation_not_blank()
            .key("name")
            .element("x")
            .add_message_on_success()
            .validate()
            .unwrap();
        set.validation_not_blank()
            .key("other")
            .element("x")
            .add_message_on_success_with("Nice.")
            .validate()
            .unwrap();
        assert_eq!(set.messages_for("name")[0].text, "Valid value.");
        assert_eq!(set.messages_for("other")[0].text, "Nice.");
        assert!(set.is_success());
    }

    #[test]
    fn test_overrides() {
        let mut set = ValidationSet::default();
        set.validation_max_length(2)
            .key("zip")
            .element("12345")
            .code("ZIP")
            .fail_message_text("Too long.")
            .treat_error_as_warning()
            .validate()
            .unwrap();
        let message = &set.messages_for("zip")[0];
        assert_eq!(message.level, ValidationLevel::Warning);
        assert_eq!(message.code, "ZIP");
        assert_eq!(message.text, "Too long.");
        assert!(set.is_valid(&[]));
    }

    #[test]
    fn test_validate_unless_levels() {
        let mut set = ValidationSet::default();
        set.add_warning("age", "", "hmm");

        let skipped = set
            .validation_not_null()
            .key("age")
            .validate_unless(ValidationLevel::Warning)
            .unwrap();
        assert!(skipped.is_empty());
        assert_eq!(set.messages_for("age").len(), 1);

        set.validation_not_null()
            .key("age")
            .validate_unless(ValidationLevel::Error)
            .unwrap();
        assert_eq!(set.messages_for("age").len(), 2);

        set.validation_not_null()
            .key("age")
            .validate_unless(ValidationLevel::Error)
            .unwrap();
        assert_eq!(set.messages_for("age").len(), 2);

        let mut fresh = ValidationSet::default();
        fresh.add_success("name", "", "ok");
        let skipped = fresh
            .validation_not_blank()
            .key("name")
            .validate_unless(ValidationLevel::Success)
            .unwrap();
        assert!(skipped.is_empty());
    }

    #[test]
    fn test_custom_validator() {
        let mut set = ValidationSet::default();
        set.validation(Even).key("n").element(3).validate().unwrap();
        set.validation(Even).key("m").element("4").validate().unwrap();
        assert_eq!(set.messages_for("n")[0].text, "Must be even.");
        assert_eq!(set.messages_for("n")[0].code, "EVEN");
        assert!(!set.has_messages_at("m"));
    }

    #[test]
    fn test_key_required() {
        let mut set = ValidationSet::default();
        assert_eq!(
            set.validation_not_null().element(1).validate().unwrap_err(),
            FormError::BlankKey
        );
        assert_eq!(
            set.validation_not_null().key(" ").validate().unwrap_err(),
            FormError::BlankKey
        );
    }

    #[test]
    fn test_path_needs_data() {
        let mut set = ValidationSet::default();
        assert_eq!(
            set.validation_not_null().path("a").validate().unwrap_err(),
            FormError::NoData
        );
    }

    #[test]
    fn test_form_reads_its_data() {
        let mut form = Form::new("f", None, Arc::new(DefaultDictionary));
        form.put("user.tags", "a").unwrap();
        form.data_mut().add("user.tags", "b").unwrap();

        form.validation_min_size(3, false).path("user.tags").validate().unwrap();
        form.validation_not_blank()
            .path("user.name")
            .key("name")
            .validate()
            .unwrap();
        assert!(form.is_error_at("user.tags"));
        assert_eq!(
            form.messages_for("user.tags")[0].text,
            "The size must be at least 3. It is currently 2."
        );
        assert!(form.is_error_at("name"));

        // Recorded through the form, so the aggregate tree follows.
        let validation = form.validation_object();
        let entry = validation
            .get_node(formtree::Path::literal("f.user.tags"))
            .unwrap()
            .and_then(Node::as_object)
            .unwrap();
        assert!(entry.get_bool("hasErrors").unwrap());

        assert!(matches!(
            form.validation_not_null().path("a[").validate(),
            Err(FormError::Tree(_))
        ));
    }
}
