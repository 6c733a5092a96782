//! Validation-aware form.

use std::borrow::Cow;
use std::sync::Arc;

use formtree::{Node, Object, Tree, TreeConfig};
use formtree_util::{join_key, trim_to_owned};
use indexmap::IndexMap;

use crate::aggregate::{Aggregate, MESSAGES};
use crate::dictionary::Dictionary;
use crate::error::FormError;
use crate::format::{Formatted, MessageFormat};
use crate::message::{ValidationLevel, ValidationMessage};
use crate::validation_set::ValidationSet;

/// Key under which [`Form::to_node`] places the aggregate tree.
pub const VALIDATION_KEY: &str = "validation";

/// Answer data plus the validation outcome attached to it.
///
/// Messages are kept per validation key. Alongside, an aggregate tree is
/// maintained for templates: under the literal key `"<name>.<key>"` it
/// holds `{isValid, hasSuccesses, hasWarnings, hasErrors, messages}`, and
/// under `"<name>._"` the flags of the whole form.
///
/// ```
/// use std::sync::Arc;
///
/// use formtree_form::{DefaultDictionary, Form};
///
/// let mut form = Form::new(" userForm ", None, Arc::new(DefaultDictionary));
/// form.put("email", "not-an-email").unwrap();
/// form.add_error("email", "INVALID", "");
///
/// assert!(!form.is_valid(&[]));
/// let validation = form.validation_object();
/// let email = validation.get_node(formtree::Path::literal("userForm.email")).unwrap().unwrap();
/// assert_eq!(email.as_object().unwrap().get_bool("hasErrors").unwrap(), true);
/// assert_eq!(form.messages_for("email")[0].text, "Invalid value.");
/// ```
#[derive(Debug, Clone)]
pub struct Form {
    name: String,
    data: Tree,
    validation: ValidationSet,
    sink: Option<Object>,
}

impl Form {
    /// Create a form. The name is trimmed and `seed` is deep-copied into
    /// the form data.
    pub fn new(
        name: impl Into<String>,
        seed: Option<&Object>,
        dictionary: Arc<dyn Dictionary>,
    ) -> Self {
        Self::with_config(name, seed, dictionary, TreeConfig::default())
    }

    pub fn with_config(
        name: impl Into<String>,
        seed: Option<&Object>,
        dictionary: Arc<dyn Dictionary>,
        config: TreeConfig,
    ) -> Self {
        let data = seed.map(Object::clone_deep).unwrap_or_default();
        Self {
            name: trim_to_owned(name.into()),
            data: Tree::from_object(data, config),
            validation: ValidationSet::new(dictionary),
            sink: None,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn data(&self) -> &Tree {
        &self.data
    }

    pub fn data_mut(&mut self) -> &mut Tree {
        &mut self.data
    }

    /// Set a value of the form data.
    pub fn put(&mut self, path: &str, value: impl Into<Node>) -> Result<(), FormError> {
        Ok(self.data.put(path, value)?)
    }

    /// Key of the whole-form aggregate in the aggregate tree.
    pub fn whole_validation_key(&self) -> String {
        if self.name.is_empty() {
            String::new()
        } else {
            format!("{}._", self.name)
        }
    }

    fn aggregate_key(&self, key: &str) -> String {
        if self.name.is_empty() {
            key.to_string()
        } else {
            join_key(&self.name, key)
        }
    }

    fn initial_sink(&self) -> Object {
        let mut sink = Object::new();
        sink.insert(self.whole_validation_key(), Aggregate::default().to_object());
        sink
    }

    /// Record a prepared message.
    pub fn add(&mut self, key: &str, message: ValidationMessage) {
        let aggregate_key = self.aggregate_key(key);
        let whole_key = self.whole_validation_key();
        if self.sink.is_none() {
            self.sink = Some(self.initial_sink());
        }

        if let Some(sink) = self.sink.as_mut() {
            let entry = sink.object_entry(&aggregate_key);
            entry.array_entry(MESSAGES).push(message.to_object());
            absorb_into(entry, message.level);
            absorb_into(sink.object_entry(&whole_key), message.level);
        }

        self.validation.add(key, message);
    }

    /// Build a message and record it. A blank `text` is replaced by the
    /// dictionary's default text.
    pub fn add_message(
        &mut self,
        key: &str,
        level: ValidationLevel,
        code: &str,
        text: &str,
        html_escape: bool,
    ) {
        let message = self
            .validation
            .build_message(key, level, code, text, html_escape);
        self.add(key, message);
    }

    pub fn add_error(&mut self, key: &str, code: &str, text: &str) {
        self.add_message(key, ValidationLevel::Error, code, text, true);
    }

    pub fn add_warning(&mut self, key: &str, code: &str, text: &str) {
        self.add_message(key, ValidationLevel::Warning, code, text, true);
    }

    pub fn add_success(&mut self, key: &str, code: &str, text: &str) {
        self.add_message(key, ValidationLevel::Success, code, text, true);
    }

    pub fn add_error_escaped(&mut self, key: &str, code: &str, text: &str, html_escape: bool) {
        self.add_message(key, ValidationLevel::Error, code, text, html_escape);
    }

    pub fn add_warning_escaped(&mut self, key: &str, code: &str, text: &str, html_escape: bool) {
        self.add_message(key, ValidationLevel::Warning, code, text, html_escape);
    }

    pub fn add_success_escaped(&mut self, key: &str, code: &str, text: &str, html_escape: bool) {
        self.add_message(key, ValidationLevel::Success, code, text, html_escape);
    }

    /// Record the messages of a sub-validation under `prefix`. Messages of
    /// the empty key land on `prefix` itself.
    pub fn merge_validation_set(&mut self, prefix: &str, other: &ValidationSet) {
        for (key, messages) in other.entries() {
            let target = join_key(prefix, key);
            for message in messages {
                self.add(&target, message.clone());
            }
        }
    }

    /// Use `other` as the aggregate tree from now on. The current aggregate
    /// content is merged into it first.
    pub fn set_validation_object(&mut self, mut other: Object) {
        let current = match self.sink.take() {
            Some(sink) => sink,
            None => self.initial_sink(),
        };
        other.merge_from(&current);
        self.sink = Some(other);
    }

    /// The aggregate tree.
    pub fn validation_object(&self) -> Cow<'_, Object> {
        match &self.sink {
            Some(sink) => Cow::Borrowed(sink),
            None => Cow::Owned(self.initial_sink()),
        }
    }

    /// The recorded messages.
    pub fn validation_set(&self) -> &ValidationSet {
        &self.validation
    }

    pub fn is_valid(&self, keys: &[&str]) -> bool {
        self.validation.is_valid(keys)
    }

    pub fn is_error(&self) -> bool {
        self.validation.is_error()
    }

    pub fn is_error_at(&self, key: &str) -> bool {
        self.validation.is_error_at(key)
    }

    pub fn is_warning(&self) -> bool {
        self.validation.is_warning()
    }

    pub fn is_warning_at(&self, key: &str) -> bool {
        self.validation.is_warning_at(key)
    }

    pub fn is_success(&self) -> bool {
        self.validation.is_success()
    }

    pub fn is_success_at(&self, key: &str) -> bool {
        self.validation.is_success_at(key)
    }

    pub fn has_messages(&self) -> bool {
        self.validation.has_messages()
    }

    pub fn has_messages_at(&self, key: &str) -> bool {
        self.validation.has_messages_at(key)
    }

    pub fn messages(&self) -> &IndexMap<String, Vec<ValidationMessage>> {
        self.validation.messages()
    }

    pub fn messages_for(&self, key: &str) -> &[ValidationMessage] {
        self.validation.messages_for(key)
    }

    /// Number of validation keys holding messages.
    pub fn len(&self) -> usize {
        self.validation.len()
    }

    pub fn is_empty(&self) -> bool {
        self.validation.is_empty()
    }

    pub fn aggregate(&self) -> Aggregate {
        self.validation.aggregate()
    }

    pub fn aggregate_at(&self, key: &str) -> Aggregate {
        self.validation.aggregate_at(key)
    }

    pub fn messages_formatted(&self, key: Option<&str>, format: MessageFormat) -> Option<Formatted> {
        self.validation.messages_formatted(key, format)
    }

    /// Detached copy of the form data with the aggregate tree under
    /// [`VALIDATION_KEY`], for templating.
    pub fn to_node(&self) -> Node {
        let mut object = self.data.to_object();
        object.insert(VALIDATION_KEY, self.validation_object().clone_deep());
        Node::from(object)
    }
}

fn absorb_into(object: &mut Object, level: ValidationLevel) {
    let mut aggregate = Aggregate::read_from(object);
    aggregate.absorb(level);
    aggregate.write_into(object);
}
