//! Stand-alone ordered collection of validation messages.

use std::fmt;
use std::sync::Arc;

use formtree_util::{is_blank, join_key};
use indexmap::IndexMap;
use tracing::trace;

use crate::aggregate::Aggregate;
use crate::dictionary::{DefaultDictionary, Dictionary};
use crate::error::FormError;
use crate::format::{format_messages, Formatted, MessageFormat};
use crate::message::{ValidationLevel, ValidationMessage};

/// Messages grouped by validation key, in recording order, with
/// per-key and whole-set aggregates kept up to date on every addition.
///
/// Sub-validators fill a `ValidationSet`; the caller then merges it into a
/// form or another set under a prefix.
#[derive(Clone)]
pub struct ValidationSet {
    messages: IndexMap<String, Vec<ValidationMessage>>,
    aggregates: IndexMap<String, Aggregate>,
    whole: Aggregate,
    dictionary: Arc<dyn Dictionary>,
}

impl fmt::Debug for ValidationSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ValidationSet")
            .field("messages", &self.messages)
            .field("whole", &self.whole)
            .finish_non_exhaustive()
    }
}

impl Default for ValidationSet {
    fn default() -> Self {
        Self::new(Arc::new(DefaultDictionary))
    }
}

impl ValidationSet {
    pub fn new(dictionary: Arc<dyn Dictionary>) -> Self {
        Self {
            messages: IndexMap::new(),
            aggregates: IndexMap::new(),
            whole: Aggregate::default(),
            dictionary,
        }
    }

    /// A set holding one message. The key must not be blank.
    pub fn single(
        key: &str,
        message: ValidationMessage,
        dictionary: Arc<dyn Dictionary>,
    ) -> Result<Self, FormError> {
        if is_blank(key) {
            return Err(FormError::BlankKey);
        }
        let mut set = Self::new(dictionary);
        set.add(key, message);
        Ok(set)
    }

    pub fn dictionary(&self) -> &Arc<dyn Dictionary> {
        &self.dictionary
    }

    /// Record a prepared message.
    pub fn add(&mut self, key: &str, message: ValidationMessage) {
        trace!(key, level = %message.level, "validation message recorded");
        self.whole.absorb(message.level);
        self.aggregates
            .entry(key.to_string())
            .or_default()
            .absorb(message.level);
        self.messages.entry(key.to_string()).or_default().push(message);
    }

    /// Build a message and record it. A blank `text` is replaced by the
    /// dictionary's default text for `key`.
    pub fn add_message(
        &mut self,
        key: &str,
        level: ValidationLevel,
        code: &str,
        text: &str,
        html_escape: bool,
    ) {
        let message = self.build_message(key, level, code, text, html_escape);
        self.add(key, message);
    }

    pub(crate) fn build_message(
        &self,
        key: &str,
        level: ValidationLevel,
        code: &str,
        text: &str,
        html_escape: bool,
    ) -> ValidationMessage {
        let text = if is_blank(text) {
            self.dictionary.default_validation_text(key)
        } else {
            text.to_string()
        };
        ValidationMessage::new(level, code, text, html_escape)
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

    /// Record every message of `other` under `prefix`. See
    /// [`join_key`] for how keys are combined: messages of the empty key
    /// land on the prefix itself.
    pub fn merge(&mut self, prefix: &str, other: &ValidationSet) {
        for (key, messages) in other.entries() {
            let target = join_key(prefix, key);
            for message in messages {
                self.add(&target, message.clone());
            }
        }
    }

    /// Number of keys holding messages.
    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.messages.keys().map(String::as_str)
    }

    pub fn entries(&self) -> impl Iterator<Item = (&str, &[ValidationMessage])> {
        self.messages.iter().map(|(k, v)| (k.as_str(), v.as_slice()))
    }

    pub fn messages(&self) -> &IndexMap<String, Vec<ValidationMessage>> {
        &self.messages
    }

    pub fn messages_for(&self, key: &str) -> &[ValidationMessage] {
        self.messages.get(key).map(Vec::as_slice).unwrap_or_default()
    }

    pub fn has_messages(&self) -> bool {
        !self.messages.is_empty()
    }

    pub fn has_messages_at(&self, key: &str) -> bool {
        !self.messages_for(key).is_empty()
    }

    /// Aggregate of the whole set.
    pub fn aggregate(&self) -> Aggregate {
        self.whole
    }

    /// Aggregate of one key; the default aggregate when it has no message.
    pub fn aggregate_at(&self, key: &str) -> Aggregate {
        self.aggregates.get(key).copied().unwrap_or_default()
    }

    /// With no keys, true when no key has an error. Otherwise true when
    /// none of `keys` has an error.
    pub fn is_valid(&self, keys: &[&str]) -> bool {
        if keys.is_empty() {
            return self.whole.is_valid;
        }
        keys.iter().all(|key| self.aggregate_at(key).is_valid)
    }

    pub fn is_error(&self) -> bool {
        self.whole.has_errors
    }

    pub fn is_error_at(&self, key: &str) -> bool {
        self.aggregate_at(key).has_errors
    }

    pub fn is_warning(&self) -> bool {
        self.whole.is_warning()
    }

    pub fn is_warning_at(&self, key: &str) -> bool {
        self.aggregate_at(key).is_warning()
    }

    pub fn is_success(&self) -> bool {
        self.whole.is_success()
    }

    pub fn is_success_at(&self, key: &str) -> bool {
        self.aggregate_at(key).is_success()
    }

    pub fn messages_formatted(&self, key: Option<&str>, format: MessageFormat) -> Option<Formatted> {
        format_messages(&self.messages, key, format)
    }
}
