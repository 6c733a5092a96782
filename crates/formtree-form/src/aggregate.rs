//! Validation aggregates: OR-accumulated flags over a set of messages.

use formtree::{Object, Path};
use tracing::debug;

use crate::message::ValidationLevel;

pub const IS_VALID: &str = "isValid";
pub const HAS_SUCCESSES: &str = "hasSuccesses";
pub const HAS_WARNINGS: &str = "hasWarnings";
pub const HAS_ERRORS: &str = "hasErrors";
pub const MESSAGES: &str = "messages";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Aggregate {
    pub is_valid: bool,
    pub has_successes: bool,
    pub has_warnings: bool,
    pub has_errors: bool,
}

impl Default for Aggregate {
    fn default() -> Self {
        Self {
            is_valid: true,
            has_successes: false,
            has_warnings: false,
            has_errors: false,
        }
    }
}

impl Aggregate {
    /// Account for one more message.
    pub fn absorb(&mut self, level: ValidationLevel) {
        match level {
            ValidationLevel::Success => self.has_successes = true,
            ValidationLevel::Warning => self.has_warnings = true,
            ValidationLevel::Error => {
                self.has_errors = true;
                self.is_valid = false;
            }
        }
    }

    /// Warnings and no errors.
    pub fn is_warning(&self) -> bool {
        self.has_warnings && !self.has_errors
    }

    /// Nothing but successes (or nothing at all).
    pub fn is_success(&self) -> bool {
        !self.has_warnings && !self.has_errors
    }

    /// Read the flags stored in `object`, missing or unreadable flags taking
    /// their default. The next [`Aggregate::write_into`] replaces an
    /// unreadable flag.
    pub fn read_from(object: &Object) -> Self {
        let defaults = Self::default();
        let flag = |key: &str, default: bool| match object.get_bool_or(Path::literal(key), default) {
            Ok(value) => value,
            Err(err) => {
                debug!(key, error = %err, "resetting unreadable aggregate flag");
                default
            }
        };
        Self {
            is_valid: flag(IS_VALID, defaults.is_valid),
            has_successes: flag(HAS_SUCCESSES, defaults.has_successes),
            has_warnings: flag(HAS_WARNINGS, defaults.has_warnings),
            has_errors: flag(HAS_ERRORS, defaults.has_errors),
        }
    }

    pub fn write_into(&self, object: &mut Object) {
        object.insert(IS_VALID, self.is_valid);
        object.insert(HAS_SUCCESSES, self.has_successes);
        object.insert(HAS_WARNINGS, self.has_warnings);
        object.insert(HAS_ERRORS, self.has_errors);
    }

    pub fn to_object(&self) -> Object {
        let mut object = Object::new();
        self.write_into(&mut object);
        object
    }
}
