//! Texts used when a message is recorded without one.

/// Source of default message texts. Passed explicitly to forms and
/// validation sets, typically as a shared `Arc<dyn Dictionary>`.
///
/// Only [`Dictionary::default_validation_text`] is required; the texts of
/// the built-in validators default to English.
pub trait Dictionary: Send + Sync {
    /// Text for a message recorded at `key` with a blank text.
    fn default_validation_text(&self, key: &str) -> String;

    fn success_text(&self) -> String {
        "Valid value.".to_string()
    }

    fn not_blank_text(&self) -> String {
        "Can't be empty.".to_string()
    }

    fn blank_text(&self) -> String {
        "Must be empty.".to_string()
    }

    fn email_text(&self) -> String {
        "Invalid email address.".to_string()
    }

    fn null_text(&self) -> String {
        "Must be null.".to_string()
    }

    fn not_null_text(&self) -> String {
        "Can't be null.".to_string()
    }

    fn pattern_text(&self, pattern: &str) -> String {
        format!("Doesn't match the pattern \"{pattern}\".")
    }

    fn not_pattern_text(&self, pattern: &str) -> String {
        format!("Can't match the pattern \"{pattern}\".")
    }

    fn size_text(&self, size: usize, actual: usize) -> String {
        format!("The size must be {size}. It is currently {actual}.")
    }

    fn min_size_text(&self, min: usize, actual: usize) -> String {
        format!("The size must be at least {min}. It is currently {actual}.")
    }

    fn max_size_text(&self, max: usize, actual: usize) -> String {
        format!("The size must be at most {max}. It is currently {actual}.")
    }

    fn length_text(&self, length: usize, actual: usize) -> String {
        format!("The length must be {length}. It is currently {actual}.")
    }

    fn min_length_text(&self, min: usize, actual: usize) -> String {
        format!("The length must be at least {min}. It is currently {actual}.")
    }

    fn max_length_text(&self, max: usize, actual: usize) -> String {
        format!("The length must be at most {max}. It is currently {actual}.")
    }

    fn equivalent_text(&self, _element: &str, reference: &str) -> String {
        format!("Must be equivalent to \"{reference}\".")
    }

    fn not_equivalent_text(&self, _element: &str, reference: &str) -> String {
        format!("Can't be equivalent to \"{reference}\".")
    }

    fn less_text(&self, _element: &str, reference: &str) -> String {
        format!("Must be less than \"{reference}\".")
    }

    fn greater_text(&self, _element: &str, reference: &str) -> String {
        format!("Must be greater than \"{reference}\".")
    }

    fn equivalent_or_less_text(&self, _element: &str, reference: &str) -> String {
        format!("Must be equivalent to or less than \"{reference}\".")
    }

    fn equivalent_or_greater_text(&self, _element: &str, reference: &str) -> String {
        format!("Must be equivalent to or greater than \"{reference}\".")
    }
}

/// English texts.
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultDictionary;

impl Dictionary for DefaultDictionary {
    fn default_validation_text(&self, _key: &str) -> String {
        "Invalid value.".to_string()
    }
}
