//! Validation-aware form on top of a [`formtree::Tree`].
//!
//! A [`Form`] owns its answer data and the validation messages recorded
//! against it. Flags are accumulated as messages arrive, so validity
//! queries never rescan the messages. Messages are recorded directly or
//! through the `validation_*` builders, which run a [`Validator`] over a
//! value or over a path of the form data.
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//!
//! use formtree_form::{DefaultDictionary, Form, MessageFormat, ValidationSet};
//!
//! let dictionary = Arc::new(DefaultDictionary);
//! let mut form = Form::new("signup", None, dictionary.clone());
//! form.put("user.email", "bob@").unwrap();
//!
//! let mut address = ValidationSet::new(dictionary);
//! address.add_warning("zip", "ZIP_FORMAT", "Check the zip code.");
//! form.merge_validation_set("user.address", &address);
//! form.add_error("user.email", "EMAIL", "");
//!
//! assert!(form.is_warning_at("user.address.zip"));
//! assert!(form.is_error());
//! assert!(!form.is_valid(&["user.email"]));
//! assert!(form.is_valid(&["user.address.zip"]));
//!
//! let text = form.messages_formatted(Some("user.email"), MessageFormat::PlainText).unwrap();
//! assert_eq!(text.as_text(), Some("key \"user.email\"\n    - Invalid value.\n\n"));
//! ```

mod aggregate;
pub use aggregate::{Aggregate, HAS_ERRORS, HAS_SUCCESSES, HAS_WARNINGS, IS_VALID, MESSAGES};

mod dictionary;
pub use dictionary::{DefaultDictionary, Dictionary};

mod error;
pub use error::FormError;

mod format;
pub use format::{Formatted, MessageFormat};

mod message;
pub use message::{ValidationLevel, ValidationMessage};

mod validation_set;
pub use validation_set::ValidationSet;

mod form;
pub use form::{Form, VALIDATION_KEY};

pub mod validators;
pub use validators::{Rule, Validator};

mod builder;
pub use builder::{ValidationBuilder, ValidationTarget};
