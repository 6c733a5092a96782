//! Path expressions for addressing nodes of a formtree document.
//!
//! A path is a sequence of dot-separated keys, each optionally followed by
//! bracket suffixes holding an array index or a quoted key:
//! `user.books[1].author["full name"]`.
//!
//! # Example
//!
//! ```
//! use formtree_path::{parse_path, Accessor};
//!
//! let path = parse_path("user.books[1]['full name']").unwrap();
//! assert_eq!(
//!     path.accessors,
//!     vec![
//!         Accessor::Key("user".into()),
//!         Accessor::Key("books".into()),
//!         Accessor::Index(1),
//!         Accessor::Key("full name".into()),
//!     ]
//! );
//!
//! // Formatting gives back a parseable expression.
//! assert_eq!(path.to_string(), "user.books[1][\"full name\"]");
//! ```

mod types;
pub use types::{Accessor, Path};

mod parser;
pub use parser::{
    parse_path, PathError, PathLimits, PathParser, ToPath, DEFAULT_MAX_ARRAY_INDEX,
    DEFAULT_MAX_PATH_LENGTH,
};

mod util;
pub use util::{is_bare_key, needs_parsing, quote_key};
