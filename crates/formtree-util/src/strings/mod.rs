//! String utilities.
//!
//! Provides escaping and whitespace helpers.

mod escape;
mod util;

pub use escape::escape_html;
pub use util::{is_blank, trim_to_owned};
