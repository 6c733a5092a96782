//! formtree-util - small helpers shared by the formtree crates.
//!
//! Provides HTML escaping for rendered validation messages, blank-string
//! checks and validation-key joining.

pub mod keys;
pub mod strings;

// Re-exports for convenience
pub use keys::{join_key, join_prefix};
pub use strings::{escape_html, is_blank, trim_to_owned};
