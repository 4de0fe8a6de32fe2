//! Prompt templates
//!
//! Template selection chain:
//! 1. Custom prompt saved in settings
//! 2. `prompt.template` / `prompt.template-file` from config
//! 3. Embedded default
//!
//! Templates carry a single `{text}` placeholder that receives the numbered vents.

mod builder;
pub mod embedded;

pub use builder::{TaskNote, build, combine, notes_from_tasks};
pub use embedded::{DEFAULT_TEMPLATE, EXAMPLE_TEMPLATE};

/// Placeholder replaced with the combined vent text
pub const PLACEHOLDER: &str = "{text}";

/// First non-blank candidate, else the embedded default
pub fn effective_template<'a>(candidates: &[Option<&'a str>]) -> &'a str {
    candidates
        .iter()
        .flatten()
        .find(|t| !t.trim().is_empty())
        .copied()
        .unwrap_or(DEFAULT_TEMPLATE)
}
