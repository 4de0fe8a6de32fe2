//! Embedded prompts
//!
//! These are compiled into the binary from .pmt files at build time.

use tracing::debug;

/// Default extraction prompt
pub const DEFAULT_TEMPLATE: &str = include_str!("../../prompts/default.pmt");

/// Alternative "productivity coach" prompt users can load as a starting point
pub const EXAMPLE_TEMPLATE: &str = include_str!("../../prompts/example.pmt");

/// Get the embedded prompt by name
pub fn get_embedded(name: &str) -> Option<&'static str> {
    debug!(%name, "get_embedded: called");
    match name {
        "default" => Some(DEFAULT_TEMPLATE),
        "example" => Some(EXAMPLE_TEMPLATE),
        _ => {
            debug!("get_embedded: no match found");
            None
        }
    }
}
