//! Task extraction
//!
//! `orchestrator` drives one provider call; `normalizer` turns whatever came
//! back into at least one valid Task.

pub mod normalizer;
pub mod orchestrator;

pub use normalizer::{normalize, normalize_value};
pub use orchestrator::{Orchestrator, extract};
