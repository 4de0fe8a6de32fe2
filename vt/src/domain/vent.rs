//! Vent domain type
//!
//! A Vent is a raw, timestamped frustration entry. Only `processed` changes
//! after creation.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use ventstore::{IndexValue, Record, now_ms};

use super::id::generate_id;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Vent {
    pub id: String,

    pub text: String,

    /// When the vent was written
    pub date: DateTime<Utc>,

    /// Set once the vent has fed a successful generation
    pub processed: bool,

    /// Last update timestamp (Unix milliseconds)
    #[serde(default)]
    pub updated_at: i64,
}

impl Vent {
    /// Create an unprocessed vent; text is stored trimmed
    pub fn new(text: &str, now: DateTime<Utc>) -> Self {
        let text = text.trim().to_string();
        Self {
            id: generate_id("vent", &text),
            text,
            date: now,
            processed: false,
            updated_at: now_ms(),
        }
    }

    pub fn mark_processed(&mut self) {
        self.processed = true;
        self.updated_at = now_ms();
    }
}

impl Record for Vent {
    fn id(&self) -> &str {
        &self.id
    }

    fn updated_at(&self) -> i64 {
        self.updated_at
    }

    fn collection_name() -> &'static str {
        "vents"
    }

    fn indexed_fields(&self) -> HashMap<String, IndexValue> {
        let mut fields = HashMap::new();
        fields.insert("processed".to_string(), IndexValue::Bool(self.processed));
        fields.insert("date".to_string(), IndexValue::Int(self.date.timestamp_millis()));
        fields
    }
}
