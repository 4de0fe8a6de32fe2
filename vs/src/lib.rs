//! VentStore - persistent record storage for ventask
//!
//! Records are stored as JSON documents in SQLite, one logical collection per
//! record type. Each record also publishes a small set of typed index fields
//! which back filtering, ordering and filtered deletes.
//!
//! # Architecture
//!
//! ```text
//! {store_dir}/
//! └── ventstore.db
//!     ├── records          (collection, id, data, updated_at)
//!     └── record_indexes   (collection, id, field, value)
//! ```
//!
//! # Example
//!
//! ```ignore
//! use ventstore::{Filter, Store};
//!
//! let mut store = Store::open("~/.local/share/ventask")?;
//! store.create(task)?;
//! let done: Vec<Task> = store.list(&[Filter::eq("completed", true)])?;
//! ```

mod error;
mod record;
mod store;

pub use error::{StoreError, StoreResult};
pub use record::{Filter, FilterOp, IndexValue, Order, Record};
pub use store::Store;

/// Name of the SQLite database file inside the store directory
pub const DB_FILE_NAME: &str = "ventstore.db";

/// Current time as Unix milliseconds
pub fn now_ms() -> i64 {
    chrono::Utc::now().timestamp_millis()
}
