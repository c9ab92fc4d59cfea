//! Saved URL list management.
//!
//! The saved list sits behind `SavedUrlRepository` so the CLI can work against
//! a JSON file on disk while tests use an in-memory store. The extraction
//! pipeline never touches it.

mod import;
mod store;
mod types;

pub use self::types::*;

pub use self::import::{export_json, import_csv_first_column, import_lines};
pub use self::store::{JsonFileStore, MemoryStore, SavedUrlRepository};

// Module-level constants
pub const TARGET_STORE: &str = "store";
