//! DocumentStore implementations.
//!
//! - `json_file`: one JSON file per document in a data directory
//! - `inmemory`: process-local, for tests and `--ephemeral` runs

pub mod inmemory;
pub mod json_file;

pub use inmemory::InMemoryDocumentStore;
pub use json_file::JsonFileDocumentStore;
