//! Storage layer - project store and remembered-session adapters
//!
//! # Architecture
//!
//! - `ProjectStore`: the remote document store contract (`query`, `insert`)
//! - `memory`: in-process store evaluating `QuerySpec` predicates locally
//! - `jsonl`: file-backed store, one JSON record per line (git-friendly)
//! - `session_file`: `SessionCache` persisted as a small JSON file
//!
//! # Usage
//!
//! ```ignore
//! use projecthub_core::storage::{JsonlProjectStore, ProjectStore};
//! use projecthub_core::domain::QuerySpec;
//!
//! let store = JsonlProjectStore::new("projects.jsonl");
//! let records = store.query(&QuerySpec::all()).await?;
//! ```

pub mod jsonl;
pub mod memory;
pub mod session_file;

use async_trait::async_trait;

use crate::Result;
use crate::domain::{QuerySpec, RawProjectRecord};

pub use jsonl::JsonlProjectStore;
pub use memory::InMemoryProjectStore;
pub use session_file::FileSessionCache;

/// Document store holding project records
#[async_trait]
pub trait ProjectStore: Send + Sync {
    /// Return every record matching the query, in store order
    async fn query(&self, spec: &QuerySpec) -> Result<Vec<RawProjectRecord>>;

    /// Insert a record and return the identifier the store assigned
    async fn insert(&self, record: RawProjectRecord) -> Result<String>;
}
