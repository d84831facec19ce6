//! # Storage Layer
//!
//! Documents live in a flat string-keyed store that follows the browser
//! local-storage layout, so data written by the web client and by this crate
//! is interchangeable.
//!
//! ## Two Traits
//!
//! - [`KvBackend`]: raw key/value I/O ("the local storage"). Knows nothing
//!   about documents.
//!   - [`fs_backend::FsBackend`]: one file per key in a data directory.
//!   - [`mem_backend::MemBackend`]: in-memory map for tests.
//! - [`DocumentStore`]: the document-level interface every caller goes through.
//!   [`local::LocalStore`] implements it over any `KvBackend` and owns JSON
//!   encoding plus index maintenance, so no call site re-implements either.
//!
//! ## Key Layout
//!
//! ```text
//! <ns>-<documentId>   Document JSON
//! <ns>-docs-list      JSON array of all document ids (insertion order)
//! <ns>-starred        JSON array of starred document ids
//! ```
//!
//! ## Consistency
//!
//! Every operation is an independent read-modify-write. Two processes sharing
//! a data directory can interleave. Document records carry a `version` and
//! `put` refuses stale writes with [`RmdifyError::Conflict`]; the index lists
//! have no such guard, and [`DocumentStore::doctor`] repairs them.
//!
//! [`RmdifyError::Conflict`]: crate::error::RmdifyError::Conflict

use crate::error::Result;
use crate::model::{Document, DocumentId};

pub mod backend;
pub mod fs_backend;
pub mod local;
pub mod mem_backend;

pub use backend::KvBackend;

/// Report from the `doctor` operation.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct DoctorReport {
    /// Ids in the document index with no stored record.
    pub dropped_missing: usize,
    /// Starred ids that were not in the document index.
    pub dropped_dangling_stars: usize,
    /// Stored records that were missing from the document index.
    pub reindexed_orphans: usize,
    /// Stored records that could not be parsed (left untouched).
    pub corrupt_records: usize,
}

impl DoctorReport {
    pub fn is_clean(&self) -> bool {
        self.dropped_missing == 0
            && self.dropped_dangling_stars == 0
            && self.reindexed_orphans == 0
            && self.corrupt_records == 0
    }
}

/// Document-level persistence.
pub trait DocumentStore {
    /// Load a document. Absent records are `DocumentNotFound`, unparsable
    /// ones surface the serialization error.
    fn get(&self, id: &DocumentId) -> Result<Document>;

    /// Write a document and make sure its id is in the document index.
    /// Returns the stored record (new version and timestamp).
    fn put(&mut self, doc: &Document) -> Result<Document>;

    /// Remove a document and drop its id from both indices.
    fn delete(&mut self, id: &DocumentId) -> Result<()>;

    /// All known document ids, in insertion order.
    fn list_ids(&self) -> Result<Vec<DocumentId>>;

    /// Starred document ids.
    fn list_starred_ids(&self) -> Result<Vec<DocumentId>>;

    /// Add or remove an id from the starred index.
    fn set_starred(&mut self, id: &DocumentId, starred: bool) -> Result<()>;

    /// Verify and fix index consistency.
    fn doctor(&mut self) -> Result<DoctorReport>;

    fn is_starred(&self, id: &DocumentId) -> Result<bool> {
        Ok(self.list_starred_ids()?.contains(id))
    }
}
