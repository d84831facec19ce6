//! # Display Indexes
//!
//! Users address documents by a short 1-based number instead of the opaque
//! id. Numbers are assigned over **all** documents, newest first, so `3`
//! means the same document in `list` and `list --starred`.
//!
//! ```text
//! 1. Meeting notes        (most recently modified)
//! 2. Draft ★
//! 3. Old ideas
//! ```
//!
//! A number is only stable until the next save reorders the list. Full ids are
//! always accepted as well.

use crate::model::{Document, DocumentId};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListedDocument {
    pub index: usize,
    pub document: Document,
    pub starred: bool,
}

/// User input naming a document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DocSelector {
    Index(usize),
    Id(DocumentId),
}

impl fmt::Display for DocSelector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DocSelector::Index(i) => write!(f, "{}", i),
            DocSelector::Id(id) => write!(f, "{}", id),
        }
    }
}

impl FromStr for DocSelector {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.is_empty() {
            return Err("Empty document selector".to_string());
        }
        match s.parse::<usize>() {
            Ok(0) => Err("Indexes start at 1".to_string()),
            Ok(n) => Ok(DocSelector::Index(n)),
            Err(_) => Ok(DocSelector::Id(DocumentId::from(s))),
        }
    }
}

/// Sort newest first and number from 1. Ties on the timestamp fall back to
/// the id so the order is deterministic.
pub fn index_documents(mut docs: Vec<Document>, starred: &[DocumentId]) -> Vec<ListedDocument> {
    docs.sort_by(|a, b| {
        b.last_modified
            .cmp(&a.last_modified)
            .then_with(|| a.id.cmp(&b.id))
    });

    docs.into_iter()
        .enumerate()
        .map(|(i, document)| ListedDocument {
            index: i + 1,
            starred: starred.contains(&document.id),
            document,
        })
        .collect()
}
