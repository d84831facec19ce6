use crate::error::{Result, RmdifyError};
use crate::index::{index_documents, DocSelector, ListedDocument};
use crate::model::{Document, DocumentId};
use crate::store::DocumentStore;
use tracing::warn;

/// Load every id in `ids`, skipping records that are gone or unreadable.
pub fn load_documents<S: DocumentStore + ?Sized>(store: &S, ids: &[DocumentId]) -> Vec<Document> {
    ids.iter()
        .filter_map(|id| match store.get(id) {
            Ok(doc) => Some(doc),
            Err(RmdifyError::DocumentNotFound(_)) => {
                warn!(id = %id, "indexed document has no stored record");
                None
            }
            Err(e) => {
                warn!(id = %id, error = %e, "skipping unreadable document");
                None
            }
        })
        .collect()
}

/// All documents with their display indexes, newest first.
pub fn indexed_documents<S: DocumentStore + ?Sized>(store: &S) -> Result<Vec<ListedDocument>> {
    let ids = store.list_ids()?;
    let starred = store.list_starred_ids()?;
    Ok(index_documents(load_documents(store, &ids), &starred))
}

/// Documents named by the starred index. Ids that are also in the document
/// index keep their display index; starred records missing from it are
/// numbered after the last indexed document.
pub fn starred_documents<S: DocumentStore + ?Sized>(store: &S) -> Result<Vec<ListedDocument>> {
    let all = indexed_documents(store)?;
    let starred = store.list_starred_ids()?;

    let mut listed = Vec::with_capacity(starred.len());
    let mut unindexed: Vec<DocumentId> = Vec::new();
    for id in &starred {
        match all.iter().find(|l| &l.document.id == id) {
            Some(entry) => listed.push(entry.clone()),
            None if !unindexed.contains(id) => unindexed.push(id.clone()),
            None => {}
        }
    }

    let offset = all.len();
    let extra = index_documents(load_documents(store, &unindexed), &unindexed);
    listed.extend(extra.into_iter().map(|mut entry| {
        entry.index += offset;
        entry
    }));
    listed.sort_by_key(|entry| entry.index);
    Ok(listed)
}

/// Resolve selectors to ids. All selectors are checked before any is
/// returned, so a typo aborts the whole batch.
pub fn resolve_selectors<S: DocumentStore + ?Sized>(
    store: &S,
    selectors: &[DocSelector],
) -> Result<Vec<DocumentId>> {
    let needs_index = selectors
        .iter()
        .any(|s| matches!(s, DocSelector::Index(_)));
    let mut indexed = if needs_index {
        indexed_documents(store)?
    } else {
        Vec::new()
    };
    // Numbers past the document index can only name unindexed starred records
    let known = indexed.len();
    if selectors
        .iter()
        .any(|s| matches!(s, DocSelector::Index(n) if *n > known))
    {
        indexed.extend(
            starred_documents(store)?
                .into_iter()
                .filter(|entry| entry.index > known),
        );
    }

    selectors
        .iter()
        .map(|selector| match selector {
            DocSelector::Index(n) => indexed
                .iter()
                .find(|listed| listed.index == *n)
                .map(|listed| listed.document.id.clone())
                .ok_or_else(|| RmdifyError::Api(format!("Index {} not found", n))),
            DocSelector::Id(id) => {
                store.get(id)?;
                Ok(id.clone())
            }
        })
        .collect()
}

pub fn resolve_selector<S: DocumentStore + ?Sized>(
    store: &S,
    selector: &DocSelector,
) -> Result<DocumentId> {
    let mut ids = resolve_selectors(store, std::slice::from_ref(selector))?;
    ids.pop()
        .ok_or_else(|| RmdifyError::Api(format!("Nothing matches {}", selector)))
}
