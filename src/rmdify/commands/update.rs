use crate::commands::{CmdMessage, CmdResult};
use crate::error::Result;
use crate::index::DocSelector;
use crate::store::DocumentStore;

use super::helpers::resolve_selector;

/// Replace the title and/or content of a stored document.
///
/// With `expected_version`, the write only goes through if the stored record
/// is still at that version; otherwise the store reports a conflict.
pub fn run<S: DocumentStore + ?Sized>(
    store: &mut S,
    selector: &DocSelector,
    title: Option<String>,
    content: Option<String>,
    expected_version: Option<u64>,
) -> Result<CmdResult> {
    let id = resolve_selector(store, selector)?;
    let mut result = CmdResult::default();

    if title.is_none() && content.is_none() {
        result.add_message(CmdMessage::info("Nothing to update."));
        return Ok(result);
    }

    let mut doc = store.get(&id)?;
    if let Some(version) = expected_version {
        doc.version = version;
    }
    if let Some(title) = title {
        doc.title = title;
    }
    if let Some(content) = content {
        doc.content = content;
    }

    let stored = store.put(&doc)?;
    result.add_message(CmdMessage::success(format!(
        "Document updated: {}",
        stored.title
    )));
    Ok(result.with_affected_docs(vec![stored]))
}
