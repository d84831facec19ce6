use crate::commands::{CmdMessage, CmdResult};
use crate::error::Result;
use crate::index::DocSelector;
use crate::store::DocumentStore;

use super::helpers::resolve_selectors;

/// Flip the starred flag of each selected document.
pub fn run<S: DocumentStore + ?Sized>(store: &mut S, selectors: &[DocSelector]) -> Result<CmdResult> {
    let ids = resolve_selectors(store, selectors)?;
    let mut result = CmdResult::default();

    for id in ids {
        let doc = store.get(&id)?;
        let starred = !store.is_starred(&id)?;
        store.set_starred(&id, starred)?;

        let verb = if starred { "starred" } else { "unstarred" };
        result.add_message(CmdMessage::success(format!(
            "Document {}: {}",
            verb, doc.title
        )));
        result.affected_docs.push(doc);
    }

    Ok(result)
}
