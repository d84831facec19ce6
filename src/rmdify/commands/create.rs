use crate::commands::{CmdMessage, CmdResult};
use crate::error::Result;
use crate::model::{Document, DocumentId};
use crate::store::DocumentStore;

/// Create and store a document. Missing title or content fall back to the
/// new-document template.
pub fn run<S: DocumentStore + ?Sized>(
    store: &mut S,
    title: Option<String>,
    content: Option<String>,
) -> Result<CmdResult> {
    let mut doc = Document::template(DocumentId::generate());
    if let Some(title) = title {
        doc.title = title;
    }
    if let Some(content) = content {
        doc.content = content;
    }

    let stored = store.put(&doc)?;
    let mut result = CmdResult::default();
    result.add_message(CmdMessage::success(format!(
        "Document created: {}",
        stored.title
    )));
    Ok(result.with_affected_docs(vec![stored]))
}
