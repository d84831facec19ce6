use crate::commands::CmdResult;
use crate::error::Result;
use crate::index::DocSelector;
use crate::preview;
use crate::store::DocumentStore;

use super::helpers::resolve_selector;

/// Show a document's raw Markdown, or its rendered preview.
pub fn run<S: DocumentStore + ?Sized>(
    store: &S,
    selector: &DocSelector,
    rendered: bool,
) -> Result<CmdResult> {
    let id = resolve_selector(store, selector)?;
    let doc = store.get(&id)?;
    let body = if rendered {
        preview::render(&doc.content)
    } else {
        doc.content.clone()
    };
    Ok(CmdResult::default()
        .with_rendered(body)
        .with_affected_docs(vec![doc]))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::create;
    use crate::store::local::LocalStore;
    use crate::store::mem_backend::MemBackend;

    #[test]
    fn raw_and_preview() {
        let mut store = LocalStore::new(MemBackend::new());
        create::run(&mut store, Some("T".into()), Some("# Head\n\n*soft*".into())).unwrap();

        let raw = run(&store, &DocSelector::Index(1), false).unwrap();
        assert_eq!(raw.rendered.as_deref(), Some("# Head\n\n*soft*"));
        assert_eq!(raw.affected_docs[0].title, "T");

        let preview = run(&store, &DocSelector::Index(1), true).unwrap();
        assert_eq!(preview.rendered.as_deref(), Some("Head\n====\n\nsoft"));
    }
}
