use crate::commands::{CmdMessage, CmdResult};
use crate::error::Result;
use crate::index::DocSelector;
use crate::store::DocumentStore;

use super::helpers::resolve_selectors;

/// Permanently remove the selected documents. Confirmation is the caller's
/// job.
pub fn run<S: DocumentStore + ?Sized>(store: &mut S, selectors: &[DocSelector]) -> Result<CmdResult> {
    let mut ids = resolve_selectors(store, selectors)?;
    let mut seen = Vec::with_capacity(ids.len());
    ids.retain(|id| {
        let fresh = !seen.contains(id);
        if fresh {
            seen.push(id.clone());
        }
        fresh
    });
    let mut result = CmdResult::default();

    for id in ids {
        let doc = store.get(&id)?;
        store.delete(&id)?;
        result.add_message(CmdMessage::success(format!(
            "Document deleted: {}",
            doc.title
        )));
        result.affected_docs.push(doc);
    }

    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::{create, star};
    use crate::error::RmdifyError;
    use crate::store::local::LocalStore;
    use crate::store::mem_backend::MemBackend;

    #[test]
    fn removes_from_both_indexes() {
        let mut store = LocalStore::new(MemBackend::new());
        let id = create::run(&mut store, Some("A".into()), None)
            .unwrap()
            .affected_docs[0]
            .id
            .clone();
        star::run(&mut store, &[DocSelector::Index(1)]).unwrap();

        let result = run(&mut store, &[DocSelector::Index(1)]).unwrap();
        assert_eq!(result.affected_docs[0].title, "A");
        assert!(store.list_ids().unwrap().is_empty());
        assert!(store.list_starred_ids().unwrap().is_empty());
        assert!(matches!(
            store.get(&id),
            Err(RmdifyError::DocumentNotFound(_))
        ));
    }

    #[test]
    fn indexes_resolve_before_any_delete() {
        let mut store = LocalStore::new(MemBackend::new());
        create::run(&mut store, Some("A".into()), None).unwrap();
        std::thread::sleep(std::time::Duration::from_millis(5));
        create::run(&mut store, Some("B".into()), None).unwrap();

        run(&mut store, &[DocSelector::Index(1), DocSelector::Index(2)]).unwrap();
        assert!(store.list_ids().unwrap().is_empty());
    }
}
