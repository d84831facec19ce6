use crate::commands::{CmdResult, ListFilter};
use crate::error::Result;
use crate::store::DocumentStore;

use super::helpers::{indexed_documents, starred_documents};

pub fn run<S: DocumentStore + ?Sized>(store: &S, filter: ListFilter) -> Result<CmdResult> {
    let listed = match filter {
        ListFilter::All => indexed_documents(store)?,
        ListFilter::Starred => starred_documents(store)?,
    };
    Ok(CmdResult::default().with_listed_docs(listed))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::{create, star};
    use crate::index::DocSelector;
    use crate::store::local::LocalStore;
    use crate::store::mem_backend::MemBackend;

    #[test]
    fn lists_newest_first() {
        let mut store = LocalStore::new(MemBackend::new());
        create::run(&mut store, Some("A".into()), None).unwrap();
        std::thread::sleep(std::time::Duration::from_millis(5));
        create::run(&mut store, Some("B".into()), None).unwrap();

        let result = run(&store, ListFilter::All).unwrap();
        let titles: Vec<_> = result
            .listed_docs
            .iter()
            .map(|l| l.document.title.as_str())
            .collect();
        assert_eq!(titles, vec!["B", "A"]);
        assert_eq!(result.listed_docs[0].index, 1);
    }

    #[test]
    fn starred_filter_keeps_all_list_indexes() {
        let mut store = LocalStore::new(MemBackend::new());
        create::run(&mut store, Some("A".into()), None).unwrap();
        std::thread::sleep(std::time::Duration::from_millis(5));
        create::run(&mut store, Some("B".into()), None).unwrap();
        star::run(&mut store, &[DocSelector::Index(2)]).unwrap();

        let result = run(&store, ListFilter::Starred).unwrap();
        assert_eq!(result.listed_docs.len(), 1);
        assert_eq!(result.listed_docs[0].document.title, "A");
        assert_eq!(result.listed_docs[0].index, 2);
        assert!(result.listed_docs[0].starred);
    }

    #[test]
    fn starred_view_reads_the_starred_index() {
        let mut store = LocalStore::new(MemBackend::new());
        let id = create::run(&mut store, Some("Unlisted".into()), None)
            .unwrap()
            .affected_docs[0]
            .id
            .clone();
        store.backend().insert_raw("rmdify-docs-list", "[]");
        store.set_starred(&id, true).unwrap();

        assert!(run(&store, ListFilter::All).unwrap().listed_docs.is_empty());
        let result = run(&store, ListFilter::Starred).unwrap();
        assert_eq!(result.listed_docs.len(), 1);
        assert_eq!(result.listed_docs[0].document.title, "Unlisted");
        assert_eq!(result.listed_docs[0].index, 1);
    }

    #[test]
    fn empty_store_lists_nothing() {
        let store = LocalStore::new(MemBackend::new());
        assert!(run(&store, ListFilter::All).unwrap().listed_docs.is_empty());
    }
}
