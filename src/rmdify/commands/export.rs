use crate::commands::{CmdMessage, CmdResult};
use crate::error::Result;
use crate::export::{self, ExportFormat};
use crate::index::DocSelector;
use crate::store::DocumentStore;
use std::fs;
use std::path::Path;

use super::helpers::resolve_selector;

/// Render a document and write the artifact into `out_dir`.
///
/// `name` overrides the file name derived from the title; the format's
/// extension is always appended.
pub fn run<S: DocumentStore + ?Sized>(
    store: &S,
    selector: &DocSelector,
    format: ExportFormat,
    name: Option<&str>,
    out_dir: &Path,
) -> Result<CmdResult> {
    let id = resolve_selector(store, selector)?;
    let doc = store.get(&id)?;

    let base = match name {
        Some(name) => name.to_string(),
        None => export::default_file_name(&doc.title),
    };
    let artifact = export::export(&doc.title, &doc.content, &base, format)?;

    fs::create_dir_all(out_dir)?;
    let path = out_dir.join(&artifact.file_name);
    fs::write(&path, &artifact.bytes)?;

    let mut result = CmdResult::default();
    result.add_message(CmdMessage::success(format!(
        "Exported {} ({}) to {}",
        doc.title,
        artifact.mime_type,
        path.display()
    )));
    result.exported_paths.push(path);
    Ok(result.with_affected_docs(vec![doc]))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::create;
    use crate::store::local::LocalStore;
    use crate::store::mem_backend::MemBackend;
    use tempfile::tempdir;

    fn store_with(title: &str, content: &str) -> LocalStore<MemBackend> {
        let mut store = LocalStore::new(MemBackend::new());
        create::run(&mut store, Some(title.into()), Some(content.into())).unwrap();
        store
    }

    #[test]
    fn writes_html_with_default_name() {
        let dir = tempdir().unwrap();
        let store = store_with("My Notes", "# Title\n\nBody");

        let result = run(&store, &DocSelector::Index(1), ExportFormat::Html, None, dir.path()).unwrap();
        let path = &result.exported_paths[0];
        assert_eq!(path.file_name().unwrap(), "my-notes.html");
        let html = fs::read_to_string(path).unwrap();
        assert!(html.contains("<h1>Title</h1>"));
    }

    #[test]
    fn markdown_is_unchanged_and_name_overrides() {
        let dir = tempdir().unwrap();
        let store = store_with("T", "raw *md*");

        let result = run(
            &store,
            &DocSelector::Index(1),
            ExportFormat::Markdown,
            Some("custom"),
            &dir.path().join("out"),
        )
        .unwrap();
        let path = &result.exported_paths[0];
        assert!(path.ends_with("out/custom.md"));
        assert_eq!(fs::read_to_string(path).unwrap(), "raw *md*");
    }

    #[test]
    fn pdf_export_writes_pdf() {
        let dir = tempdir().unwrap();
        let store = store_with("Report", &"Line of text.\n\n".repeat(150));

        let result = run(&store, &DocSelector::Index(1), ExportFormat::Pdf, None, dir.path()).unwrap();
        let bytes = fs::read(&result.exported_paths[0]).unwrap();
        assert!(bytes.starts_with(b"%PDF-"));
    }

    #[test]
    fn export_does_not_modify_store() {
        let dir = tempdir().unwrap();
        let store = store_with("T", "x");
        let before = store.get(&store.list_ids().unwrap()[0]).unwrap();

        run(&store, &DocSelector::Index(1), ExportFormat::Text, None, dir.path()).unwrap();
        let after = store.get(&before.id).unwrap();
        assert_eq!(before, after);
    }
}
