use crate::commands::{CmdMessage, CmdResult};
use crate::error::Result;
use crate::model::Document;
use crate::store::DocumentStore;
use std::fs;
use std::path::Path;
use tracing::debug;

const STRIPPED_EXTENSIONS: &[&str] = &["md", "txt"];

/// Import a local file as a new document. A path that does not exist is not
/// an error: nothing is stored and an info message says so.
pub fn run<S: DocumentStore + ?Sized>(store: &mut S, path: &Path) -> Result<CmdResult> {
    let mut result = CmdResult::default();
    if !path.is_file() {
        result.add_message(CmdMessage::info(format!(
            "No file opened: {} not found",
            path.display()
        )));
        return Ok(result);
    }

    let content = fs::read_to_string(path)?;
    let doc = Document::new(title_from_path(path), content);
    let stored = store.put(&doc)?;
    debug!(path = %path.display(), id = %stored.id, "file opened");

    result.add_message(CmdMessage::success(format!(
        "Opened {} as: {}",
        path.display(),
        stored.title
    )));
    Ok(result.with_affected_docs(vec![stored]))
}

/// File name with a trailing `.md` / `.txt` removed.
fn title_from_path(path: &Path) -> String {
    let stripped = path
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| STRIPPED_EXTENSIONS.contains(&ext.to_ascii_lowercase().as_str()))
        .unwrap_or(false);

    let name = if stripped {
        path.file_stem()
    } else {
        path.file_name()
    };
    name.map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default()
}
