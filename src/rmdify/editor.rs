//! Editing a single document.
//!
//! [`EditorSession`] holds the working draft, its save status and the
//! autosave timer. It never reads the clock or touches the terminal: callers
//! pass `now` in and decide how to surface errors.
//!
//! The second half of the module is the external-editor round trip used by
//! `rmdify edit`: the draft is written to a temp file as `title\n\ncontent`,
//! `$EDITOR` runs on it, and the buffer is parsed back.

use crate::debounce::Debouncer;
use crate::error::{Result, RmdifyError};
use crate::model::{Document, DocumentId};
use crate::preview;
use crate::store::DocumentStore;
use std::env;
use std::fs;
use std::path::Path;
use std::process::Command;
use std::time::{Duration, Instant};
use tracing::{debug, warn};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SaveStatus {
    Saved,
    Unsaved,
    Saving,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EditorTab {
    #[default]
    Editor,
    Preview,
}

pub struct EditorSession {
    draft: Document,
    status: SaveStatus,
    tab: EditorTab,
    autosave: Debouncer,
}

impl EditorSession {
    /// Load `id` into a draft, or start a fresh document from the template.
    ///
    /// An id with no stored record keeps that id. A record that fails to parse
    /// is logged and replaced by the template on the next save.
    pub fn open<S: DocumentStore + ?Sized>(
        store: &S,
        id: Option<&DocumentId>,
        autosave_delay: Duration,
    ) -> Result<Self> {
        let (draft, status) = match id {
            None => (Document::template(DocumentId::generate()), SaveStatus::Unsaved),
            Some(id) => match store.get(id) {
                Ok(doc) => (doc, SaveStatus::Saved),
                Err(RmdifyError::DocumentNotFound(_)) => {
                    (Document::template(id.clone()), SaveStatus::Unsaved)
                }
                Err(RmdifyError::Serialization(e)) => {
                    warn!(id = %id, error = %e, "stored document is corrupt, starting from template");
                    (Document::template(id.clone()), SaveStatus::Unsaved)
                }
                Err(e) => return Err(e),
            },
        };

        debug!(id = %draft.id, ?status, "editor session opened");
        Ok(Self {
            draft,
            status,
            tab: EditorTab::default(),
            autosave: Debouncer::new(autosave_delay),
        })
    }

    pub fn draft(&self) -> &Document {
        &self.draft
    }

    pub fn status(&self) -> SaveStatus {
        self.status
    }

    pub fn tab(&self) -> EditorTab {
        self.tab
    }

    pub fn set_title(&mut self, title: &str, now: Instant) {
        self.draft.title = title.to_string();
        self.touch(now);
    }

    pub fn set_content(&mut self, content: &str, now: Instant) {
        self.draft.content = content.to_string();
        self.touch(now);
    }

    fn touch(&mut self, now: Instant) {
        self.status = SaveStatus::Unsaved;
        self.autosave.trigger(now);
    }

    /// Time until the pending autosave fires.
    pub fn autosave_remaining(&self, now: Instant) -> Option<Duration> {
        self.autosave.remaining(now)
    }

    /// Autosave once the quiet period has elapsed. Returns whether a save ran.
    pub fn poll<S: DocumentStore + ?Sized>(&mut self, store: &mut S, now: Instant) -> Result<bool> {
        if !self.autosave.fire_if_due(now) || self.status != SaveStatus::Unsaved {
            return Ok(false);
        }
        debug!(id = %self.draft.id, "autosave");
        self.save(store)?;
        Ok(true)
    }

    /// Persist the draft. On failure the draft stays `Unsaved` and no retry
    /// is scheduled.
    pub fn save<S: DocumentStore + ?Sized>(&mut self, store: &mut S) -> Result<&Document> {
        self.status = SaveStatus::Saving;
        self.autosave.cancel();

        match store.put(&self.draft) {
            Ok(stored) => {
                self.draft = stored;
                self.status = SaveStatus::Saved;
                Ok(&self.draft)
            }
            Err(e) => {
                warn!(id = %self.draft.id, error = %e, "save failed");
                self.status = SaveStatus::Unsaved;
                Err(e)
            }
        }
    }

    pub fn toggle_tab(&mut self) -> EditorTab {
        self.tab = match self.tab {
            EditorTab::Editor => EditorTab::Preview,
            EditorTab::Preview => EditorTab::Editor,
        };
        self.tab
    }

    /// The draft content rendered as terminal text.
    pub fn preview(&self) -> String {
        preview::render(&self.draft.content)
    }
}

/// Title and Markdown body as laid out in an editor buffer.
/// Format: title\n\ncontent
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditorBuffer {
    pub title: String,
    pub content: String,
}

impl EditorBuffer {
    pub fn new(title: String, content: String) -> Self {
        Self { title, content }
    }

    pub fn to_buffer(&self) -> String {
        format!("{}\n\n{}", self.title, self.content)
    }

    /// First line is the title; leading blank lines of the body are skipped
    /// and the rest is kept verbatim apart from trailing whitespace.
    pub fn from_buffer(buffer: &str) -> Self {
        let (title, rest) = buffer.split_once('\n').unwrap_or((buffer, ""));
        let body = rest.trim_start_matches(['\n', '\r']).trim_end();
        Self {
            title: title.trim().to_string(),
            content: body.to_string(),
        }
    }

    /// True when `edited` is what an untouched round trip of `self` parses
    /// back to. Trailing whitespace the buffer format drops is not a change.
    pub fn is_unchanged(&self, edited: &EditorBuffer) -> bool {
        EditorBuffer::from_buffer(&self.to_buffer()) == *edited
    }
}

/// Editor command from `$EDITOR`, then `$VISUAL`, then the first of
/// vim/vi/nano found on the path.
pub fn get_editor() -> Result<String> {
    for var in ["EDITOR", "VISUAL"] {
        if let Ok(editor) = env::var(var) {
            if !editor.is_empty() {
                return Ok(editor);
            }
        }
    }

    for fallback in ["vim", "vi", "nano"] {
        if Command::new("which")
            .arg(fallback)
            .output()
            .map(|o| o.status.success())
            .unwrap_or(false)
        {
            return Ok(fallback.to_string());
        }
    }

    Err(RmdifyError::Api(
        "No editor found. Set $EDITOR environment variable.".to_string(),
    ))
}

/// Opens a file in the user's editor, waits for it to exit and returns the
/// file contents afterwards.
pub fn open_in_editor<P: AsRef<Path>>(file_path: P) -> Result<String> {
    let editor = get_editor()?;
    let path = file_path.as_ref();

    // $EDITOR may carry arguments ("code --wait")
    let mut parts = editor.split_whitespace();
    let program = parts.next().unwrap_or(editor.as_str());

    let status = Command::new(program)
        .args(parts)
        .arg(path)
        .status()
        .map_err(|e| RmdifyError::Api(format!("Failed to launch editor '{}': {}", editor, e)))?;

    if !status.success() {
        return Err(RmdifyError::Api(format!(
            "Editor '{}' exited with non-zero status",
            editor
        )));
    }

    Ok(fs::read_to_string(path)?)
}

/// Round-trip a title/body pair through the external editor.
pub fn edit_buffer(initial: &EditorBuffer) -> Result<EditorBuffer> {
    let temp_file = env::temp_dir().join(format!("rmdify-edit-{}.md", Uuid::new_v4().simple()));
    fs::write(&temp_file, initial.to_buffer())?;

    let result = open_in_editor(&temp_file);
    let _ = fs::remove_file(&temp_file);

    Ok(EditorBuffer::from_buffer(&result?))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{TEMPLATE_CONTENT, UNTITLED};
    use crate::store::local::LocalStore;
    use crate::store::mem_backend::MemBackend;

    const DELAY: Duration = Duration::from_millis(3000);

    fn store() -> LocalStore<MemBackend> {
        LocalStore::new(MemBackend::new())
    }

    #[test]
    fn new_session_starts_from_template() {
        let store = store();
        let session = EditorSession::open(&store, None, DELAY).unwrap();
        assert_eq!(session.draft().title, UNTITLED);
        assert_eq!(session.draft().content, TEMPLATE_CONTENT);
        assert_eq!(session.status(), SaveStatus::Unsaved);
        assert_eq!(session.tab(), EditorTab::Editor);
        assert!(store.list_ids().unwrap().is_empty());
    }

    #[test]
    fn opening_stored_document_is_saved() {
        let mut store = store();
        let doc = store
            .put(&Document::new("Notes".into(), "body".into()))
            .unwrap();

        let session = EditorSession::open(&store, Some(&doc.id), DELAY).unwrap();
        assert_eq!(session.status(), SaveStatus::Saved);
        assert_eq!(session.draft().content, "body");
    }

    #[test]
    fn unknown_id_keeps_id_with_template() {
        let store = store();
        let id = DocumentId::from("doc-123");
        let session = EditorSession::open(&store, Some(&id), DELAY).unwrap();
        assert_eq!(session.draft().id, id);
        assert_eq!(session.draft().title, UNTITLED);
    }

    #[test]
    fn corrupt_record_falls_back_to_template() {
        let mut store = store();
        store.backend().insert_raw("rmdify-doc-bad", "{not json");
        let id = DocumentId::from("doc-bad");

        let mut session = EditorSession::open(&store, Some(&id), DELAY).unwrap();
        assert_eq!(session.draft().content, TEMPLATE_CONTENT);

        session.save(&mut store).unwrap();
        assert_eq!(store.get(&id).unwrap().title, UNTITLED);
    }

    #[test]
    fn edits_mark_unsaved_and_autosave_after_delay() {
        let mut store = store();
        let start = Instant::now();
        let mut session = EditorSession::open(&store, None, DELAY).unwrap();

        session.set_title("Draft", start);
        session.set_content("# Hi", start + Duration::from_millis(1000));
        assert_eq!(session.status(), SaveStatus::Unsaved);

        // Only 3s after the last edit counts
        assert!(!session.poll(&mut store, start + DELAY).unwrap());
        assert!(session
            .poll(&mut store, start + Duration::from_millis(4000))
            .unwrap());

        assert_eq!(session.status(), SaveStatus::Saved);
        let stored = store.get(&session.draft().id).unwrap();
        assert_eq!(stored.title, "Draft");
        assert_eq!(stored.content, "# Hi");
        assert_eq!(store.list_ids().unwrap().len(), 1);
    }

    #[test]
    fn poll_without_edits_does_nothing() {
        let mut store = store();
        let mut session = EditorSession::open(&store, None, DELAY).unwrap();
        assert!(!session.poll(&mut store, Instant::now() + DELAY * 2).unwrap());
        assert!(store.list_ids().unwrap().is_empty());
    }

    #[test]
    fn manual_save_cancels_pending_autosave() {
        let mut store = store();
        let start = Instant::now();
        let mut session = EditorSession::open(&store, None, DELAY).unwrap();

        session.set_content("text", start);
        session.save(&mut store).unwrap();
        assert_eq!(session.draft().version, 1);
        assert!(!session.poll(&mut store, start + DELAY).unwrap());
        assert_eq!(session.draft().version, 1);
    }

    #[test]
    fn repeated_saves_keep_one_index_entry() {
        let mut store = store();
        let mut session = EditorSession::open(&store, None, DELAY).unwrap();
        session.save(&mut store).unwrap();
        session.set_content("more", Instant::now());
        session.save(&mut store).unwrap();

        assert_eq!(store.list_ids().unwrap(), vec![session.draft().id.clone()]);
        assert_eq!(session.draft().version, 2);
    }

    #[test]
    fn failed_save_stays_unsaved_without_retry() {
        let mut store = store();
        let start = Instant::now();
        let mut session = EditorSession::open(&store, None, DELAY).unwrap();
        session.set_content("lost?", start);

        store.backend().set_simulate_write_error(true);
        assert!(session.poll(&mut store, start + DELAY).is_err());
        assert_eq!(session.status(), SaveStatus::Unsaved);
        assert_eq!(session.autosave_remaining(start + DELAY), None);

        store.backend().set_simulate_write_error(false);
        assert!(!session.poll(&mut store, start + DELAY * 3).unwrap());
        assert_eq!(session.draft().content, "lost?");
    }

    #[test]
    fn quota_exceeded_leaves_draft_unsaved() {
        let mut store = LocalStore::new(MemBackend::new().with_quota(256));
        let mut session = EditorSession::open(&store, None, DELAY).unwrap();
        session.set_content(&"x".repeat(1024), Instant::now());

        let err = session.save(&mut store).unwrap_err();
        assert!(matches!(err, RmdifyError::QuotaExceeded { .. }));
        assert_eq!(session.status(), SaveStatus::Unsaved);
        assert!(store.list_ids().unwrap().is_empty());
    }

    #[test]
    fn stale_session_gets_conflict() {
        let mut store = store();
        let doc = store.put(&Document::new("A".into(), "a".into())).unwrap();

        let mut first = EditorSession::open(&store, Some(&doc.id), DELAY).unwrap();
        let mut second = EditorSession::open(&store, Some(&doc.id), DELAY).unwrap();
        first.set_content("first", Instant::now());
        first.save(&mut store).unwrap();

        second.set_content("second", Instant::now());
        let err = second.save(&mut store).unwrap_err();
        assert!(matches!(err, RmdifyError::Conflict { .. }));
        assert_eq!(store.get(&doc.id).unwrap().content, "first");
    }

    #[test]
    fn toggle_tab_and_preview() {
        let store = store();
        let mut session = EditorSession::open(&store, None, DELAY).unwrap();
        assert_eq!(session.toggle_tab(), EditorTab::Preview);
        assert_eq!(session.toggle_tab(), EditorTab::Editor);

        session.set_content("## Sub\n\n- item", Instant::now());
        assert_eq!(session.preview(), "Sub\n---\n\n• item");
    }

    #[test]
    fn buffer_round_trip() {
        let original = EditorBuffer::new("Title".into(), "# Head\n\n    code".into());
        assert_eq!(EditorBuffer::from_buffer(&original.to_buffer()), original);
    }

    #[test]
    fn trailing_newlines_are_not_an_edit() {
        let original = EditorBuffer::new("Notes".into(), "- one\n- two\n\n".into());
        let untouched = EditorBuffer::from_buffer(&format!("{}\n", original.to_buffer()));
        assert!(original.is_unchanged(&untouched));

        let edited = EditorBuffer::from_buffer("Notes\n\n- one\n- three\n");
        assert!(!original.is_unchanged(&edited));
    }

    #[test]
    fn buffer_title_only() {
        let parsed = EditorBuffer::from_buffer("Just a title\n");
        assert_eq!(parsed.title, "Just a title");
        assert_eq!(parsed.content, "");
    }

    #[test]
    fn buffer_without_blank_separator() {
        let parsed = EditorBuffer::from_buffer("Title\nbody right away\n");
        assert_eq!(parsed.title, "Title");
        assert_eq!(parsed.content, "body right away");
    }

    #[test]
    fn empty_buffer() {
        let parsed = EditorBuffer::from_buffer("");
        assert_eq!(parsed, EditorBuffer::new(String::new(), String::new()));
    }
}
