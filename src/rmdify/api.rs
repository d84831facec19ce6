//! # API Facade
//!
//! A **thin facade** over the command layer and the single entry point for
//! every rmdify operation, whatever the UI.
//!
//! The facade:
//! - **Dispatches** to the matching command function
//! - **Normalizes inputs** (selector strings to [`DocSelector`], config defaults)
//! - **Returns structured types** (`Result<CmdResult>`)
//!
//! It does no printing and holds no business logic. `RmdifyApi<S>` is generic
//! over [`DocumentStore`], so production runs on `LocalStore<FsBackend>` and
//! tests on `LocalStore<MemBackend>`.
//!
//! Interactive editing goes through [`RmdifyApi::open_session`] and
//! [`RmdifyApi::save_session`], which hand the caller an [`EditorSession`]
//! bound to the configured autosave delay.

use crate::commands;
use crate::config::RmdifyConfig;
use crate::editor::EditorSession;
use crate::error::{Result, RmdifyError};
use crate::export::ExportFormat;
use crate::index::DocSelector;
use crate::model::{Document, DocumentId};
use crate::router::Route;
use crate::store::DocumentStore;
use std::path::{Path, PathBuf};
use std::time::Instant;

pub struct RmdifyApi<S: DocumentStore> {
    store: S,
    data_dir: PathBuf,
    config: RmdifyConfig,
}

impl<S: DocumentStore> RmdifyApi<S> {
    pub fn new(store: S, data_dir: PathBuf, config: RmdifyConfig) -> Self {
        Self {
            store,
            data_dir,
            config,
        }
    }

    pub fn create_document(
        &mut self,
        title: Option<String>,
        content: Option<String>,
    ) -> Result<commands::CmdResult> {
        commands::create::run(&mut self.store, title, content)
    }

    pub fn open_file(&mut self, path: &Path) -> Result<commands::CmdResult> {
        commands::open::run(&mut self.store, path)
    }

    pub fn list_documents(&self, filter: commands::ListFilter) -> Result<commands::CmdResult> {
        commands::list::run(&self.store, filter)
    }

    pub fn view_document(&self, selector: &str, preview: bool) -> Result<commands::CmdResult> {
        let selector = parse_selector(selector)?;
        commands::view::run(&self.store, &selector, preview)
    }

    pub fn update_document(
        &mut self,
        selector: &str,
        title: Option<String>,
        content: Option<String>,
    ) -> Result<commands::CmdResult> {
        let selector = parse_selector(selector)?;
        commands::update::run(&mut self.store, &selector, title, content, None)
    }

    /// Save an edit made on `original`. Fails with a conflict if the document
    /// was saved elsewhere since `original` was read.
    pub fn apply_edit(
        &mut self,
        original: &Document,
        title: String,
        content: String,
    ) -> Result<commands::CmdResult> {
        commands::update::run(
            &mut self.store,
            &DocSelector::Id(original.id.clone()),
            Some(title),
            Some(content),
            Some(original.version),
        )
    }

    pub fn toggle_star<I: AsRef<str>>(&mut self, selectors: &[I]) -> Result<commands::CmdResult> {
        let selectors = parse_selectors(selectors)?;
        commands::star::run(&mut self.store, &selectors)
    }

    pub fn delete_documents<I: AsRef<str>>(
        &mut self,
        selectors: &[I],
    ) -> Result<commands::CmdResult> {
        let selectors = parse_selectors(selectors)?;
        commands::delete::run(&mut self.store, &selectors)
    }

    /// Export to `out_dir`. `format` falls back to the configured default.
    pub fn export_document(
        &self,
        selector: &str,
        format: Option<ExportFormat>,
        name: Option<&str>,
        out_dir: &Path,
    ) -> Result<commands::CmdResult> {
        let selector = parse_selector(selector)?;
        let format = format.unwrap_or(self.config.default_export_format);
        commands::export::run(&self.store, &selector, format, name, out_dir)
    }

    pub fn page(&self, path: &str) -> Result<(Route, commands::CmdResult)> {
        commands::page::run(&self.store, path)
    }

    pub fn doctor(&mut self) -> Result<commands::CmdResult> {
        commands::doctor::run(&mut self.store)
    }

    pub fn config(&self, action: ConfigAction) -> Result<commands::CmdResult> {
        commands::config::run(&self.data_dir, action)
    }

    /// Start an editing session. `None` starts a new document.
    pub fn open_session(&self, selector: Option<&str>) -> Result<EditorSession> {
        let id = match selector {
            Some(raw) => Some(self.resolve_id(raw)?),
            None => None,
        };
        EditorSession::open(&self.store, id.as_ref(), self.config.autosave_delay())
    }

    /// Run the session's autosave check against this API's store.
    pub fn poll_session(&mut self, session: &mut EditorSession, now: Instant) -> Result<bool> {
        session.poll(&mut self.store, now)
    }

    pub fn save_session(&mut self, session: &mut EditorSession) -> Result<Document> {
        session.save(&mut self.store).cloned()
    }

    /// Selector to id. Unknown raw ids are kept so a session can create them.
    fn resolve_id(&self, raw: &str) -> Result<DocumentId> {
        match parse_selector(raw)? {
            DocSelector::Id(id) => Ok(id),
            index => commands::helpers::resolve_selector(&self.store, &index),
        }
    }
}

fn parse_selector(input: &str) -> Result<DocSelector> {
    input.parse().map_err(RmdifyError::Api)
}

fn parse_selectors<I: AsRef<str>>(inputs: &[I]) -> Result<Vec<DocSelector>> {
    if inputs.is_empty() {
        return Err(RmdifyError::Api("No documents selected".to_string()));
    }
    inputs.iter().map(|s| parse_selector(s.as_ref())).collect()
}

pub use crate::commands::config::ConfigAction;
pub use commands::{CmdMessage, CmdResult, ListFilter, ListedDocument, MessageLevel};
