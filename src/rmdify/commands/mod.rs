use crate::config::RmdifyConfig;
use crate::model::Document;
use crate::store::DoctorReport;
use std::path::PathBuf;

pub use crate::index::ListedDocument;

pub mod config;
pub mod create;
pub mod delete;
pub mod doctor;
pub mod export;
pub mod helpers;
pub mod list;
pub mod open;
pub mod page;
pub mod star;
pub mod update;
pub mod view;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageLevel {
    Info,
    Success,
    Warning,
    Error,
}

#[derive(Debug, Clone)]
pub struct CmdMessage {
    pub level: MessageLevel,
    pub content: String,
}

impl CmdMessage {
    pub fn info(content: impl Into<String>) -> Self {
        Self {
            level: MessageLevel::Info,
            content: content.into(),
        }
    }

    pub fn success(content: impl Into<String>) -> Self {
        Self {
            level: MessageLevel::Success,
            content: content.into(),
        }
    }

    pub fn warning(content: impl Into<String>) -> Self {
        Self {
            level: MessageLevel::Warning,
            content: content.into(),
        }
    }

    pub fn error(content: impl Into<String>) -> Self {
        Self {
            level: MessageLevel::Error,
            content: content.into(),
        }
    }
}

/// Structured outcome of a command. Nothing in here has been printed yet.
#[derive(Debug, Default)]
pub struct CmdResult {
    pub affected_docs: Vec<Document>,
    pub listed_docs: Vec<ListedDocument>,
    pub exported_paths: Vec<PathBuf>,
    /// Body text for `view` and `page`
    pub rendered: Option<String>,
    pub doctor_report: Option<DoctorReport>,
    pub config: Option<RmdifyConfig>,
    pub messages: Vec<CmdMessage>,
}

impl CmdResult {
    pub fn add_message(&mut self, message: CmdMessage) {
        self.messages.push(message);
    }

    pub fn with_affected_docs(mut self, docs: Vec<Document>) -> Self {
        self.affected_docs = docs;
        self
    }

    pub fn with_listed_docs(mut self, docs: Vec<ListedDocument>) -> Self {
        self.listed_docs = docs;
        self
    }

    pub fn with_rendered(mut self, rendered: String) -> Self {
        self.rendered = Some(rendered);
        self
    }

    pub fn with_config(mut self, config: RmdifyConfig) -> Self {
        self.config = Some(config);
        self
    }
}

/// Which index a listing reads from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ListFilter {
    #[default]
    All,
    Starred,
}
