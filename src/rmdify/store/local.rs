use super::backend::KvBackend;
use super::{DoctorReport, DocumentStore};
use crate::error::{Result, RmdifyError};
use crate::model::{Document, DocumentId};
use chrono::Utc;
use tracing::{debug, warn};

pub const DEFAULT_NAMESPACE: &str = "rmdify";

const DOCS_LIST_SUFFIX: &str = "docs-list";
const STARRED_SUFFIX: &str = "starred";

/// [`DocumentStore`] over a [`KvBackend`] using the local-storage key layout.
pub struct LocalStore<B: KvBackend> {
    backend: B,
    namespace: String,
}

impl<B: KvBackend> LocalStore<B> {
    pub fn new(backend: B) -> Self {
        Self {
            backend,
            namespace: DEFAULT_NAMESPACE.to_string(),
        }
    }

    pub fn with_namespace(mut self, namespace: &str) -> Self {
        self.namespace = namespace.to_string();
        self
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    fn doc_key(&self, id: &DocumentId) -> String {
        format!("{}-{}", self.namespace, id)
    }

    fn docs_list_key(&self) -> String {
        format!("{}-{}", self.namespace, DOCS_LIST_SUFFIX)
    }

    fn starred_key(&self) -> String {
        format!("{}-{}", self.namespace, STARRED_SUFFIX)
    }

    /// Ids that would collide with the index keys.
    fn check_id(&self, id: &DocumentId) -> Result<()> {
        let raw = id.as_str();
        if raw.is_empty()
            || raw == DOCS_LIST_SUFFIX
            || raw == STARRED_SUFFIX
            || is_index_key(raw)
        {
            return Err(RmdifyError::Api(format!("Invalid document id: '{}'", raw)));
        }
        Ok(())
    }

    fn read_id_list(&self, key: &str) -> Result<Vec<DocumentId>> {
        let Some(raw) = self.backend.get_item(key)? else {
            return Ok(Vec::new());
        };
        match serde_json::from_str(&raw) {
            Ok(ids) => Ok(ids),
            Err(e) => {
                warn!(key, error = %e, "unreadable id list, treating as empty");
                Ok(Vec::new())
            }
        }
    }

    fn write_id_list(&self, key: &str, ids: &[DocumentId]) -> Result<()> {
        let json = serde_json::to_string(ids).map_err(RmdifyError::Serialization)?;
        self.backend.set_item(key, &json)
    }

    fn read_document(&self, id: &DocumentId) -> Result<Option<Document>> {
        match self.backend.get_item(&self.doc_key(id))? {
            Some(raw) => serde_json::from_str(&raw)
                .map(Some)
                .map_err(RmdifyError::Serialization),
            None => Ok(None),
        }
    }
}

impl<B: KvBackend> DocumentStore for LocalStore<B> {
    fn get(&self, id: &DocumentId) -> Result<Document> {
        self.read_document(id)?
            .ok_or_else(|| RmdifyError::DocumentNotFound(id.clone()))
    }

    fn put(&mut self, doc: &Document) -> Result<Document> {
        self.check_id(&doc.id)?;

        match self.read_document(&doc.id) {
            Ok(Some(existing)) if existing.version != doc.version => {
                return Err(RmdifyError::Conflict {
                    id: doc.id.clone(),
                    expected: doc.version,
                    found: existing.version,
                });
            }
            Ok(_) => {}
            Err(e) => warn!(id = %doc.id, error = %e, "overwriting unreadable record"),
        }

        let mut stored = doc.clone();
        stored.version = doc.version + 1;
        stored.last_modified = Utc::now();
        let json = serde_json::to_string(&stored).map_err(RmdifyError::Serialization)?;
        self.backend.set_item(&self.doc_key(&stored.id), &json)?;

        let list_key = self.docs_list_key();
        let mut ids = self.read_id_list(&list_key)?;
        if !ids.contains(&stored.id) {
            ids.push(stored.id.clone());
            self.write_id_list(&list_key, &ids)?;
        }

        debug!(id = %stored.id, version = stored.version, "document saved");
        Ok(stored)
    }

    fn delete(&mut self, id: &DocumentId) -> Result<()> {
        let key = self.doc_key(id);
        if self.backend.get_item(&key)?.is_none() {
            return Err(RmdifyError::DocumentNotFound(id.clone()));
        }
        self.backend.remove_item(&key)?;

        for index_key in [self.docs_list_key(), self.starred_key()] {
            let mut ids = self.read_id_list(&index_key)?;
            let before = ids.len();
            ids.retain(|other| other != id);
            if ids.len() != before {
                self.write_id_list(&index_key, &ids)?;
            }
        }

        debug!(id = %id, "document deleted");
        Ok(())
    }

    fn list_ids(&self) -> Result<Vec<DocumentId>> {
        self.read_id_list(&self.docs_list_key())
    }

    fn list_starred_ids(&self) -> Result<Vec<DocumentId>> {
        self.read_id_list(&self.starred_key())
    }

    fn set_starred(&mut self, id: &DocumentId, starred: bool) -> Result<()> {
        let key = self.starred_key();
        let mut ids = self.read_id_list(&key)?;
        let present = ids.contains(id);
        match (starred, present) {
            (true, false) => ids.push(id.clone()),
            (false, true) => ids.retain(|other| other != id),
            _ => return Ok(()),
        }
        self.write_id_list(&key, &ids)
    }

    fn doctor(&mut self) -> Result<DoctorReport> {
        let mut report = DoctorReport::default();
        let list_key = self.docs_list_key();
        let starred_key = self.starred_key();
        let prefix = format!("{}-", self.namespace);

        // 1. Indexed ids must resolve to a record
        let original_ids = self.list_ids()?;
        let mut ids: Vec<DocumentId> = Vec::with_capacity(original_ids.len());
        for id in &original_ids {
            if ids.contains(id) {
                continue;
            }
            if self.backend.get_item(&self.doc_key(id))?.is_some() {
                ids.push(id.clone());
            } else {
                report.dropped_missing += 1;
            }
        }

        // 2. Records must be indexed
        for key in self.backend.keys()? {
            // Index keys of this or a nested namespace ("<ns>-work-docs-list")
            if is_index_key(&key) {
                continue;
            }
            let Some(raw_id) = key.strip_prefix(&prefix) else {
                continue;
            };
            let id = DocumentId::from(raw_id);
            match self.read_document(&id) {
                // A record under a nested namespace carries its own, shorter id
                Ok(Some(doc)) if doc.id != id => {
                    debug!(key = %key, "skipping record of another namespace");
                }
                Ok(Some(_)) if !ids.contains(&id) => {
                    ids.push(id);
                    report.reindexed_orphans += 1;
                }
                Ok(_) => {}
                Err(e) => {
                    warn!(key = %key, error = %e, "corrupt document record");
                    report.corrupt_records += 1;
                }
            }
        }

        if ids != original_ids {
            self.write_id_list(&list_key, &ids)?;
        }

        // 3. Starred ids must be indexed
        let starred = self.list_starred_ids()?;
        let mut kept: Vec<DocumentId> = Vec::with_capacity(starred.len());
        for id in &starred {
            if ids.contains(id) && !kept.contains(id) {
                kept.push(id.clone());
            } else if !ids.contains(id) {
                report.dropped_dangling_stars += 1;
            }
        }
        if kept != starred {
            self.write_id_list(&starred_key, &kept)?;
        }

        Ok(report)
    }
}

fn is_index_key(key: &str) -> bool {
    [DOCS_LIST_SUFFIX, STARRED_SUFFIX].iter().any(|suffix| {
        key.strip_suffix(suffix)
            .map(|rest| rest.ends_with('-'))
            .unwrap_or(false)
    })
}
