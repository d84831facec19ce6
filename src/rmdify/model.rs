use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

pub const UNTITLED: &str = "Untitled Document";

/// Starter content for a document that has never been saved.
pub const TEMPLATE_CONTENT: &str = "# New Document\n\nStart writing your markdown here...\n\n## Features\n\n- **Bold text**\n- *Italic text*\n- `Code snippets`\n\n```javascript\nconst hello = \"world\";\nconsole.log(hello);\n```";

/// Opaque document identifier.
///
/// Fresh ids look like `doc-<unix millis>-<8 hex>`. Older records use plain
/// `doc-<unix millis>`; any string is accepted when reading.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DocumentId(String);

impl DocumentId {
    pub fn generate() -> Self {
        let millis = Utc::now().timestamp_millis();
        let suffix = Uuid::new_v4().simple().to_string();
        Self(format!("doc-{}-{}", millis, &suffix[..8]))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for DocumentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<String> for DocumentId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl From<&str> for DocumentId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Document {
    pub id: DocumentId,
    pub title: String,
    pub content: String,
    #[serde(with = "chrono::serde::ts_milliseconds")]
    pub last_modified: DateTime<Utc>,
    // Bumped by the store on every successful put
    #[serde(default)]
    pub version: u64,
}

impl Document {
    pub fn new(title: String, content: String) -> Self {
        Self::with_id(DocumentId::generate(), title, content)
    }

    pub fn with_id(id: DocumentId, title: String, content: String) -> Self {
        Self {
            id,
            title,
            content,
            last_modified: Utc::now(),
            version: 0,
        }
    }

    /// A blank document seeded with the starter template.
    pub fn template(id: DocumentId) -> Self {
        Self::with_id(id, UNTITLED.to_string(), TEMPLATE_CONTENT.to_string())
    }

    /// First `max_chars` characters of the content with newlines flattened.
    pub fn excerpt(&self, max_chars: usize) -> String {
        self.content
            .chars()
            .take(max_chars)
            .map(|c| if c == '\n' { ' ' } else { c })
            .collect()
    }
}
