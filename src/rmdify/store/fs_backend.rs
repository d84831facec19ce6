use super::backend::KvBackend;
use crate::error::{Result, RmdifyError};
use std::fs;
use std::path::PathBuf;
use uuid::Uuid;

const ITEM_EXT: &str = ".json";

/// Directory-backed key/value store: one file per key.
///
/// ```text
/// <root>/
/// ├── rmdify-docs-list.json
/// ├── rmdify-starred.json
/// └── rmdify-doc-1700000000000-1a2b3c4d.json
/// ```
pub struct FsBackend {
    root: PathBuf,
    quota: Option<u64>,
}

impl FsBackend {
    pub fn new(root: PathBuf) -> Self {
        Self { root, quota: None }
    }

    pub fn with_quota(mut self, quota: Option<u64>) -> Self {
        self.quota = quota;
        self
    }

    fn item_path(&self, key: &str) -> PathBuf {
        self.root.join(format!("{}{}", encode_key(key), ITEM_EXT))
    }

    fn ensure_dir(&self) -> Result<()> {
        if !self.root.exists() {
            fs::create_dir_all(&self.root).map_err(RmdifyError::Io)?;
        }
        Ok(())
    }

    fn item_files(&self) -> Result<Vec<PathBuf>> {
        if !self.root.exists() {
            return Ok(Vec::new());
        }
        let mut files = Vec::new();
        for entry in fs::read_dir(&self.root).map_err(RmdifyError::Io)? {
            let path = entry.map_err(RmdifyError::Io)?.path();
            let is_item = path
                .file_name()
                .and_then(|n| n.to_str())
                .map(|n| n.ends_with(ITEM_EXT) && !n.starts_with('.'))
                .unwrap_or(false);
            if is_item && path.is_file() {
                files.push(path);
            }
        }
        Ok(files)
    }

    fn check_quota(&self, key: &str, value: &str) -> Result<()> {
        let Some(quota) = self.quota else {
            return Ok(());
        };
        let target = self.item_path(key);
        let mut used = 0u64;
        for path in self.item_files()? {
            if path == target {
                continue;
            }
            used += fs::metadata(&path).map_err(RmdifyError::Io)?.len();
        }
        let needed = used + value.len() as u64;
        if needed > quota {
            return Err(RmdifyError::QuotaExceeded {
                key: key.to_string(),
                needed,
                quota,
            });
        }
        Ok(())
    }
}

impl KvBackend for FsBackend {
    fn get_item(&self, key: &str) -> Result<Option<String>> {
        let path = self.item_path(key);
        if !path.exists() {
            return Ok(None);
        }
        fs::read_to_string(path).map(Some).map_err(RmdifyError::Io)
    }

    fn set_item(&self, key: &str, value: &str) -> Result<()> {
        self.ensure_dir()?;
        self.check_quota(key, value)?;

        // Write to a temp file then rename so readers never see partial values
        let tmp = self.root.join(format!(".item-{}.tmp", Uuid::new_v4()));
        if let Err(e) = fs::write(&tmp, value).and_then(|_| fs::rename(&tmp, self.item_path(key)))
        {
            let _ = fs::remove_file(&tmp);
            return Err(RmdifyError::Io(e));
        }
        Ok(())
    }

    fn remove_item(&self, key: &str) -> Result<()> {
        let path = self.item_path(key);
        if path.exists() {
            fs::remove_file(path).map_err(RmdifyError::Io)?;
        }
        Ok(())
    }

    fn keys(&self) -> Result<Vec<String>> {
        let mut keys: Vec<String> = self
            .item_files()?
            .iter()
            .filter_map(|p| p.file_name().and_then(|n| n.to_str()))
            .filter_map(|n| n.strip_suffix(ITEM_EXT))
            .filter_map(decode_key)
            .collect();
        keys.sort();
        Ok(keys)
    }
}

/// Keys become file names: anything outside `[A-Za-z0-9_-]` is `%XX` escaped.
fn encode_key(key: &str) -> String {
    let mut out = String::with_capacity(key.len());
    for byte in key.bytes() {
        if byte.is_ascii_alphanumeric() || byte == b'-' || byte == b'_' {
            out.push(byte as char);
        } else {
            out.push_str(&format!("%{:02X}", byte));
        }
    }
    out
}

fn decode_key(name: &str) -> Option<String> {
    let bytes = name.as_bytes();
    let mut out = Vec::with_capacity(bytes.len());
    let mut i = 0;
    while i < bytes.len() {
        if bytes[i] == b'%' {
            let hex = name.get(i + 1..i + 3)?;
            out.push(u8::from_str_radix(hex, 16).ok()?);
            i += 3;
        } else {
            out.push(bytes[i]);
            i += 1;
        }
    }
    String::from_utf8(out).ok()
}
