//! Persistence collaborator for finished reports.

use std::fs;
use std::path::{Path, PathBuf};

use serde_json::Value;
use tracing::{debug, warn};

/// Fire-and-forget persistence. Implementations log and swallow their own errors.
pub trait ReportStore {
    fn save(&self, step_name: &str, payload: &Value, category: &str, session_id: &str);
}

impl<T: ReportStore + ?Sized> ReportStore for &T {
    fn save(&self, step_name: &str, payload: &Value, category: &str, session_id: &str) {
        (**self).save(step_name, payload, category, session_id);
    }
}

/// Discards everything.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullStore;

impl ReportStore for NullStore {
    fn save(&self, step_name: &str, _payload: &Value, category: &str, _session_id: &str) {
        debug!(step_name, category, "report store disabled, skipping save");
    }
}

/// Writes pretty JSON to `<root>/<session_id>/<category>/<step_name>.json`.
#[derive(Debug, Clone)]
pub struct FileStore {
    root: PathBuf,
}

impl FileStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn path_for(&self, step_name: &str, category: &str, session_id: &str) -> PathBuf {
        let session = if session_id.trim().is_empty() {
            "no_session".to_string()
        } else {
            encode_session(session_id)
        };
        self.root
            .join(session)
            .join(sanitize_component(category))
            .join(format!("{}.json", sanitize_component(step_name)))
    }

    fn write(&self, path: &Path, payload: &Value) -> std::io::Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let bytes = serde_json::to_vec_pretty(payload)?;
        fs::write(path, bytes)
    }
}

impl ReportStore for FileStore {
    fn save(&self, step_name: &str, payload: &Value, category: &str, session_id: &str) {
        let path = self.path_for(step_name, category, session_id);
        match self.write(&path, payload) {
            Ok(()) => debug!(path = %path.display(), "report step saved"),
            Err(e) => warn!(%e, path = %path.display(), "failed to save report step"),
        }
    }
}

/// Escapes every byte outside `[A-Za-z0-9-]` as `_xx` hex, `_` included, so
/// distinct session ids always map to distinct directories.
fn encode_session(session_id: &str) -> String {
    let mut out = String::with_capacity(session_id.len());
    for byte in session_id.bytes() {
        if byte.is_ascii_alphanumeric() || byte == b'-' {
            out.push(char::from(byte));
        } else {
            out.push_str(&format!("_{byte:02x}"));
        }
    }
    out
}

/// Keeps path components to `[A-Za-z0-9_-]` so names cannot escape the store root.
/// Lossy; only used for the fixed step and category names.
fn sanitize_component(raw: &str) -> String {
    raw.chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '_' || c == '-' {
                c
            } else {
                '_'
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn writes_json_under_session_and_category() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::new(dir.path());
        let payload = serde_json::json!({"hello": "world"});

        store.save("section_pre_pitch", &payload, "pre_pitch", "session-1");

        let path = dir
            .path()
            .join("session-1")
            .join("pre_pitch")
            .join("section_pre_pitch.json");
        let written: Value = serde_json::from_slice(&fs::read(path).unwrap()).unwrap();
        assert_eq!(written, payload);
    }

    #[test]
    fn path_components_are_sanitized() {
        let store = FileStore::new("/data");
        let path = store.path_for("../step", "cat/egory", "../../etc");
        assert_eq!(
            path,
            PathBuf::from("/data/_2e_2e_2f_2e_2e_2fetc/cat_egory/___step.json")
        );
    }

    #[test]
    fn similar_session_ids_do_not_collide() {
        let store = FileStore::new("/data");
        let slash = store.path_for("step", "cat", "a/b");
        let underscore = store.path_for("step", "cat", "a_b");
        assert_ne!(slash, underscore);
        assert!(slash.starts_with("/data/a_2fb"));
        assert!(underscore.starts_with("/data/a_5fb"));
    }

    #[test]
    fn blank_session_uses_placeholder() {
        let store = FileStore::new("/data");
        let path = store.path_for("step", "cat", "  ");
        assert!(path.starts_with("/data/no_session"));
    }

    #[test]
    fn unwritable_root_is_swallowed() {
        let dir = tempfile::tempdir().unwrap();
        let blocker = dir.path().join("file");
        fs::write(&blocker, b"x").unwrap();
        let store = FileStore::new(&blocker);

        store.save("step", &serde_json::json!({}), "cat", "s");

        assert!(!blocker.join("s").exists());
    }
}
