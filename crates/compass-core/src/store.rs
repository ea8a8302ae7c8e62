//! Durable keyed storage for session records.
//!
//! One JSON file per session, named `<id>.json`, in a dedicated sessions
//! directory. Records survive process restarts. Writes go to a temporary
//! sibling path and are renamed into place so a crash mid-write never
//! leaves a partially written record behind. Listing tolerates unreadable
//! or corrupt records by skipping them with a warning.

use std::{
    fs,
    path::{Path, PathBuf},
};

use log::warn;

use crate::{
    error::{PersistenceResultExt, Result},
    models::Session,
};

/// Filesystem-backed CRUD store for sessions, keyed by session ID.
#[derive(Debug)]
pub struct SessionStore {
    dir: PathBuf,
}

impl SessionStore {
    /// Opens a store rooted at `dir`, creating the directory if needed.
    pub fn new(dir: PathBuf) -> Result<Self> {
        fs::create_dir_all(&dir).at_path(&dir)?;
        Ok(Self { dir })
    }

    /// The directory session records live in.
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, id: &str) -> PathBuf {
        self.dir.join(format!("{id}.json"))
    }

    /// Generated IDs are alphanumeric tokens; anything else cannot name a
    /// record and must not be joined into a path.
    fn is_valid_id(id: &str) -> bool {
        !id.is_empty() && id.chars().all(|c| c.is_ascii_alphanumeric())
    }

    /// Fetches a session by ID. Absent and corrupt records both read as
    /// `None`; corrupt ones are logged.
    pub fn get(&self, id: &str) -> Result<Option<Session>> {
        if !Self::is_valid_id(id) {
            return Ok(None);
        }
        let path = self.path_for(id);
        let text = match fs::read_to_string(&path) {
            Ok(text) => text,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(crate::CompassError::persistence(&path, e)),
        };
        match serde_json::from_str(&text) {
            Ok(session) => Ok(Some(session)),
            Err(e) => {
                warn!("skipping corrupt session record {}: {e}", path.display());
                Ok(None)
            }
        }
    }

    /// Persists a session with an atomic write-then-replace.
    pub fn save(&self, session: &Session) -> Result<()> {
        let path = self.path_for(&session.id);
        let tmp = path.with_extension("json.tmp");
        let body = serde_json::to_vec_pretty(session)?;
        fs::write(&tmp, body).at_path(&tmp)?;
        fs::rename(&tmp, &path).at_path(&path)?;
        Ok(())
    }

    /// Deletes a session record. Returns whether a record existed.
    pub fn delete(&self, id: &str) -> Result<bool> {
        if !Self::is_valid_id(id) {
            return Ok(false);
        }
        let path = self.path_for(id);
        match fs::remove_file(&path) {
            Ok(()) => Ok(true),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(false),
            Err(e) => Err(crate::CompassError::persistence(&path, e)),
        }
    }

    /// Lists every readable session, oldest first. Unreadable or corrupt
    /// records are skipped with a warning rather than failing the listing.
    pub fn list(&self) -> Result<Vec<Session>> {
        let entries = fs::read_dir(&self.dir).at_path(&self.dir)?;
        let mut sessions = Vec::new();
        for entry in entries.flatten() {
            let path = entry.path();
            if path.extension().and_then(|e| e.to_str()) != Some("json") {
                continue;
            }
            let text = match fs::read_to_string(&path) {
                Ok(text) => text,
                Err(e) => {
                    warn!("skipping unreadable session record {}: {e}", path.display());
                    continue;
                }
            };
            match serde_json::from_str::<Session>(&text) {
                Ok(session) => sessions.push(session),
                Err(e) => warn!("skipping corrupt session record {}: {e}", path.display()),
            }
        }
        sessions.sort_by_key(|s| s.created_at);
        Ok(sessions)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Frame, Step};
    use tempfile::TempDir;

    fn store() -> (TempDir, SessionStore) {
        let dir = TempDir::new().expect("temp dir");
        let store = SessionStore::new(dir.path().join("sessions")).expect("store");
        (dir, store)
    }

    fn sample_session() -> Session {
        Session::create(
            "write tests",
            vec![Frame::new("demo", vec![Step::text("one"), Step::text("two")])],
        )
    }

    #[test]
    fn save_then_get_roundtrips() {
        let (_dir, store) = store();
        let session = sample_session();
        store.save(&session).expect("save");

        let loaded = store.get(&session.id).expect("get").expect("present");
        assert_eq!(loaded, session);
    }

    #[test]
    fn get_missing_is_none() {
        let (_dir, store) = store();
        assert!(store.get("nope1234").expect("get").is_none());
    }

    #[test]
    fn get_rejects_path_like_ids() {
        let (_dir, store) = store();
        assert!(store.get("../escape").expect("get").is_none());
        assert!(!store.delete("../escape").expect("delete"));
    }

    #[test]
    fn delete_reports_existence() {
        let (_dir, store) = store();
        let session = sample_session();
        store.save(&session).expect("save");

        assert!(store.delete(&session.id).expect("delete"));
        assert!(!store.delete(&session.id).expect("delete again"));
    }

    #[test]
    fn list_skips_corrupt_records() {
        let (_dir, store) = store();
        let session = sample_session();
        store.save(&session).expect("save");
        std::fs::write(store.dir().join("broken99.json"), "{ not json").expect("write corrupt");

        let listed = store.list().expect("list");
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].id, session.id);
    }

    #[test]
    fn save_leaves_no_temp_files() {
        let (_dir, store) = store();
        store.save(&sample_session()).expect("save");

        let leftovers: Vec<_> = std::fs::read_dir(store.dir())
            .expect("read dir")
            .flatten()
            .filter(|e| e.path().extension().and_then(|x| x.to_str()) == Some("tmp"))
            .collect();
        assert!(leftovers.is_empty());
    }
}
