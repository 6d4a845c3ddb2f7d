use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard, PoisonError};

use log::warn;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// The three persisted credential slots: access token, refresh token and the
/// profile of the user they belong to.
#[derive(Debug, Default, Clone, Serialize, Deserialize)]
struct CredentialSlots {
    access_token: Option<String>,
    refresh_token: Option<String>,
    user: Option<Value>,
}

/// Session-context object owning the persisted credentials.
///
/// All operations are synchronous. Mutations are written through to a single
/// JSON file; persistence failures are logged and absorbed, the in-memory
/// slots stay authoritative for the rest of the process. Tokens are stored
/// as-is, no well-formedness checks happen here.
#[derive(Debug)]
pub struct CredentialStore {
    path: PathBuf,
    slots: Mutex<CredentialSlots>,
}

impl CredentialStore {
    /// Open the store rooted at `path`, picking up slots persisted by a
    /// previous session when the file exists and parses.
    pub fn load(path: PathBuf) -> Self {
        let slots = Self::read_slots(&path).unwrap_or_default();
        CredentialStore {
            path,
            slots: Mutex::new(slots),
        }
    }

    fn read_slots(path: &Path) -> Option<CredentialSlots> {
        task_core::paths::load_json(path).ok()
    }

    fn lock(&self) -> MutexGuard<'_, CredentialSlots> {
        self.slots.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn persist(&self, slots: &CredentialSlots) {
        if let Err(e) = task_core::paths::save_json(&self.path, slots) {
            warn!("Failed to persist credentials: {e}");
        }
    }

    pub fn set_access_token(&self, token: &str) {
        let mut slots = self.lock();
        slots.access_token = Some(token.to_string());
        self.persist(&slots);
    }

    pub fn access_token(&self) -> Option<String> {
        self.lock().access_token.clone()
    }

    pub fn set_refresh_token(&self, token: &str) {
        let mut slots = self.lock();
        slots.refresh_token = Some(token.to_string());
        self.persist(&slots);
    }

    pub fn refresh_token(&self) -> Option<String> {
        self.lock().refresh_token.clone()
    }

    pub fn set_user(&self, user: Value) {
        let mut slots = self.lock();
        slots.user = Some(user);
        self.persist(&slots);
    }

    pub fn user(&self) -> Option<Value> {
        self.lock().user.clone()
    }

    /// Store a full session in one step. Login and registration go through
    /// here so both tokens and the profile always change together.
    pub fn set_session(&self, access_token: &str, refresh_token: &str, user: Value) {
        let mut slots = self.lock();
        slots.access_token = Some(access_token.to_string());
        slots.refresh_token = Some(refresh_token.to_string());
        slots.user = Some(user);
        self.persist(&slots);
    }

    /// Drop every slot and the backing file. Used on logout and on an
    /// irrecoverable refresh failure.
    pub fn clear_all(&self) {
        let mut slots = self.lock();
        *slots = CredentialSlots::default();
        let _ = std::fs::remove_file(&self.path);
    }

    pub fn is_authenticated(&self) -> bool {
        self.lock().access_token.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tempfile::tempdir;

    fn store_in(dir: &tempfile::TempDir) -> CredentialStore {
        CredentialStore::load(dir.path().join(".session.json"))
    }

    #[test]
    fn access_token_round_trip() {
        let dir = tempdir().expect("tempdir");
        let store = store_in(&dir);

        store.set_access_token("abc");
        assert_eq!(store.access_token().as_deref(), Some("abc"));
        assert!(store.is_authenticated());

        store.clear_all();
        assert_eq!(store.access_token(), None);
        assert!(!store.is_authenticated());
    }

    #[test]
    fn set_session_fills_all_three_slots() {
        let dir = tempdir().expect("tempdir");
        let store = store_in(&dir);

        store.set_session("access-1", "refresh-1", json!({"username": "ada"}));
        assert_eq!(store.access_token().as_deref(), Some("access-1"));
        assert_eq!(store.refresh_token().as_deref(), Some("refresh-1"));
        assert_eq!(store.user(), Some(json!({"username": "ada"})));
    }

    #[test]
    fn slots_survive_a_reload_from_disk() {
        let dir = tempdir().expect("tempdir");
        let path = dir.path().join(".session.json");

        let store = CredentialStore::load(path.clone());
        store.set_session("access-1", "refresh-1", json!({"id": 7}));
        drop(store);

        let reopened = CredentialStore::load(path);
        assert_eq!(reopened.access_token().as_deref(), Some("access-1"));
        assert_eq!(reopened.refresh_token().as_deref(), Some("refresh-1"));
    }

    #[test]
    fn clear_all_removes_the_backing_file() {
        let dir = tempdir().expect("tempdir");
        let path = dir.path().join(".session.json");

        let store = CredentialStore::load(path.clone());
        store.set_access_token("abc");
        assert!(path.exists());

        store.clear_all();
        assert!(!path.exists());

        let reopened = CredentialStore::load(path);
        assert!(!reopened.is_authenticated());
    }

    #[test]
    fn store_file_uses_the_shared_path_helper_and_format() {
        let dir = tempdir().expect("tempdir");
        let path = task_core::paths::credentials_json_path(dir.path());

        let store = CredentialStore::load(path.clone());
        store.set_access_token("abc");
        assert!(path.exists());

        // What the store writes, the shared JSON helpers can read back.
        let slots: serde_json::Value = task_core::paths::load_json(&path).expect("load");
        assert_eq!(slots["access_token"], "abc");

        let reopened = CredentialStore::load(path);
        assert_eq!(reopened.access_token().as_deref(), Some("abc"));
    }

    #[test]
    fn refresh_only_rotates_the_access_token() {
        let dir = tempdir().expect("tempdir");
        let store = store_in(&dir);

        store.set_session("stale", "refresh-1", json!({"id": 1}));
        store.set_access_token("fresh");
        assert_eq!(store.access_token().as_deref(), Some("fresh"));
        assert_eq!(store.refresh_token().as_deref(), Some("refresh-1"));
        assert_eq!(store.user(), Some(json!({"id": 1})));
    }
}
