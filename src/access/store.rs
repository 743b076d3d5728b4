use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use tracing::warn;

use super::profile::ActorProfile;

/// Persisted-session collaborator seam. The engine only ever talks to this
/// trait; the on-disk (or cookie, or keychain) format belongs to the
/// implementation.
pub trait SessionStore: Send + Sync {
    fn load(&self) -> Result<Option<ActorProfile>>;
    fn save(&self, profile: &ActorProfile) -> Result<()>;
    fn clear(&self) -> Result<()>;
}

#[derive(Debug, Serialize, Deserialize)]
struct SessionEnvelope {
    saved_at: DateTime<Utc>,
    profile: ActorProfile,
}

/// JSON-file session store used by the desktop build of the console.
///
/// A missing file is an absent session. An unparseable file is treated the
/// same way after a best-effort removal: startup must never wedge on a
/// stale or truncated envelope.
pub struct FileSessionStore {
    path: PathBuf,
}

impl FileSessionStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl SessionStore for FileSessionStore {
    fn load(&self) -> Result<Option<ActorProfile>> {
        if !self.path.exists() {
            return Ok(None);
        }
        let raw = std::fs::read_to_string(&self.path)
            .with_context(|| format!("reading session file {}", self.path.display()))?;
        match serde_json::from_str::<SessionEnvelope>(&raw) {
            Ok(env) => Ok(Some(env.profile)),
            Err(e) => {
                warn!(path = %self.path.display(), error = %e, "discarding unreadable session file");
                std::fs::remove_file(&self.path).ok();
                Ok(None)
            }
        }
    }

    fn save(&self, profile: &ActorProfile) -> Result<()> {
        if let Some(dir) = self.path.parent() {
            std::fs::create_dir_all(dir).ok();
        }
        let env = SessionEnvelope { saved_at: Utc::now(), profile: profile.clone() };
        let body = serde_json::to_vec_pretty(&env)?;
        // Write-then-rename so a crash mid-write cannot leave a truncated envelope.
        let tmp = self.path.with_extension("tmp");
        std::fs::write(&tmp, &body)
            .with_context(|| format!("writing session file {}", tmp.display()))?;
        std::fs::rename(&tmp, &self.path)
            .with_context(|| format!("publishing session file {}", self.path.display()))?;
        Ok(())
    }

    fn clear(&self) -> Result<()> {
        if self.path.exists() {
            std::fs::remove_file(&self.path)
                .with_context(|| format!("removing session file {}", self.path.display()))?;
        }
        Ok(())
    }
}

/// In-process store for tests and embedders that keep sessions elsewhere.
#[derive(Default)]
pub struct MemorySessionStore {
    cell: Mutex<Option<ActorProfile>>,
}

impl MemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn seeded(profile: ActorProfile) -> Self {
        Self { cell: Mutex::new(Some(profile)) }
    }
}

impl SessionStore for MemorySessionStore {
    fn load(&self) -> Result<Option<ActorProfile>> {
        Ok(self.cell.lock().clone())
    }

    fn save(&self, profile: &ActorProfile) -> Result<()> {
        *self.cell.lock() = Some(profile.clone());
        Ok(())
    }

    fn clear(&self) -> Result<()> {
        *self.cell.lock() = None;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::access::{Action, Permission};
    use crate::tprintln;

    fn sample_profile() -> ActorProfile {
        ActorProfile::new(42)
            .with_roles(["EDITOR"])
            .with_permissions(vec![Permission::new(1, "leer", Action::Read, "Programa")])
            .with_tenant("dep-01")
    }

    #[test]
    fn file_store_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileSessionStore::new(dir.path().join("session.json"));
        assert!(store.load().unwrap().is_none());
        store.save(&sample_profile()).unwrap();
        let back = store.load().unwrap().expect("profile persisted");
        assert_eq!(back, sample_profile());
        store.clear().unwrap();
        assert!(store.load().unwrap().is_none());
    }

    #[test]
    fn corrupt_session_file_reads_as_absent_and_is_removed() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("session.json");
        std::fs::write(&path, b"{ not json").unwrap();
        let store = FileSessionStore::new(&path);
        assert!(store.load().unwrap().is_none());
        tprintln!("corrupt file removed: {}", !path.exists());
        assert!(!path.exists());
    }

    #[test]
    fn clear_is_idempotent() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileSessionStore::new(dir.path().join("session.json"));
        store.clear().unwrap();
        store.clear().unwrap();
    }

    #[test]
    fn memory_store_round_trip() {
        let store = MemorySessionStore::new();
        assert!(store.load().unwrap().is_none());
        store.save(&sample_profile()).unwrap();
        assert_eq!(store.load().unwrap(), Some(sample_profile()));
        store.clear().unwrap();
        assert!(store.load().unwrap().is_none());
    }
}
