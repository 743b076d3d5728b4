use std::sync::Arc;

use parking_lot::RwLock;
use serde_json::Value;
use tracing::{debug, info, warn};

use crate::error::{AppError, AppResult};

use super::ability::Ability;
use super::decode::decode_actor;
use super::gate::Gate;
use super::profile::ActorProfile;
use super::store::SessionStore;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthState {
    Unauthenticated,
    Restoring,
    Authenticated,
}

/// Immutable (profile, ability) pair published by the session. Readers get
/// an `Arc` to a fully formed pair; transitions build a new snapshot and
/// swap it in whole, so a stale ability can never outlive a profile change.
#[derive(Debug, Clone)]
pub struct AuthSnapshot {
    pub state: AuthState,
    pub profile: Option<ActorProfile>,
    pub ability: Arc<Ability>,
}

impl AuthSnapshot {
    fn signed_out(state: AuthState) -> Arc<Self> {
        Arc::new(Self { state, profile: None, ability: Ability::deny_all() })
    }

    fn signed_in(profile: ActorProfile) -> Arc<Self> {
        let ability = Arc::new(Ability::derive(&profile));
        Arc::new(Self { state: AuthState::Authenticated, profile: Some(profile), ability })
    }
}

/// Owned session object injected at the console's composition root; the
/// only mutators are `restore`/`login`/`update_actor`/`logout`/`invalidate`.
/// Everything else reads snapshots.
pub struct AuthorizationSession<S: SessionStore> {
    store: S,
    current: RwLock<Arc<AuthSnapshot>>,
}

impl<S: SessionStore> AuthorizationSession<S> {
    pub fn new(store: S) -> Self {
        Self {
            store,
            current: RwLock::new(AuthSnapshot::signed_out(AuthState::Unauthenticated)),
        }
    }

    pub fn snapshot(&self) -> Arc<AuthSnapshot> {
        self.current.read().clone()
    }

    pub fn state(&self) -> AuthState {
        self.current.read().state
    }

    pub fn is_authenticated(&self) -> bool {
        self.state() == AuthState::Authenticated
    }

    /// Current ability; the shared deny-all instance while signed out.
    pub fn ability(&self) -> Arc<Ability> {
        self.current.read().ability.clone()
    }

    pub fn actor(&self) -> Option<ActorProfile> {
        self.current.read().profile.clone()
    }

    /// Declarative check for render paths: evaluated against a snapshot
    /// taken now, so it always reflects the latest published ability.
    pub fn gate(&self, action: &str, subject: &str) -> Gate {
        Gate::new(self.snapshot(), action, subject)
    }

    /// Attempt to restore a persisted session. The one suspending step of
    /// the lifecycle: `Unauthenticated -> Restoring -> Authenticated` on a
    /// loadable profile, back to `Unauthenticated` otherwise.
    pub async fn restore(&self) -> AppResult<bool> {
        self.publish(AuthSnapshot::signed_out(AuthState::Restoring));
        match self.store.load() {
            Ok(Some(profile)) => {
                info!("session.restore user={} roles={}", profile.id, profile.role_names.len());
                self.publish(AuthSnapshot::signed_in(profile));
                Ok(true)
            }
            Ok(None) => {
                debug!("session.restore no persisted session");
                self.publish(AuthSnapshot::signed_out(AuthState::Unauthenticated));
                Ok(false)
            }
            Err(e) => {
                warn!("session.restore store failed: {e:#}");
                self.publish(AuthSnapshot::signed_out(AuthState::Unauthenticated));
                Err(AppError::storage("session_restore_failed", e.to_string()))
            }
        }
    }

    /// Accept a login payload from the auth collaborator, normalize it,
    /// persist it and publish the rebuilt ability. Valid from any state.
    pub fn login(&self, payload: &Value) -> AppResult<Arc<AuthSnapshot>> {
        let profile = decode_actor(payload)
            .map_err(|e| AppError::decode("bad_actor_payload", e.to_string()))?;
        self.persist(&profile);
        info!(
            "session.login user={} roles={} rules={}",
            profile.id,
            profile.role_names.len(),
            profile.permissions.len()
        );
        let snap = AuthSnapshot::signed_in(profile);
        self.publish(snap.clone());
        Ok(snap)
    }

    /// Re-point the session at an updated actor record (self-service edits,
    /// role changes followed by a profile re-fetch). Only meaningful while
    /// authenticated; the previous ability is discarded, never mutated.
    pub fn update_actor(&self, payload: &Value) -> AppResult<Arc<AuthSnapshot>> {
        if !self.is_authenticated() {
            return Err(AppError::auth("not_authenticated", "no active session to update"));
        }
        let profile = decode_actor(payload)
            .map_err(|e| AppError::decode("bad_actor_payload", e.to_string()))?;
        self.persist(&profile);
        debug!("session.update user={} rules={}", profile.id, profile.permissions.len());
        let snap = AuthSnapshot::signed_in(profile);
        self.publish(snap.clone());
        Ok(snap)
    }

    /// Sign out: clear persisted state and reset to deny-all. Idempotent.
    pub fn logout(&self) {
        self.sign_out("session.logout");
    }

    /// External signal from the transport layer that the backend no longer
    /// honors the current credentials. Same transition as logout.
    pub fn invalidate(&self) {
        self.sign_out("session.invalidate");
    }

    fn sign_out(&self, what: &str) {
        if let Some(profile) = self.actor() {
            info!("{} user={}", what, profile.id);
        }
        if let Err(e) = self.store.clear() {
            warn!("{} store clear failed: {e:#}", what);
        }
        self.publish(AuthSnapshot::signed_out(AuthState::Unauthenticated));
    }

    fn persist(&self, profile: &ActorProfile) {
        // Persistence is best-effort: a failed write only costs the next
        // startup its restore.
        if let Err(e) = self.store.save(profile) {
            warn!("session.persist failed for user={}: {e:#}", profile.id);
        }
    }

    fn publish(&self, snap: Arc<AuthSnapshot>) {
        *self.current.write() = snap;
    }
}
