use std::sync::Arc;

use super::session::AuthSnapshot;

/// Declarative authorization check co-located with the UI: build one per
/// render pass from [`AuthorizationSession::gate`](super::AuthorizationSession::gate),
/// ask it once. Holds the snapshot it was built from, so a gate constructed
/// after a transition always reflects the latest ability; nothing is cached
/// across passes.
///
/// Denial is a normal outcome, not an error: `render` yields `None` and the
/// caller omits the gated element.
pub struct Gate {
    snapshot: Arc<AuthSnapshot>,
    action: String,
    subject: String,
    tenant: Option<String>,
}

impl Gate {
    pub(crate) fn new(snapshot: Arc<AuthSnapshot>, action: &str, subject: &str) -> Self {
        Self {
            snapshot,
            action: action.to_string(),
            subject: subject.to_string(),
            tenant: None,
        }
    }

    /// Restrict the check to one department.
    pub fn for_tenant(mut self, tenant: impl Into<String>) -> Self {
        self.tenant = Some(tenant.into());
        self
    }

    pub fn allowed(&self) -> bool {
        match self.tenant.as_deref() {
            Some(t) => self.snapshot.ability.can_for_tenant(&self.action, &self.subject, t),
            None => self.snapshot.ability.can(&self.action, &self.subject),
        }
    }

    /// Produce the gated element only when the check passes.
    pub fn render<T>(&self, f: impl FnOnce() -> T) -> Option<T> {
        if self.allowed() {
            Some(f())
        } else {
            None
        }
    }
}
