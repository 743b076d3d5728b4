use std::sync::Arc;

use once_cell::sync::Lazy;

use super::permission::{matches, Permission};
use super::profile::ActorProfile;

/// Role name whose holders bypass rule evaluation entirely. Kept as an
/// explicit flag on the built [`Ability`] rather than a synthesized
/// `manage`/`all` rule so audit paths can tell the two apart.
pub const SUPER_ADMIN_ROLE: &str = "SUPER_ADMIN";

static DENY_ALL: Lazy<Arc<Ability>> = Lazy::new(|| Arc::new(Ability::default()));

/// Sealed, query-only capability set for one actor.
///
/// A pure function of the [`ActorProfile`] it was derived from: rebuilt on
/// every profile change, never mutated in place. Evaluation is a plain scan
/// over the rule list (rule sets are tens of entries) so `can` is cheap
/// enough to call from every render path without memoization.
#[derive(Debug, Clone, Default)]
pub struct Ability {
    rules: Vec<Permission>,
    superuser: bool,
    tenant_id: Option<String>,
}

impl Ability {
    /// Derive the ability for an actor. The profile's permission list must
    /// already hold the flattened role/direct union, which is what
    /// [`decode_actor`](super::decode_actor) and
    /// [`ActorProfile::attach_role`] produce.
    pub fn derive(profile: &ActorProfile) -> Self {
        Self {
            rules: profile.permissions.clone(),
            superuser: profile.role_names.contains(SUPER_ADMIN_ROLE),
            tenant_id: profile.tenant_id.clone(),
        }
    }

    /// Shared empty-rule instance: denies every query.
    pub fn deny_all() -> Arc<Ability> {
        DENY_ALL.clone()
    }

    /// Can this actor perform `action` on `subject`?
    ///
    /// Grant iff any rule matches under the wildcard semantics of
    /// [`matches`], or the actor holds the super-admin role. Unknown
    /// action/subject strings simply fail to match; this never errors.
    pub fn can(&self, action: &str, subject: &str) -> bool {
        if self.superuser {
            return true;
        }
        self.rules.iter().any(|rule| matches(rule, action, subject))
    }

    /// Tenant-scoped variant: the action/subject check plus department
    /// isolation. An actor bound to a department can only act within it;
    /// an actor with no binding is institution-wide. Super-admins bypass
    /// the tenant check along with everything else.
    pub fn can_for_tenant(&self, action: &str, subject: &str, tenant: &str) -> bool {
        if self.superuser {
            return true;
        }
        match self.tenant_id.as_deref() {
            Some(own) if own != tenant => false,
            _ => self.can(action, subject),
        }
    }

    pub fn is_superuser(&self) -> bool {
        self.superuser
    }

    pub fn tenant_id(&self) -> Option<&str> {
        self.tenant_id.as_deref()
    }

    pub fn rules(&self) -> &[Permission] {
        &self.rules
    }
}
