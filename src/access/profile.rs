use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use super::permission::{Permission, Role};

/// Canonical, already-normalized actor record: what login/restore hand to
/// the ability builder and what the session store persists.
///
/// `permissions` is the flattened union of role-carried and directly
/// granted permissions, deduplicated by id. `role_names` is kept alongside
/// for the special-cased role checks (super-admin) since roles may have
/// been fetched separately from the actor record.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct ActorProfile {
    pub id: i64,
    #[serde(default)]
    pub role_names: BTreeSet<String>,
    #[serde(default)]
    pub permissions: Vec<Permission>,
    #[serde(default)]
    pub tenant_id: Option<String>,
}

impl ActorProfile {
    pub fn new(id: i64) -> Self {
        Self { id, ..Default::default() }
    }

    pub fn with_roles<I, S>(mut self, roles: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.role_names.extend(roles.into_iter().map(Into::into));
        self
    }

    pub fn with_permissions(mut self, permissions: Vec<Permission>) -> Self {
        self.add_permissions(permissions);
        self
    }

    pub fn with_tenant(mut self, tenant: impl Into<String>) -> Self {
        self.tenant_id = Some(tenant.into());
        self
    }

    pub fn has_role(&self, name: &str) -> bool {
        self.role_names.contains(name)
    }

    /// Merge a separately fetched role record: its name joins the role set
    /// and its permission list is flattened into the effective union.
    pub fn attach_role(&mut self, role: &Role) {
        let name = role.name.trim();
        if !name.is_empty() {
            self.role_names.insert(name.to_string());
        }
        self.add_permissions(role.permissions.clone());
    }

    /// Append permissions, keeping the list deduplicated by id.
    pub fn add_permissions(&mut self, extra: Vec<Permission>) {
        for p in extra {
            if !self.permissions.iter().any(|q| q.id == p.id) {
                self.permissions.push(p);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::access::{Action, Permission};

    #[test]
    fn add_permissions_dedupes_by_id() {
        let read = Permission::new(1, "leer", Action::Read, "Programa");
        let dup = Permission::new(1, "leer (via rol)", Action::Read, "Programa");
        let write = Permission::new(2, "editar", Action::Update, "Programa");
        let mut actor = ActorProfile::new(7);
        actor.add_permissions(vec![read, dup, write]);
        assert_eq!(actor.permissions.len(), 2);
    }

    #[test]
    fn role_names_are_a_set() {
        let actor = ActorProfile::new(7).with_roles(["EDITOR", "EDITOR", "REVISOR"]);
        assert_eq!(actor.role_names.len(), 2);
        assert!(actor.has_role("REVISOR"));
    }
}
