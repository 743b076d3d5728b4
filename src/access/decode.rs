//! Boundary decode for actor payloads.
//!
//! The backend has shipped several historical shapes for how roles and
//! permissions attach to an actor: a role as a bare name string or as a
//! record, a permission bare or nested under its join record, a singular
//! `role` next to a plural `roles`. Everything is normalized here, once;
//! nothing past this module ever sees a raw shape.

use serde::Deserialize;
use serde_json::Value;
use thiserror::Error;
use tracing::debug;

use super::permission::{Permission, Role};
use super::profile::ActorProfile;

#[derive(Debug, Error)]
pub enum DecodeError {
    #[error("actor payload is not an object")]
    NotAnObject,
}

/// A role as it may appear on the wire: bare name, or a record that may
/// carry its own permission list.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum RoleShape {
    Name(String),
    Record(RoleRecord),
}

#[derive(Debug, Deserialize)]
struct RoleRecord {
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    permissions: Vec<Value>,
}

/// A permission as it may appear on the wire: bare, or nested under the
/// join-record key.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum PermissionShape {
    Bare(Permission),
    Joined { permission: Permission },
}

impl PermissionShape {
    fn into_permission(self) -> Permission {
        match self {
            PermissionShape::Bare(p) => p,
            PermissionShape::Joined { permission } => permission,
        }
    }
}

/// Tenant ids arrive as strings or numbers depending on the endpoint.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum TenantRef {
    Text(String),
    Numeric(i64),
}

impl TenantRef {
    fn into_string(self) -> String {
        match self {
            TenantRef::Text(s) => s,
            TenantRef::Numeric(n) => n.to_string(),
        }
    }
}

/// Normalize a raw actor payload into the canonical [`ActorProfile`].
///
/// Absent or null `role`/`roles`/`permissions` collections normalize to
/// empty: an actor with zero derived permissions is a valid, maximally
/// restrictive state, not an error. Individual entries that do not decode
/// under any known shape are dropped with a debug event. The only hard
/// failure is a payload that is not an object at all.
pub fn decode_actor(payload: &Value) -> Result<ActorProfile, DecodeError> {
    let obj = payload.as_object().ok_or(DecodeError::NotAnObject)?;

    let mut actor = ActorProfile::new(obj.get("id").and_then(Value::as_i64).unwrap_or(0));

    if let Some(t) = obj.get("tenantId").or_else(|| obj.get("tenant_id")) {
        if !t.is_null() {
            match serde_json::from_value::<TenantRef>(t.clone()) {
                Ok(tenant) => actor.tenant_id = Some(tenant.into_string()),
                Err(e) => debug!(error = %e, "dropping unreadable tenant reference"),
            }
        }
    }

    // Singular `role` and plural `roles` both contribute.
    let mut shapes: Vec<Value> = Vec::new();
    if let Some(r) = obj.get("role") {
        if !r.is_null() {
            shapes.push(r.clone());
        }
    }
    if let Some(Value::Array(rs)) = obj.get("roles") {
        shapes.extend(rs.iter().cloned());
    }
    for raw in shapes {
        match serde_json::from_value::<RoleShape>(raw) {
            Ok(RoleShape::Name(name)) => add_role_name(&mut actor, &name),
            Ok(RoleShape::Record(rec)) => {
                if let Some(name) = rec.name.as_deref() {
                    add_role_name(&mut actor, name);
                }
                actor.add_permissions(decode_permission_list(&rec.permissions));
            }
            Err(e) => debug!(error = %e, "dropping unreadable role entry"),
        }
    }

    if let Some(Value::Array(ps)) = obj.get("permissions") {
        actor.add_permissions(decode_permission_list(ps));
    }

    Ok(actor)
}

/// Decode a full [`Role`] record fetched on its own (admin CRUD screens
/// fetch roles separately from actors); its permission list goes through
/// the same shape tolerance as actor-attached permissions.
pub fn decode_role(payload: &Value) -> Result<Role, DecodeError> {
    let obj = payload.as_object().ok_or(DecodeError::NotAnObject)?;
    let permissions = match obj.get("permissions") {
        Some(Value::Array(ps)) => decode_permission_list(ps),
        _ => Vec::new(),
    };
    Ok(Role {
        id: obj.get("id").and_then(Value::as_i64).unwrap_or(0),
        name: obj.get("name").and_then(Value::as_str).unwrap_or_default().to_string(),
        permissions,
    })
}

fn add_role_name(actor: &mut ActorProfile, name: &str) {
    let trimmed = name.trim();
    if !trimmed.is_empty() {
        actor.role_names.insert(trimmed.to_string());
    }
}

fn decode_permission_list(raw: &[Value]) -> Vec<Permission> {
    let mut out = Vec::with_capacity(raw.len());
    for entry in raw {
        match serde_json::from_value::<PermissionShape>(entry.clone()) {
            Ok(shape) => out.push(shape.into_permission()),
            Err(e) => debug!(error = %e, "dropping unreadable permission entry"),
        }
    }
    out
}
