use serde::{Deserialize, Serialize};

use super::action::Action;

/// Subject wildcard: a rule on `all` applies to every resource type.
pub const SUBJECT_ALL: &str = "all";

/// Atomic capability record as the backend's CRUD screens manage it.
/// Immutable reference data; the evaluation engine never mutates these.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Permission {
    pub id: i64,
    #[serde(default)]
    pub name: String,
    pub action: Action,
    pub subject: String,
}

impl Permission {
    pub fn new(id: i64, name: impl Into<String>, action: Action, subject: impl Into<String>) -> Self {
        Self { id, name: name.into(), action, subject: subject.into() }
    }
}

/// Named reusable bundle of permissions. The role owns the binding.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Role {
    pub id: i64,
    pub name: String,
    #[serde(default)]
    pub permissions: Vec<Permission>,
}

/// Single place where the wildcard semantics are defined: a rule matches a
/// query iff the action agrees (or the rule says `manage`) and the subject
/// agrees (or the rule says `all`). Everything else in the crate goes
/// through here.
pub fn matches(rule: &Permission, action: &str, subject: &str) -> bool {
    let action_ok = match rule.action {
        Action::Manage => true,
        // A verb this build does not know grants nothing.
        Action::Unknown => false,
        known => known.as_str() == action,
    };
    let subject_ok = rule.subject == SUBJECT_ALL || rule.subject == subject;
    action_ok && subject_ok
}
