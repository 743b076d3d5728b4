use serde::{Deserialize, Serialize};

/// Verbs the console's permission records grant. `Manage` is the action
/// wildcard: a `manage` rule matches any queried verb.
///
/// The set is open-ended on the wire: verbs this build does not know decode
/// to `Unknown` instead of failing, and `Unknown` never matches a query.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Action {
    Manage,
    Read,
    Create,
    Update,
    Delete,
    #[serde(other)]
    Unknown,
}

impl Action {
    pub fn as_str(self) -> &'static str {
        match self {
            Action::Manage => "manage",
            Action::Read => "read",
            Action::Create => "create",
            Action::Update => "update",
            Action::Delete => "delete",
            Action::Unknown => "unknown",
        }
    }
}

impl std::fmt::Display for Action {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Action {
    type Err = ();

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "manage" => Ok(Action::Manage),
            "read" => Ok(Action::Read),
            "create" => Ok(Action::Create),
            "update" => Ok(Action::Update),
            "delete" => Ok(Action::Delete),
            _ => Err(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::Action;

    #[test]
    fn action_string_roundtrip() {
        let actions = [
            Action::Manage,
            Action::Read,
            Action::Create,
            Action::Update,
            Action::Delete,
        ];
        for action in actions {
            let as_str = action.as_str();
            assert_eq!(<Action as std::str::FromStr>::from_str(as_str).ok(), Some(action));
            assert_eq!(action.to_string(), as_str);
        }
    }

    #[test]
    fn unrecognized_verb_decodes_to_unknown() {
        let a: Action = serde_json::from_str("\"exportar\"").unwrap();
        assert_eq!(a, Action::Unknown);
        assert!(<Action as std::str::FromStr>::from_str("exportar").is_err());
    }
}
