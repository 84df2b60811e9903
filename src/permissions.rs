use serde_json::Value;

use crate::context::{PermissionChecker, Subject};
use crate::matching::param_string;

/// Grants abilities listed on the subject.
///
/// A scoped check such as `("update", 5)` passes for either `update` or
/// `update:5` in the list.
#[derive(Debug, Clone, Copy, Default)]
pub struct AbilityGate;

impl PermissionChecker for AbilityGate {
    fn check(&self, subject: &Subject, ability: &str, argument: Option<&Value>) -> bool {
        let scoped = argument
            .filter(|argument| !argument.is_null())
            .map(|argument| format!("{}:{}", ability, param_string(argument)));

        subject
            .abilities
            .iter()
            .any(|held| held == ability || Some(held) == scoped.as_ref())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_plain_ability() {
        let subject = Subject::new("1").with_abilities(["access-admin"]);
        assert!(AbilityGate.check(&subject, "access-admin", None));
        assert!(!AbilityGate.check(&subject, "manage-users", None));
    }

    #[test]
    fn test_scoped_ability() {
        let subject = Subject::new("1").with_abilities(["update:5"]);
        assert!(AbilityGate.check(&subject, "update", Some(&json!({"id": 5}))));
        assert!(!AbilityGate.check(&subject, "update", Some(&json!(6))));
        assert!(!AbilityGate.check(&subject, "update", None));
    }
}
