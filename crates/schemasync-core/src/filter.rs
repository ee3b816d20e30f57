//! Action filtering.
//!
//! The filter is how destructive actions are kept out of the output: a
//! rename parses as a remove plus an add, so excluding `remove` and `drop`
//! protects data at the cost of leaving the old name in place.

use std::collections::HashSet;

use crate::actions::{Action, ActionKind};

/// An allow-set over [`ActionKind`]. The default allows everything.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AllowedActions(HashSet<ActionKind>);

impl AllowedActions {
    /// Allows all action kinds.
    #[must_use]
    pub fn all() -> Self {
        Self(ActionKind::ALL.into_iter().collect())
    }

    /// Allows only the given kinds.
    #[must_use]
    pub fn only(kinds: impl IntoIterator<Item = ActionKind>) -> Self {
        Self(kinds.into_iter().collect())
    }

    /// Removes a kind from the allow-set.
    #[must_use]
    pub fn without(mut self, kind: ActionKind) -> Self {
        self.0.remove(&kind);
        self
    }

    /// Returns whether the given kind is allowed.
    #[must_use]
    pub fn allows(&self, kind: ActionKind) -> bool {
        self.0.contains(&kind)
    }
}

impl Default for AllowedActions {
    fn default() -> Self {
        Self::all()
    }
}

impl FromIterator<ActionKind> for AllowedActions {
    fn from_iter<I: IntoIterator<Item = ActionKind>>(iter: I) -> Self {
        Self::only(iter)
    }
}

/// Returns the subsequence of `actions` whose kinds are in the allow-set,
/// preserving relative order. Actions are never mutated.
#[must_use]
pub fn filter_actions(actions: Vec<Action>, allowed: &AllowedActions) -> Vec<Action> {
    actions
        .into_iter()
        .filter(|action| allowed.allows(action.kind()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::{Column, ColumnType, Table};

    fn sample_actions() -> Vec<Action> {
        vec![
            Action::DropTable { name: "old".into() },
            Action::AddColumn {
                table: "user".into(),
                column: Column::new("a", ColumnType::new("int")),
            },
            Action::RemoveColumn {
                table: "user".into(),
                column: "b".into(),
            },
            Action::CreateTable { table: Table::new("new") },
        ]
    }

    #[test]
    fn test_default_allows_everything() {
        let actions = sample_actions();
        let filtered = filter_actions(actions.clone(), &AllowedActions::default());
        assert_eq!(filtered, actions);
    }

    #[test]
    fn test_filter_preserves_order() {
        let allowed = AllowedActions::only([ActionKind::Add, ActionKind::Create]);
        let filtered = filter_actions(sample_actions(), &allowed);
        assert_eq!(filtered.len(), 2);
        assert!(matches!(filtered[0], Action::AddColumn { .. }));
        assert!(matches!(filtered[1], Action::CreateTable { .. }));
    }

    #[test]
    fn test_without_removes_destructive_kinds() {
        let allowed = AllowedActions::all()
            .without(ActionKind::Drop)
            .without(ActionKind::Remove);
        let filtered = filter_actions(sample_actions(), &allowed);
        assert!(filtered.iter().all(|a| {
            a.kind() != ActionKind::Drop && a.kind() != ActionKind::Remove
        }));
        assert_eq!(filtered.len(), 2);
    }
}
