use std::collections::{BTreeMap, HashMap};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Persisted per-workshop attendance: member id to present (`true`) or absent.
pub type AttendanceState = BTreeMap<String, bool>;

/// One member's selection as the editor sees it.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Mark {
    Present,
    Absent,
    Unset,
}

impl Mark {
    pub fn from_entry(entry: Option<bool>) -> Self {
        match entry {
            Some(true) => Mark::Present,
            Some(false) => Mark::Absent,
            None => Mark::Unset,
        }
    }

    /// Word used in the audit description, or `None` when the policy says
    /// the member gets no entry.
    pub fn audit_label(self, policy: UndecidedPolicy) -> Option<&'static str> {
        match (self, policy) {
            (Mark::Present, _) => Some("Present"),
            (Mark::Absent, _) => Some("Absent"),
            (Mark::Unset, UndecidedPolicy::RecordAbsent) => Some("Absent"),
            (Mark::Unset, UndecidedPolicy::Skip) => None,
        }
    }
}

/// What a commit does for registered members nobody marked.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
pub enum UndecidedPolicy {
    /// Write an audit entry describing them as absent. Their selection stays unset.
    #[default]
    #[serde(rename = "absent")]
    RecordAbsent,
    /// Write no audit entry for them.
    #[serde(rename = "skip")]
    Skip,
}

/// Whether a commit closes out the workshop or only amends its state.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum CommitMode {
    /// Dashboard flow: also sets `attendance_taken`.
    Finalize,
    /// Workshop management flow: attendance state only.
    Amend,
}

/// Transient selections keyed by workshop id, then member id.
#[derive(Debug, Clone, Default)]
pub struct AttendanceSelection {
    branches: HashMap<String, AttendanceState>,
}

impl AttendanceSelection {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces the workshop's branch with a copy of its persisted state.
    pub fn seed(&mut self, workshop_id: &str, persisted: Option<&AttendanceState>) {
        self.branches
            .insert(workshop_id.to_string(), persisted.cloned().unwrap_or_default());
    }

    pub fn set(&mut self, workshop_id: &str, member_id: &str, present: bool) {
        self.branches
            .entry(workshop_id.to_string())
            .or_default()
            .insert(member_id.to_string(), present);
    }

    pub fn mark(&self, workshop_id: &str, member_id: &str) -> Mark {
        Mark::from_entry(
            self.branches
                .get(workshop_id)
                .and_then(|branch| branch.get(member_id))
                .copied(),
        )
    }

    pub fn branch(&self, workshop_id: &str) -> AttendanceState {
        self.branches.get(workshop_id).cloned().unwrap_or_default()
    }

    pub fn clear(&mut self) {
        self.branches.clear();
    }

    pub fn is_empty(&self) -> bool {
        self.branches.is_empty()
    }
}

/// Everything the store needs to commit one workshop's attendance.
#[derive(Debug, Clone)]
pub struct AttendanceCommit {
    pub workshop_id: String,
    pub workshop_title: String,
    pub selection: AttendanceState,
    pub mode: CommitMode,
    pub undecided: UndecidedPolicy,
    pub marked_at: DateTime<Utc>,
}

/// An audit entry to append for one member.
#[derive(Debug, Clone, PartialEq)]
pub struct PlannedEntry {
    pub member_id: String,
    pub description: String,
}

/// A commit resolved against the roster registered at write time.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedCommit {
    pub state: AttendanceState,
    pub entries: Vec<PlannedEntry>,
}

impl AttendanceCommit {
    /// Drops selections for members no longer registered and decides the
    /// audit entry for each registered member, in roster order.
    pub fn resolve(&self, registered: &[String]) -> ResolvedCommit {
        let state: AttendanceState = self
            .selection
            .iter()
            .filter(|(member_id, _)| registered.contains(member_id))
            .map(|(member_id, present)| (member_id.clone(), *present))
            .collect();

        let entries = registered
            .iter()
            .filter_map(|member_id| {
                let mark = Mark::from_entry(state.get(member_id).copied());
                mark.audit_label(self.undecided).map(|label| PlannedEntry {
                    member_id: member_id.clone(),
                    description: attendance_description(&self.workshop_title, label),
                })
            })
            .collect();

        ResolvedCommit { state, entries }
    }
}

pub fn attendance_description(workshop_title: &str, label: &str) -> String {
    format!("Attendance marked for workshop: {} ({})", workshop_title, label)
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CommitReport {
    pub workshop_id: String,
    pub workshop_title: String,
    /// Registered members at commit time.
    pub members_processed: usize,
    pub entries_written: usize,
    pub attendance_state: AttendanceState,
    pub attendance_taken: bool,
}

impl CommitReport {
    pub fn confirmation(&self) -> String {
        format!(
            "Attendance marked for {} members for {}",
            self.members_processed, self.workshop_title
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn commit(selection: &[(&str, bool)], undecided: UndecidedPolicy) -> AttendanceCommit {
        AttendanceCommit {
            workshop_id: "1".to_string(),
            workshop_title: "Knots".to_string(),
            selection: selection
                .iter()
                .map(|(id, present)| (id.to_string(), *present))
                .collect(),
            mode: CommitMode::Amend,
            undecided,
            marked_at: Utc::now(),
        }
    }

    fn roster(ids: &[&str]) -> Vec<String> {
        ids.iter().map(|id| id.to_string()).collect()
    }

    #[test]
    fn test_selection_toggle_replaces_prior_value() {
        let mut selection = AttendanceSelection::new();
        assert_eq!(selection.mark("w", "a"), Mark::Unset);

        selection.set("w", "a", false);
        selection.set("w", "a", true);
        selection.set("w", "b", false);

        assert_eq!(selection.mark("w", "a"), Mark::Present);
        assert_eq!(selection.mark("w", "b"), Mark::Absent);
        assert_eq!(selection.mark("other", "a"), Mark::Unset);
        assert_eq!(selection.branch("w").len(), 2);
    }

    #[test]
    fn test_seed_replaces_branch() {
        let mut selection = AttendanceSelection::new();
        selection.set("w", "stale", true);

        let persisted: AttendanceState = [("a".to_string(), true)].into_iter().collect();
        selection.seed("w", Some(&persisted));
        assert_eq!(selection.branch("w"), persisted);

        selection.seed("w", None);
        assert!(selection.branch("w").is_empty());

        selection.clear();
        assert!(selection.is_empty());
    }

    #[test]
    fn test_resolve_undecided_as_absent() {
        let resolved = commit(&[("a", true)], UndecidedPolicy::RecordAbsent)
            .resolve(&roster(&["a", "b", "c"]));

        let descriptions: Vec<&str> =
            resolved.entries.iter().map(|e| e.description.as_str()).collect();
        assert_eq!(
            descriptions,
            vec![
                "Attendance marked for workshop: Knots (Present)",
                "Attendance marked for workshop: Knots (Absent)",
                "Attendance marked for workshop: Knots (Absent)",
            ]
        );
        assert_eq!(resolved.state.len(), 1);
        assert_eq!(resolved.state.get("a"), Some(&true));
    }

    #[test]
    fn test_resolve_skip_policy() {
        let resolved = commit(&[("a", true), ("b", false)], UndecidedPolicy::Skip)
            .resolve(&roster(&["a", "b", "c"]));
        let members: Vec<&str> = resolved.entries.iter().map(|e| e.member_id.as_str()).collect();
        assert_eq!(members, vec!["a", "b"]);
    }

    #[test]
    fn test_resolve_drops_unregistered_members() {
        let resolved = commit(&[("a", true), ("gone", false)], UndecidedPolicy::RecordAbsent)
            .resolve(&roster(&["a"]));
        assert!(!resolved.state.contains_key("gone"));
        assert_eq!(resolved.entries.len(), 1);
    }

    #[test]
    fn test_policy_config_names() {
        let policy: UndecidedPolicy = serde_json::from_str("\"skip\"").unwrap();
        assert_eq!(policy, UndecidedPolicy::Skip);
        assert_eq!(serde_json::to_string(&UndecidedPolicy::RecordAbsent).unwrap(), "\"absent\"");
    }
}
