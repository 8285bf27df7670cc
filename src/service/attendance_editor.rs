use std::sync::Arc;

use chrono::Utc;

use crate::{
    domain::*,
    error::{AppError, Result},
    repository::{AttendanceRepository, MemberRepository},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditorState {
    Idle,
    Editing,
}

struct OpenWorkshop {
    workshop: Workshop,
    roster: Vec<RosterMember>,
}

/// Edit session for one workshop's attendance.
///
/// `open` loads the registered roster and seeds the selection from the
/// workshop's persisted state; `toggle` edits it; `commit` writes it back and
/// closes. Closing always discards the whole transient selection.
pub struct AttendanceEditor {
    members: Arc<dyn MemberRepository>,
    attendance: Arc<dyn AttendanceRepository>,
    mode: CommitMode,
    undecided: UndecidedPolicy,
    selection: AttendanceSelection,
    session: Option<OpenWorkshop>,
}

impl AttendanceEditor {
    pub fn new(
        members: Arc<dyn MemberRepository>,
        attendance: Arc<dyn AttendanceRepository>,
        mode: CommitMode,
        undecided: UndecidedPolicy,
    ) -> Self {
        Self {
            members,
            attendance,
            mode,
            undecided,
            selection: AttendanceSelection::new(),
            session: None,
        }
    }

    pub fn state(&self) -> EditorState {
        if self.session.is_some() {
            EditorState::Editing
        } else {
            EditorState::Idle
        }
    }

    pub fn workshop(&self) -> Option<&Workshop> {
        self.session.as_ref().map(|s| &s.workshop)
    }

    pub fn roster(&self) -> &[RosterMember] {
        self.session.as_ref().map(|s| s.roster.as_slice()).unwrap_or(&[])
    }

    /// Selects a workshop, replacing whatever was open before.
    pub async fn open(&mut self, workshop: Workshop) -> Result<&[RosterMember]> {
        self.close();

        let roster = self.members.list_registered(&workshop.id).await?;
        self.selection.seed(&workshop.id, workshop.attendance_state.as_ref());

        tracing::debug!(
            workshop_id = %workshop.id,
            members = roster.len(),
            "Opened attendance editor"
        );

        self.session = Some(OpenWorkshop { workshop, roster });
        Ok(self.roster())
    }

    pub fn toggle(&mut self, member_id: &str, present: bool) -> Result<()> {
        let session = self.session.as_ref().ok_or_else(|| {
            AppError::BadRequest("No workshop selected".to_string())
        })?;

        if !session.roster.iter().any(|m| m.id == member_id) {
            return Err(AppError::BadRequest(format!(
                "Member {} is not registered for {}",
                member_id, session.workshop.title
            )));
        }

        self.selection.set(&session.workshop.id, member_id, present);
        Ok(())
    }

    pub fn mark(&self, member_id: &str) -> Mark {
        match &self.session {
            Some(session) => self.selection.mark(&session.workshop.id, member_id),
            None => Mark::Unset,
        }
    }

    /// Roster paired with each member's current mark.
    pub fn marks(&self) -> Vec<(&RosterMember, Mark)> {
        self.roster()
            .iter()
            .map(|member| (member, self.mark(&member.id)))
            .collect()
    }

    /// Commits the open workshop. Returns `None` when nothing is open.
    ///
    /// On failure nothing is written and the editor stays open.
    pub async fn commit(&mut self) -> Result<Option<CommitReport>> {
        let Some(session) = self.session.as_ref() else {
            tracing::debug!("Attendance commit with no workshop selected");
            return Ok(None);
        };

        let commit = AttendanceCommit {
            workshop_id: session.workshop.id.clone(),
            workshop_title: session.workshop.title.clone(),
            selection: self.selection.branch(&session.workshop.id),
            mode: self.mode,
            undecided: self.undecided,
            marked_at: Utc::now(),
        };

        let report = self.attendance.commit(commit).await?;
        self.close();
        Ok(Some(report))
    }

    pub fn close(&mut self) {
        self.session = None;
        self.selection.clear();
    }
}
